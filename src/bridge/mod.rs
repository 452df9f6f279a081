// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public-facing API of the zdepth library. It wraps the
// stateless `frame_pipeline` engine and owns everything that spans frames:
// configuration, frame numbering, keyframe scheduling, and the temporal reference.
//
// Data Flow (Compression):
//
//   1. [Stateful Facade (DepthCompressor::compress)] -> Receives `(w, h, &[u16])`
//         |
//         `-> picks a reference (or none, for a keyframe) and a frame number
//         |
//   2. [Pipeline Engine (frame_pipeline::FrameCodec::encode_samples)]
//         |
//         `-> Returns `EncodedFrame` (bytes + the new reference)
//         |
//   3. [Stateful Facade] -> keeps the reference, returns the bytes
//
//
// Data Flow (Decompression):
//
//   1. [Stateful Facade (DepthCompressor::decompress)] -> Receives `&[u8]`
//         |
//         `-> passes the held reference, if any
//         |
//   2. [Pipeline Engine (frame_pipeline::FrameCodec::decode)]
//         |
//         `-> Returns `DecodedFrame`
//         |
//   3. [Stateful Facade] -> keeps the reference, returns the `DepthFrame`
//
// Any failure in either direction drops the held reference.
//
// ====================================================================================
pub(crate) mod compressor;
pub mod stateless_api;

// --- High-Level Stateful API ---
pub use compressor::DepthCompressor;

// --- Low-Level Stateless API ---
pub use stateless_api::{compress_keyframe, decompress_keyframe, peek_header};
