// In: src/bridge/stateless_api.rs

//! One-shot entry points for callers that handle isolated frames and never
//! need temporal prediction.

use crate::error::DepthError;
use crate::frame_pipeline::{FrameCodec, FrameHeader};
use crate::kernels::zstd::ZstdBackend;
use crate::profile::EncodeMode;
use crate::types::DepthFrame;

/// Compresses a single frame as a keyframe with the default back end.
pub fn compress_keyframe(
    width: u32,
    height: u32,
    samples: &[u16],
    mode: EncodeMode,
) -> Result<Vec<u8>, DepthError> {
    let codec = FrameCodec::<ZstdBackend>::default();
    Ok(codec.encode_samples(width, height, samples, mode, None, 0)?.bytes)
}

/// Decompresses a standalone keyframe. Delta frames fail with
/// `MissingReference` since there is nothing to predict from.
pub fn decompress_keyframe(bytes: &[u8]) -> Result<DepthFrame, DepthError> {
    let codec = FrameCodec::<ZstdBackend>::default();
    Ok(codec.decode(bytes, None)?.frame)
}

/// Reads and validates the fixed header without touching the payload.
/// This function acts as a simple facade over `FrameHeader::peek`.
pub fn peek_header(bytes: &[u8]) -> Result<FrameHeader, DepthError> {
    FrameHeader::peek(bytes)
}
