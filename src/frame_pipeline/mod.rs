//! This module defines the frame-level processing pipeline: range
//! classification, block partitioning, the per-block transform choice, and
//! the bitstream framing around the back-end payload.
//!
//! Data Flow (Compression):
//!
//!   samples -> [classify] -> canonical codes -> [partition] -> 8x8 blocks
//!           -> [choose_block + kernels::block] -> block stream
//!           -> [ByteCodecBackend] -> payload -> [artifact] -> bitstream
//!
//! Decompression walks the same stages in reverse, in the same block order.

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod artifact;
pub mod classify;
pub mod codec;
pub mod partition;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use self::artifact::{FrameHeader, HEADER_LEN};
pub use self::codec::{DecodedFrame, EncodedFrame, FrameCodec, FrameStats, ReferenceFrame};
pub use self::partition::{BLOCK_SIZE, MAX_DIMENSION};
