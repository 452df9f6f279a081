//! This module defines shared traits used at the seams of the codec.

use crate::error::DepthError;

/// A generic lossless byte-stream compressor: the final stage applied to the
/// block stream.
///
/// `decompress` is the exact inverse of `compress`. It receives an upper bound
/// on the decompressed size and must fail rather than produce more than that.
/// Every failure must be reported as `DepthError::WrongFormat`.
pub trait ByteCodecBackend {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, DepthError>;
    fn decompress(&self, input: &[u8], max_output_len: usize) -> Result<Vec<u8>, DepthError>;
}
