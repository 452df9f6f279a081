//! This module contains the pure, stateless kernels for performing Zstandard
//! compression and decompression of the block stream.
//!
//! This is the Final Stage transform. It is a safe, panic-free wrapper around
//! the `zstd` crate; every failure surfaces as `DepthError::WrongFormat`.

use std::io::{Read, Write};
use zstd::stream::{Decoder, Encoder};

use crate::error::DepthError;
use crate::traits::ByteCodecBackend;

/// Level used when none is configured. Depth streams are frame-rate bound, so
/// the fastest regular level is the default.
pub const DEFAULT_LEVEL: i32 = 1;

//==================================================================================
// 1. Core Logic (The "Engine")
//==================================================================================

/// Compresses a byte slice into a single Zstandard frame.
pub fn encode(input_bytes: &[u8], level: i32) -> Result<Vec<u8>, DepthError> {
    let mut output_buf = Vec::with_capacity(input_bytes.len() / 2 + 16);
    let mut encoder =
        Encoder::new(&mut output_buf, level).map_err(|e| zstd_error("init encoder", e))?;
    encoder
        .write_all(input_bytes)
        .map_err(|e| zstd_error("compress", e))?;
    // `finish` is essential to finalize the Zstd frame.
    encoder.finish().map_err(|e| zstd_error("finish", e))?;
    Ok(output_buf)
}

/// Decompresses a Zstandard frame, refusing to produce more than `max_len` bytes.
///
/// The output grows as data arrives rather than being pre-allocated, so a
/// hostile size bound cannot force a large allocation up front.
pub fn decode(input_bytes: &[u8], max_len: usize) -> Result<Vec<u8>, DepthError> {
    let decoder = Decoder::new(input_bytes).map_err(|e| zstd_error("init decoder", e))?;
    let mut output_buf = Vec::new();
    decoder
        .take(max_len as u64 + 1)
        .read_to_end(&mut output_buf)
        .map_err(|e| zstd_error("decompress", e))?;

    if output_buf.len() > max_len {
        return Err(DepthError::WrongFormat(format!(
            "Zstd payload expands beyond the {} bytes the header allows",
            max_len
        )));
    }
    Ok(output_buf)
}

fn zstd_error(stage: &str, err: std::io::Error) -> DepthError {
    DepthError::WrongFormat(format!("Zstd {} failed: {}", stage, err))
}

//==================================================================================
// 2. Backend Adapter
//==================================================================================

/// The default `ByteCodecBackend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZstdBackend {
    level: i32,
}

impl ZstdBackend {
    pub fn new(level: i32) -> Self {
        Self { level }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdBackend {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}

impl ByteCodecBackend for ZstdBackend {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, DepthError> {
        encode(input, self.level)
    }

    fn decompress(&self, input: &[u8], max_output_len: usize) -> Result<Vec<u8>, DepthError> {
        decode(input, max_output_len)
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zstd_roundtrip_simple_text() {
        let original_bytes =
            b"hello world, this is a test of zstd compression. hello world, this is a test."
                .to_vec();
        let compressed_bytes = encode(&original_bytes, 3).unwrap();
        assert!(compressed_bytes.len() < original_bytes.len());

        let decompressed_bytes = decode(&compressed_bytes, original_bytes.len()).unwrap();
        assert_eq!(original_bytes, decompressed_bytes);
    }

    #[test]
    fn test_zstd_roundtrip_highly_compressible_data() {
        let original_bytes = vec![0x40u8; 10_000];
        let compressed_bytes = encode(&original_bytes, DEFAULT_LEVEL).unwrap();
        assert!(compressed_bytes.len() < 50);

        let decompressed_bytes = decode(&compressed_bytes, 10_000).unwrap();
        assert_eq!(original_bytes, decompressed_bytes);
    }

    #[test]
    fn test_zstd_decompress_invalid_data() {
        let result = decode(&[1, 2, 3, 4, 5], 1024);
        assert!(matches!(result, Err(DepthError::WrongFormat(_))));
    }

    #[test]
    fn test_zstd_decompress_respects_bound() {
        let compressed = encode(&vec![7u8; 4096], DEFAULT_LEVEL).unwrap();
        let result = decode(&compressed, 4095);
        assert!(matches!(result, Err(DepthError::WrongFormat(_))));
        assert_eq!(decode(&compressed, 4096).unwrap().len(), 4096);
    }

    #[test]
    fn test_backend_adapter_roundtrip() {
        let backend = ZstdBackend::new(5);
        assert_eq!(backend.level(), 5);
        let data: Vec<u8> = (0..=255u8).cycle().take(2000).collect();
        let packed = backend.compress(&data).unwrap();
        assert_eq!(backend.decompress(&packed, data.len()).unwrap(), data);
    }
}
