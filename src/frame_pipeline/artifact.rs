//! Defines the self-describing byte format of a single compressed depth frame.
//! This module is the single source of truth for header serialization,
//! deserialization, and efficient header peeking.
//!
//! ```text
//! offset size field
//!   0     2   magic  "ZD"
//!   2     1   format version
//!   3     1   encode mode code
//!   4     2   width  (u16 LE)
//!   6     2   height (u16 LE)
//!   8     1   flags  (bit 0: keyframe)
//!   9     1   reserved, zero
//!  10     2   frame number (u16 LE)
//!  12     4   payload length (u32 LE)
//!  16     ..  payload (zstd-compressed block stream)
//! ```

use std::io::{Cursor, Read, Write};

use crate::error::DepthError;
use crate::frame_pipeline::partition::validate_dimensions;
use crate::profile::EncodeMode;

//==================================================================================
// Format Constants
//==================================================================================

/// The magic number that starts every frame.
pub const FRAME_MAGIC: &[u8; 2] = b"ZD";
/// The current version of the frame format.
pub const FRAME_FORMAT_VERSION: u8 = 1;
/// Fixed size of the header in bytes.
pub const HEADER_LEN: usize = 16;

const FLAG_KEYFRAME: u8 = 0x01;

//==================================================================================
// Public Structs
//==================================================================================

/// The parsed, validated fixed header of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub mode: EncodeMode,
    pub width: u32,
    pub height: u32,
    pub keyframe: bool,
    pub frame_number: u16,
    pub payload_len: u32,
}

impl FrameHeader {
    /// Appends the header to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), DepthError> {
        let width = u16::try_from(self.width)
            .map_err(|_| DepthError::InvalidDimensions { width: self.width, height: self.height })?;
        let height = u16::try_from(self.height)
            .map_err(|_| DepthError::InvalidDimensions { width: self.width, height: self.height })?;

        writer.write_all(FRAME_MAGIC)?;
        writer.write_all(&[FRAME_FORMAT_VERSION, self.mode.code()])?;
        writer.write_all(&width.to_le_bytes())?;
        writer.write_all(&height.to_le_bytes())?;
        let flags = if self.keyframe { FLAG_KEYFRAME } else { 0 };
        writer.write_all(&[flags, 0])?;
        writer.write_all(&self.frame_number.to_le_bytes())?;
        writer.write_all(&self.payload_len.to_le_bytes())?;
        Ok(())
    }

    /// Parses and validates the header at the front of `bytes`.
    ///
    /// Checks, in order: header length, magic, version, mode, dimensions, flags,
    /// and finally that the declared payload fits in what remains.
    pub fn peek(bytes: &[u8]) -> Result<Self, DepthError> {
        if bytes.len() < HEADER_LEN {
            return Err(DepthError::truncated(HEADER_LEN, bytes.len()));
        }

        let mut cursor = Cursor::new(&bytes[..HEADER_LEN]);

        let mut magic = [0u8; 2];
        cursor.read_exact(&mut magic)?;
        if magic != *FRAME_MAGIC {
            return Err(DepthError::WrongFormat("Invalid frame magic number".into()));
        }

        let version = read_u8(&mut cursor)?;
        if version != FRAME_FORMAT_VERSION {
            return Err(DepthError::WrongFormat(format!(
                "Unsupported frame version: expected {}, got {}",
                FRAME_FORMAT_VERSION, version
            )));
        }

        let mode_code = read_u8(&mut cursor)?;
        let mode = EncodeMode::from_code(mode_code).map_err(|_| {
            DepthError::WrongFormat(format!("Unrecognized encode mode code {}", mode_code))
        })?;

        let width = read_u16(&mut cursor)? as u32;
        let height = read_u16(&mut cursor)? as u32;
        validate_dimensions(width, height)?;

        let flags = read_u8(&mut cursor)?;
        let reserved = read_u8(&mut cursor)?;
        if flags & !FLAG_KEYFRAME != 0 || reserved != 0 {
            return Err(DepthError::WrongFormat(format!(
                "Unknown header flags 0x{:02x}/0x{:02x}",
                flags, reserved
            )));
        }

        let frame_number = read_u16(&mut cursor)?;
        let mut u32_buf = [0u8; 4];
        cursor.read_exact(&mut u32_buf)?;
        let payload_len = u32::from_le_bytes(u32_buf);

        // SECURITY: Never trust the declared length beyond the bytes actually present.
        let available = bytes.len() - HEADER_LEN;
        if payload_len as usize > available {
            return Err(DepthError::truncated(
                HEADER_LEN + payload_len as usize,
                bytes.len(),
            ));
        }

        Ok(Self {
            mode,
            width,
            height,
            keyframe: flags & FLAG_KEYFRAME != 0,
            frame_number,
            payload_len,
        })
    }
}

/// Writes `header` (with its payload length filled in) followed by `payload`.
pub fn write_frame(mut header: FrameHeader, payload: &[u8]) -> Result<Vec<u8>, DepthError> {
    header.payload_len = u32::try_from(payload.len())
        .map_err(|_| DepthError::WrongFormat("Payload exceeds u32 length".into()))?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    header.write_to(&mut out)?;
    out.extend_from_slice(payload);
    Ok(out)
}

/// Splits a full frame into its header and payload slice.
///
/// The frame must be exactly header plus payload; trailing bytes are rejected.
pub fn read_frame(bytes: &[u8]) -> Result<(FrameHeader, &[u8]), DepthError> {
    let header = FrameHeader::peek(bytes)?;
    let end = HEADER_LEN + header.payload_len as usize;
    if bytes.len() != end {
        return Err(DepthError::WrongFormat(format!(
            "{} trailing bytes after frame payload",
            bytes.len() - end
        )));
    }
    Ok((header, &bytes[HEADER_LEN..end]))
}

//==================================================================================
// Private Helpers
//==================================================================================

fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, DepthError> {
    let mut buf = [0u8; 1];
    cursor.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16, DepthError> {
    let mut buf = [0u8; 2];
    cursor.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_header() -> FrameHeader {
        FrameHeader {
            mode: EncodeMode::NotQuantized2047mm,
            width: 640,
            height: 480,
            keyframe: true,
            frame_number: 7,
            payload_len: 0,
        }
    }

    #[test]
    fn test_header_roundtrip_is_successful() {
        let bytes = write_frame(test_header(), &[1, 2, 3]).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 3);

        let (header, payload) = read_frame(&bytes).unwrap();
        assert_eq!(header, FrameHeader { payload_len: 3, ..test_header() });
        assert_eq!(payload, &[1, 2, 3]);
    }

    #[test]
    fn test_layout_is_fixed() {
        let bytes = write_frame(test_header(), &[9; 5]).unwrap();
        assert_eq!(&bytes[0..2], b"ZD");
        assert_eq!(bytes[2], FRAME_FORMAT_VERSION);
        assert_eq!(bytes[3], 2);
        assert_eq!(&bytes[4..6], &640u16.to_le_bytes());
        assert_eq!(&bytes[6..8], &480u16.to_le_bytes());
        assert_eq!(bytes[8], 1);
        assert_eq!(bytes[9], 0);
        assert_eq!(&bytes[10..12], &7u16.to_le_bytes());
        assert_eq!(&bytes[12..16], &5u32.to_le_bytes());
    }

    #[test]
    fn test_every_prefix_is_truncated() {
        let bytes = write_frame(test_header(), &[0xAB; 10]).unwrap();
        for cut in 0..bytes.len() {
            assert!(
                matches!(read_frame(&bytes[..cut]), Err(DepthError::Truncated { .. })),
                "prefix {cut}"
            );
        }
    }

    #[test]
    fn test_parsing_errors_are_handled_gracefully() {
        let good = write_frame(test_header(), &[0; 4]).unwrap();

        let mut bad_magic = good.clone();
        bad_magic[0] = b'X';
        assert!(matches!(read_frame(&bad_magic), Err(DepthError::WrongFormat(_))));

        let mut bad_version = good.clone();
        bad_version[2] = 0xFF;
        assert!(matches!(read_frame(&bad_version), Err(DepthError::WrongFormat(_))));

        let mut bad_mode = good.clone();
        bad_mode[3] = 42;
        assert!(matches!(read_frame(&bad_mode), Err(DepthError::WrongFormat(_))));

        let mut bad_flags = good.clone();
        bad_flags[8] = 0x03;
        assert!(matches!(read_frame(&bad_flags), Err(DepthError::WrongFormat(_))));

        let mut trailing = good.clone();
        trailing.push(0);
        assert!(matches!(read_frame(&trailing), Err(DepthError::WrongFormat(_))));
    }

    #[test]
    fn test_unaligned_dimensions_are_rejected() {
        let mut bytes = write_frame(test_header(), &[]).unwrap();
        bytes[4..6].copy_from_slice(&641u16.to_le_bytes());
        assert!(matches!(
            read_frame(&bytes),
            Err(DepthError::InvalidDimensions { width: 641, height: 480 })
        ));
    }

    #[test]
    fn test_oversized_payload_length_is_truncated() {
        let mut bytes = write_frame(test_header(), &[0; 4]).unwrap();
        bytes[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(read_frame(&bytes), Err(DepthError::Truncated { .. })));
    }
}
