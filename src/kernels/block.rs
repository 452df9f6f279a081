//! This module contains the pure, stateless per-block transform: the
//! base-plus-delta coding of one 8x8 tile.
//!
//! On the wire a block is a one-byte descriptor, optionally followed by a
//! little-endian `u16` base and `64 * bit_width / 8` bytes of packed deltas:
//!
//! ```text
//!   descriptor:  T Z 0 W W W W W
//!                ^ ^   \_______/
//!                | |    bit width (0..=16)
//!                | all-zero: nothing follows
//!                temporal: values are residuals against the reference frame
//! ```

use crate::error::DepthError;
use crate::frame_pipeline::partition::BLOCK_AREA;
use crate::kernels::bitpack::{self, MAX_BIT_WIDTH};

const FLAG_TEMPORAL: u8 = 0x80;
const FLAG_ALL_ZERO: u8 = 0x40;
const RESERVED_BITS: u8 = 0x20;
const WIDTH_MASK: u8 = 0x1F;

/// Byte length of the base field.
const BASE_LEN: usize = 2;

/// Longest possible record: descriptor, base and 16-bit deltas.
pub const MAX_RECORD_LEN: usize = 1 + BASE_LEN + BLOCK_AREA * MAX_BIT_WIDTH as usize / 8;

/// One sample block, row-major.
pub type Block = [u16; BLOCK_AREA];

//==================================================================================
// 1. Descriptor
//==================================================================================

/// The parsed one-byte header of a block record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    pub temporal: bool,
    pub all_zero: bool,
    pub bit_width: u8,
}

impl BlockDescriptor {
    pub fn to_byte(self) -> u8 {
        let mut byte = self.bit_width & WIDTH_MASK;
        if self.temporal {
            byte |= FLAG_TEMPORAL;
        }
        if self.all_zero {
            byte |= FLAG_ALL_ZERO;
        }
        byte
    }

    pub fn from_byte(byte: u8) -> Result<Self, DepthError> {
        if byte & RESERVED_BITS != 0 {
            return Err(DepthError::WrongFormat(format!(
                "Reserved bit set in block descriptor 0x{:02x}",
                byte
            )));
        }
        let descriptor = Self {
            temporal: byte & FLAG_TEMPORAL != 0,
            all_zero: byte & FLAG_ALL_ZERO != 0,
            bit_width: byte & WIDTH_MASK,
        };
        if descriptor.bit_width > MAX_BIT_WIDTH {
            return Err(DepthError::WrongFormat(format!(
                "Block bit width {} exceeds {}",
                descriptor.bit_width, MAX_BIT_WIDTH
            )));
        }
        if descriptor.all_zero && descriptor.bit_width != 0 {
            return Err(DepthError::WrongFormat(
                "All-zero block carries a non-zero bit width".into(),
            ));
        }
        Ok(descriptor)
    }

    /// Total record length, descriptor byte included.
    pub fn record_len(self) -> usize {
        if self.all_zero {
            1
        } else {
            1 + BASE_LEN + bitpack::packed_len(BLOCK_AREA, self.bit_width)
        }
    }
}

//==================================================================================
// 2. Encoding
//==================================================================================

/// Descriptor that `encode` would emit for `values`.
pub fn describe(values: &Block, temporal: bool) -> BlockDescriptor {
    if values.iter().all(|&v| v == 0) {
        return BlockDescriptor {
            temporal,
            all_zero: true,
            bit_width: 0,
        };
    }
    let (min, max) = min_max(values);
    BlockDescriptor {
        temporal,
        all_zero: false,
        bit_width: bitpack::bit_width_for(max - min),
    }
}

/// Size in bytes of the record `encode` would emit, without building it.
pub fn encoded_len(values: &Block) -> usize {
    describe(values, false).record_len()
}

/// Appends the record for `values` to `out` and returns its descriptor.
pub fn encode(values: &Block, temporal: bool, out: &mut Vec<u8>) -> Result<BlockDescriptor, DepthError> {
    let descriptor = describe(values, temporal);
    out.push(descriptor.to_byte());
    if descriptor.all_zero {
        return Ok(descriptor);
    }

    let (base, _) = min_max(values);
    out.extend_from_slice(&base.to_le_bytes());

    let mut deltas = [0u16; BLOCK_AREA];
    for (d, &v) in deltas.iter_mut().zip(values.iter()) {
        *d = v - base;
    }
    bitpack::encode(&deltas[..], descriptor.bit_width, out)?;
    Ok(descriptor)
}

//==================================================================================
// 3. Decoding
//==================================================================================

/// Decodes one record from the front of `input` into `out`.
///
/// Returns the descriptor and the number of bytes consumed. On error `out`
/// holds no meaningful data.
pub fn decode(input: &[u8], out: &mut Block) -> Result<(BlockDescriptor, usize), DepthError> {
    let first = *input.first().ok_or_else(|| DepthError::truncated(1, 0))?;
    let descriptor = BlockDescriptor::from_byte(first)?;
    if descriptor.all_zero {
        out.fill(0);
        return Ok((descriptor, 1));
    }

    let record_len = descriptor.record_len();
    if input.len() < record_len {
        return Err(DepthError::truncated(record_len, input.len()));
    }

    let base = u16::from_le_bytes([input[1], input[2]]);
    bitpack::decode(&input[1 + BASE_LEN..record_len], descriptor.bit_width, &mut out[..])?;
    for v in out.iter_mut() {
        *v = v.checked_add(base).ok_or_else(|| {
            DepthError::WrongFormat(format!("Block base {} overflows the sample range", base))
        })?;
    }
    Ok((descriptor, record_len))
}

fn min_max(values: &Block) -> (u16, u16) {
    values
        .iter()
        .fold((u16::MAX, u16::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
