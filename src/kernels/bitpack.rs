//! This module contains the pure, stateless kernels for fixed-width bit-packing
//! and unpacking of block deltas.
//!
//! Values are packed LSB-first into a byte buffer with no padding between them.
//! A bit width of zero is legal and packs to zero bytes (every value is zero).

use bitvec::prelude::*;
use num_traits::{PrimInt, ToPrimitive, Unsigned};
use std::convert::TryFrom;

use crate::error::DepthError;

/// The widest legal bit width for depth samples.
pub const MAX_BIT_WIDTH: u8 = 16;

//==================================================================================
// 1. Sizing Helpers
//==================================================================================

/// Smallest bit width able to represent `max_value`.
#[inline]
pub fn bit_width_for(max_value: u16) -> u8 {
    (u16::BITS - max_value.leading_zeros()) as u8
}

/// Bytes occupied by `num_values` values packed at `bit_width`.
#[inline]
pub fn packed_len(num_values: usize, bit_width: u8) -> usize {
    (num_values * bit_width as usize).div_ceil(8)
}

//==================================================================================
// 2. Generic Core Logic (The "Engine")
//==================================================================================

/// Appends `data` packed at `bit_width` bits per value to `output_buf`.
pub fn encode<T>(data: &[T], bit_width: u8, output_buf: &mut Vec<u8>) -> Result<(), DepthError>
where
    T: PrimInt + Unsigned + ToPrimitive,
{
    if bit_width > MAX_BIT_WIDTH || bit_width as usize > std::mem::size_of::<T>() * 8 {
        return Err(DepthError::WrongFormat(format!(
            "Bit width {} out of range",
            bit_width
        )));
    }
    if bit_width == 0 {
        return match data.iter().find(|v| !v.is_zero()) {
            Some(v) => Err(exceeds_width(v.to_u64().unwrap_or(u64::MAX), 0)),
            None => Ok(()),
        };
    }

    let max_val = (1u64 << bit_width) - 1;
    let mut bit_vec = BitVec::<u8, Lsb0>::with_capacity(data.len() * bit_width as usize);

    for &val in data {
        let val_u64 = val.to_u64().unwrap_or(u64::MAX);
        if val_u64 > max_val {
            return Err(exceeds_width(val_u64, bit_width));
        }
        bit_vec.extend_from_bitslice(&val_u64.view_bits::<Lsb0>()[..bit_width as usize]);
    }

    output_buf.extend_from_slice(bit_vec.as_raw_slice());
    Ok(())
}

/// Unpacks `out.len()` values of `bit_width` bits from the front of `input_bytes`.
///
/// Bytes beyond the packed length are ignored; the caller owns framing.
pub fn decode<T>(input_bytes: &[u8], bit_width: u8, out: &mut [T]) -> Result<(), DepthError>
where
    T: PrimInt + Unsigned + TryFrom<u64>,
{
    if bit_width > MAX_BIT_WIDTH || bit_width as usize > std::mem::size_of::<T>() * 8 {
        return Err(DepthError::WrongFormat(format!(
            "Bit width {} out of range",
            bit_width
        )));
    }
    if bit_width == 0 {
        out.iter_mut().for_each(|v| *v = T::zero());
        return Ok(());
    }

    let needed = packed_len(out.len(), bit_width);
    if input_bytes.len() < needed {
        return Err(DepthError::truncated(needed, input_bytes.len()));
    }

    let bits = BitSlice::<u8, Lsb0>::from_slice(&input_bytes[..needed]);
    for (slot, chunk) in out.iter_mut().zip(bits.chunks(bit_width as usize)) {
        let mut container = 0u64;
        for (i, bit) in chunk.iter().by_vals().enumerate() {
            if bit {
                container |= 1 << i;
            }
        }
        *slot = T::try_from(container).map_err(|_| exceeds_width(container, bit_width))?;
    }
    Ok(())
}

fn exceeds_width(value: u64, bit_width: u8) -> DepthError {
    DepthError::WrongFormat(format!(
        "Value {} exceeds bit width {}",
        value, bit_width
    ))
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
