//! This module contains the pure, stateless kernels for Zig-zag encoding of
//! temporal residuals.
//!
//! A residual is `current - previous` for two in-range depth samples, so it lies
//! in `(-65536, 65536)`. Zig-zag folds the sign into the low bit, which keeps
//! small positive and negative changes equally cheap for the bit packer.

use crate::error::DepthError;

/// Encodes a single signed residual using the Zig-zag algorithm.
#[inline]
pub fn encode_val(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Decodes a single unsigned value back to its signed representation.
#[inline]
pub fn decode_val(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Zig-zagged temporal residual `current - previous`, if it fits in 16 bits.
#[inline]
pub fn residual(current: u16, previous: u16) -> Option<u16> {
    u16::try_from(encode_val(current as i32 - previous as i32)).ok()
}

/// Applies a zig-zagged residual to `previous`, rejecting results outside `u16`.
#[inline]
pub fn apply_residual(previous: u16, residual: u16) -> Result<u16, DepthError> {
    let value = previous as i32 + decode_val(residual as u32);
    u16::try_from(value).map_err(|_| {
        DepthError::WrongFormat(format!(
            "Temporal residual {} applied to {} leaves the sample range",
            residual, previous
        ))
    })
}

/// Residuals for a whole block. `None` when any residual needs more than 16 bits.
pub fn encode_block(current: &[u16], previous: &[u16], out: &mut [u16]) -> Option<()> {
    for ((slot, &c), &p) in out.iter_mut().zip(current).zip(previous) {
        *slot = residual(c, p)?;
    }
    Some(())
}

/// Inverse of `encode_block`, in place over `residuals`.
pub fn decode_block(previous: &[u16], residuals: &mut [u16]) -> Result<(), DepthError> {
    for (slot, &p) in residuals.iter_mut().zip(previous) {
        *slot = apply_residual(p, *slot)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_known_values() {
        assert_eq!(encode_val(0), 0);
        assert_eq!(encode_val(-1), 1);
        assert_eq!(encode_val(1), 2);
        assert_eq!(encode_val(-2), 3);
        for n in [-8191, -1, 0, 1, 4000, 8190] {
            assert_eq!(decode_val(encode_val(n)), n);
        }
    }

    #[test]
    fn test_residual_within_depth_ranges_fits() {
        assert_eq!(residual(8190, 0), Some(16380));
        assert_eq!(residual(0, 8190), Some(16379));
        assert_eq!(residual(40000, 0), None);
    }

    #[test]
    fn test_block_roundtrip() {
        let previous = [100u16, 200, 300, 0];
        let current = [101u16, 199, 300, 4000];
        let mut res = [0u16; 4];
        encode_block(&current, &previous, &mut res).unwrap();
        assert_eq!(res, [2, 1, 0, 8000]);
        decode_block(&previous, &mut res).unwrap();
        assert_eq!(res, current);
    }

    #[test]
    fn test_apply_residual_rejects_underflow() {
        // residual 1 decodes to -1
        assert!(matches!(apply_residual(0, 1), Err(DepthError::WrongFormat(_))));
    }
}
