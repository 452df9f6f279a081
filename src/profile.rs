//! The range profile: a closed, compile-time lookup table from `EncodeMode` to
//! its cutoff depth and optional quantization curve.
//!
//! The mode set is part of the wire format. Adding a variant means assigning it
//! a new, never-reused code in `EncodeMode::code`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DepthError;

//==================================================================================
// 1. The Mode Enumeration
//==================================================================================

/// Selects the sensing range (and, for quantized modes, the precision curve)
/// used to encode a frame.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EncodeMode {
    #[serde(rename = "not_quantized_511mm")]
    NotQuantized511mm,
    #[serde(rename = "not_quantized_1023mm")]
    NotQuantized1023mm,
    #[serde(rename = "not_quantized_2047mm")]
    NotQuantized2047mm,
    #[default]
    #[serde(rename = "not_quantized_4095mm")]
    NotQuantized4095mm,
    #[serde(rename = "not_quantized_8191mm")]
    NotQuantized8191mm,
}

/// Every mode, in code order.
pub const ALL_MODES: [EncodeMode; 5] = [
    EncodeMode::NotQuantized511mm,
    EncodeMode::NotQuantized1023mm,
    EncodeMode::NotQuantized2047mm,
    EncodeMode::NotQuantized4095mm,
    EncodeMode::NotQuantized8191mm,
];

impl EncodeMode {
    /// The one-byte code written into the bitstream header.
    pub fn code(self) -> u8 {
        match self {
            EncodeMode::NotQuantized511mm => 0,
            EncodeMode::NotQuantized1023mm => 1,
            EncodeMode::NotQuantized2047mm => 2,
            EncodeMode::NotQuantized4095mm => 3,
            EncodeMode::NotQuantized8191mm => 4,
        }
    }

    /// Resolves a wire code. Unrecognized codes fail; there is no fallback mode.
    pub fn from_code(code: u8) -> Result<Self, DepthError> {
        ALL_MODES
            .iter()
            .copied()
            .find(|m| m.code() == code)
            .ok_or(DepthError::UnknownMode(code))
    }

    /// Samples at or above this value are out of sensing range.
    pub fn cutoff_depth(self) -> u16 {
        cutoff_depth(self)
    }

    pub fn quantization_curve(self) -> Option<&'static dyn QuantizationCurve> {
        quantization_curve(self)
    }

    pub fn name(self) -> &'static str {
        match self {
            EncodeMode::NotQuantized511mm => "NotQuantized511mm",
            EncodeMode::NotQuantized1023mm => "NotQuantized1023mm",
            EncodeMode::NotQuantized2047mm => "NotQuantized2047mm",
            EncodeMode::NotQuantized4095mm => "NotQuantized4095mm",
            EncodeMode::NotQuantized8191mm => "NotQuantized8191mm",
        }
    }
}

impl fmt::Display for EncodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for EncodeMode {
    type Error = DepthError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        EncodeMode::from_code(code)
    }
}

//==================================================================================
// 2. The Lookup Table
//==================================================================================

/// The exclusive upper bound of valid depth values for `mode`.
pub const fn cutoff_depth(mode: EncodeMode) -> u16 {
    match mode {
        EncodeMode::NotQuantized511mm => 511,
        EncodeMode::NotQuantized1023mm => 1023,
        EncodeMode::NotQuantized2047mm => 2047,
        EncodeMode::NotQuantized4095mm => 4095,
        EncodeMode::NotQuantized8191mm => 8191,
    }
}

/// The quantization curve of `mode`, or `None` for pass-through modes.
///
/// All shipped modes are pass-through.
pub fn quantization_curve(mode: EncodeMode) -> Option<&'static dyn QuantizationCurve> {
    match mode {
        EncodeMode::NotQuantized511mm
        | EncodeMode::NotQuantized1023mm
        | EncodeMode::NotQuantized2047mm
        | EncodeMode::NotQuantized4095mm
        | EncodeMode::NotQuantized8191mm => None,
    }
}

//==================================================================================
// 3. Quantization Seam
//==================================================================================

/// A monotonic mapping from in-range depth values to a (usually narrower)
/// code space, and its inverse.
///
/// Implementations must keep `forward(v) < forward(cutoff)` for every
/// `v < cutoff` and must never map a non-zero depth to zero, so that the
/// out-of-range sentinel stays unambiguous.
pub trait QuantizationCurve: Send + Sync {
    fn forward(&self, depth: u16) -> u16;
    fn inverse(&self, code: u16) -> u16;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_table_matches_sensing_ranges() {
        let cutoffs: Vec<u16> = ALL_MODES.iter().map(|m| m.cutoff_depth()).collect();
        assert_eq!(cutoffs, vec![511, 1023, 2047, 4095, 8191]);
    }

    #[test]
    fn test_codes_are_unique_and_resolvable() {
        for mode in ALL_MODES {
            assert_eq!(EncodeMode::from_code(mode.code()).unwrap(), mode);
        }
        assert!(matches!(EncodeMode::from_code(5), Err(DepthError::UnknownMode(5))));
        assert!(matches!(EncodeMode::try_from(255u8), Err(DepthError::UnknownMode(255))));
    }

    #[test]
    fn test_shipped_modes_are_pass_through() {
        assert!(ALL_MODES.iter().all(|m| m.quantization_curve().is_none()));
    }

    #[test]
    fn test_names_and_serde_names() {
        assert_eq!(EncodeMode::NotQuantized511mm.to_string(), "NotQuantized511mm");
        let json = serde_json::to_string(&EncodeMode::NotQuantized2047mm).unwrap();
        assert_eq!(json, "\"not_quantized_2047mm\"");
        let back: EncodeMode = serde_json::from_str("\"not_quantized_8191mm\"").unwrap();
        assert_eq!(back, EncodeMode::NotQuantized8191mm);
        assert!(serde_json::from_str::<EncodeMode>("\"quantized_9999mm\"").is_err());
    }
}
