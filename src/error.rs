// In: src/error.rs

//! This module defines the single, unified error type for the entire zdepth library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every error collapses into one of the closed `DepthResult` codes, so callers
//! that only care about the outcome class never have to match on messages.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepthError {
    // =========================================================================
    // === Encode-side validation
    // =========================================================================
    #[error("Invalid frame dimensions {width}x{height}: both must be positive multiples of the block size")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Sample buffer length mismatch: expected {expected}, got {got}")]
    InvalidSampleCount { expected: usize, got: usize },

    #[error("Unknown encode mode code: {0}")]
    UnknownMode(u8),

    #[error("Invalid codec configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // === Decode-side validation
    // =========================================================================
    #[error("Malformed bitstream: {0}")]
    WrongFormat(String),

    #[error("Truncated bitstream: needed {needed} bytes, only {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("Missing temporal reference: {0}")]
    MissingReference(String),
}

//==================================================================================
// Result Codes
//==================================================================================

/// The closed outcome taxonomy reported to callers and loggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthResult {
    Success,
    InvalidDimensions,
    UnknownMode,
    WrongFormat,
    Truncated,
    MissingReference,
}

impl DepthResult {
    /// Human-readable name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            DepthResult::Success => "Success",
            DepthResult::InvalidDimensions => "InvalidDimensions",
            DepthResult::UnknownMode => "UnknownMode",
            DepthResult::WrongFormat => "WrongFormat",
            DepthResult::Truncated => "Truncated",
            DepthResult::MissingReference => "MissingReference",
        }
    }

    /// Collapses any codec result into its outcome code.
    pub fn of<T>(result: &Result<T, DepthError>) -> Self {
        match result {
            Ok(_) => DepthResult::Success,
            Err(e) => e.result(),
        }
    }
}

impl fmt::Display for DepthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DepthError {
    /// The result code this error is reported under.
    pub fn result(&self) -> DepthResult {
        match self {
            DepthError::InvalidDimensions { .. } | DepthError::InvalidSampleCount { .. } => {
                DepthResult::InvalidDimensions
            }
            DepthError::UnknownMode(_) => DepthResult::UnknownMode,
            DepthError::InvalidConfig(_) | DepthError::WrongFormat(_) => DepthResult::WrongFormat,
            DepthError::Truncated { .. } => DepthResult::Truncated,
            DepthError::MissingReference(_) => DepthResult::MissingReference,
        }
    }

    /// Shorthand used by readers when `needed` bytes are required but fewer remain.
    pub(crate) fn truncated(needed: usize, available: usize) -> Self {
        DepthError::Truncated { needed, available }
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<std::io::Error> for DepthError {
    fn from(err: std::io::Error) -> Self {
        DepthError::WrongFormat(err.to_string())
    }
}

impl From<serde_json::Error> for DepthError {
    fn from(err: serde_json::Error) -> Self {
        DepthError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_maps_to_a_failure_code() {
        let errors = vec![
            DepthError::InvalidDimensions { width: 7, height: 8 },
            DepthError::InvalidSampleCount { expected: 64, got: 63 },
            DepthError::UnknownMode(9),
            DepthError::InvalidConfig("bad".into()),
            DepthError::WrongFormat("bad".into()),
            DepthError::truncated(16, 3),
            DepthError::MissingReference("none".into()),
        ];
        for e in errors {
            assert_ne!(e.result(), DepthResult::Success, "{e}");
        }
    }

    #[test]
    fn test_result_of_and_names() {
        let ok: Result<(), DepthError> = Ok(());
        assert_eq!(DepthResult::of(&ok), DepthResult::Success);

        let err: Result<(), DepthError> = Err(DepthError::truncated(10, 2));
        assert_eq!(DepthResult::of(&err), DepthResult::Truncated);
        assert_eq!(DepthResult::Truncated.to_string(), "Truncated");
        assert_eq!(DepthResult::MissingReference.as_str(), "MissingReference");
    }

    #[test]
    fn test_io_errors_surface_as_wrong_format() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "corrupt");
        let e: DepthError = io.into();
        assert_eq!(e.result(), DepthResult::WrongFormat);
    }
}
