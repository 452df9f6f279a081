//! This file is the root of the `zdepth` Rust crate: a lossless-within-range
//! codec for 16-bit depth camera frames.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`frame_pipeline`,
//!     `kernels`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the small public surface most callers need.
//!
//! ```
//! use zdepth::{DepthCompressor, EncodeMode};
//!
//! let samples = vec![1200u16; 64 * 48];
//! let mut encoder = DepthCompressor::new();
//! encoder.set_encode_mode(EncodeMode::NotQuantized2047mm);
//! let bytes = encoder.compress(64, 48, &samples, true).unwrap();
//!
//! let mut decoder = DepthCompressor::new();
//! let frame = decoder.decompress(&bytes).unwrap();
//! assert_eq!(frame.samples(), &samples[..]);
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod error;
pub mod frame_pipeline;
pub mod kernels;
pub mod profile;
pub mod traits;
pub mod types;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use bridge::{compress_keyframe, decompress_keyframe, peek_header, DepthCompressor};
pub use config::CodecConfig;
pub use error::{DepthError, DepthResult};
pub use frame_pipeline::{FrameHeader, FrameStats};
pub use observability::enable_verbose_logging;
pub use profile::{cutoff_depth, EncodeMode, QuantizationCurve};
pub use traits::ByteCodecBackend;
pub use types::DepthFrame;
