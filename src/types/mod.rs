//! This module defines the core, strongly-typed data representations used
//! throughout the zdepth codec.
//!
//! It currently includes the canonical `DepthFrame`, the only in-memory image
//! type that crosses the public API in either direction.

pub mod depth_frame;

// Re-export the main type(s) for easier access.
pub use depth_frame::DepthFrame;
