//! This module serves as the public API for the collection of all pure,
//! stateless transforms the frame pipeline is built from.

/// Per-block base-plus-delta coding.
pub mod block;

/// Bit-Width Reduction
pub mod bitpack;
pub mod zigzag;

/// Final Stage: Entropy Coding
pub mod zstd;
