//! Divides a frame into fixed-size square blocks and enumerates them in
//! row-major order. Pure functions of the frame dimensions.

use crate::error::DepthError;

/// Edge length of a block, in samples.
pub const BLOCK_SIZE: u32 = 8;
/// Samples per block.
pub const BLOCK_AREA: usize = (BLOCK_SIZE * BLOCK_SIZE) as usize;
/// Upper bound on either frame dimension, accepted by encoder and decoder alike.
pub const MAX_DIMENSION: u32 = 8192;

/// Checks that `width` and `height` are positive multiples of `BLOCK_SIZE`
/// no larger than `MAX_DIMENSION`, returning the sample count on success.
///
/// Runs before anything is allocated for the frame.
pub fn validate_dimensions(width: u32, height: u32) -> Result<usize, DepthError> {
    let ok = |d: u32| d > 0 && d % BLOCK_SIZE == 0 && d <= MAX_DIMENSION;
    if !ok(width) || !ok(height) {
        return Err(DepthError::InvalidDimensions { width, height });
    }
    Ok(width as usize * height as usize)
}

/// The address of one block within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCoord {
    pub block_row: u32,
    pub block_col: u32,
}

impl BlockCoord {
    /// Index of the block's first sample in the frame's row-major buffer.
    fn origin(&self, frame_width: u32) -> usize {
        (self.block_row * BLOCK_SIZE) as usize * frame_width as usize
            + (self.block_col * BLOCK_SIZE) as usize
    }
}

/// A validated block grid for a `width`x`height` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGrid {
    width: u32,
    blocks_x: u32,
    blocks_y: u32,
}

impl BlockGrid {
    pub fn new(width: u32, height: u32) -> Result<Self, DepthError> {
        validate_dimensions(width, height)?;
        Ok(Self {
            width,
            blocks_x: width / BLOCK_SIZE,
            blocks_y: height / BLOCK_SIZE,
        })
    }

    pub fn block_count(&self) -> usize {
        self.blocks_x as usize * self.blocks_y as usize
    }

    /// All blocks, row-major. Restartable: each call yields the same sequence.
    pub fn blocks(&self) -> impl Iterator<Item = BlockCoord> + '_ {
        (0..self.blocks_y).flat_map(move |block_row| {
            (0..self.blocks_x).map(move |block_col| BlockCoord {
                block_row,
                block_col,
            })
        })
    }

    /// Copies the block at `coord` out of `samples` into `out`.
    pub fn gather(&self, samples: &[u16], coord: BlockCoord, out: &mut [u16; BLOCK_AREA]) {
        let origin = coord.origin(self.width);
        let stride = self.width as usize;
        let edge = BLOCK_SIZE as usize;
        for (row, dst) in out.chunks_exact_mut(edge).enumerate() {
            let start = origin + row * stride;
            dst.copy_from_slice(&samples[start..start + edge]);
        }
    }

    /// Writes `block` into `samples` at `coord`.
    pub fn scatter(&self, samples: &mut [u16], coord: BlockCoord, block: &[u16; BLOCK_AREA]) {
        let origin = coord.origin(self.width);
        let stride = self.width as usize;
        let edge = BLOCK_SIZE as usize;
        for (row, src) in block.chunks_exact(edge).enumerate() {
            let start = origin + row * stride;
            samples[start..start + edge].copy_from_slice(src);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_unaligned_and_zero() {
        for (w, h) in [(0, 8), (8, 0), (12, 16), (16, 20), (1, 1), (8200, 8)] {
            assert!(
                matches!(
                    validate_dimensions(w, h),
                    Err(DepthError::InvalidDimensions { .. })
                ),
                "{w}x{h} should be rejected"
            );
        }
        assert_eq!(validate_dimensions(16, 24).unwrap(), 384);
        assert_eq!(validate_dimensions(MAX_DIMENSION, 8).unwrap(), 8192 * 8);
    }

    #[test]
    fn test_blocks_are_row_major() {
        let grid = BlockGrid::new(24, 16).unwrap();
        let coords: Vec<(u32, u32)> = grid.blocks().map(|c| (c.block_row, c.block_col)).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(grid.block_count(), 6);
        // Restartable.
        assert_eq!(grid.blocks().count(), 6);
    }

    #[test]
    fn test_gather_then_scatter_reassembles_frame() {
        let width = 16u32;
        let height = 16u32;
        let samples: Vec<u16> = (0..(width * height) as u16).collect();
        let grid = BlockGrid::new(width, height).unwrap();

        let mut rebuilt = vec![0u16; samples.len()];
        let mut block = [0u16; BLOCK_AREA];
        for coord in grid.blocks() {
            grid.gather(&samples, coord, &mut block);
            grid.scatter(&mut rebuilt, coord, &block);
        }
        assert_eq!(rebuilt, samples);
    }

    #[test]
    fn test_gather_picks_the_right_tile() {
        let width = 16u32;
        let samples: Vec<u16> = (0..(width * 8) as u16).collect();
        let grid = BlockGrid::new(width, 8).unwrap();
        let mut block = [0u16; BLOCK_AREA];
        grid.gather(
            &samples,
            BlockCoord {
                block_row: 0,
                block_col: 1,
            },
            &mut block,
        );
        assert_eq!(block[0], 8);
        assert_eq!(block[7], 15);
        assert_eq!(block[8], 24);
    }
}
