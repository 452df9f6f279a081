//! The canonical, validated representation of a single-channel 16-bit depth image.

use crate::error::DepthError;
use crate::frame_pipeline::partition::validate_dimensions;

/// A row-major grid of 16-bit depth samples.
///
/// Construction checks both the block-grid alignment of the dimensions and that
/// `samples.len() == width * height`, so every `DepthFrame` in circulation is
/// encodable as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthFrame {
    width: u32,
    height: u32,
    samples: Vec<u16>,
}

impl DepthFrame {
    /// Wraps a sample buffer after validating it against the given dimensions.
    pub fn new(width: u32, height: u32, samples: Vec<u16>) -> Result<Self, DepthError> {
        let expected = validate_dimensions(width, height)?;
        if samples.len() != expected {
            return Err(DepthError::InvalidSampleCount {
                expected,
                got: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// A frame whose every sample is zero.
    pub fn zeroed(width: u32, height: u32) -> Result<Self, DepthError> {
        let len = validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            samples: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// The sample at column `x` of row `y`, if it lies inside the frame.
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn into_samples(self) -> Vec<u16> {
        self.samples
    }

    /// Splits the frame into `(width, height, samples)`.
    pub fn into_parts(self) -> (u32, u32, Vec<u16>) {
        (self.width, self.height, self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_sample_count() {
        let result = DepthFrame::new(16, 8, vec![0; 127]);
        assert!(matches!(
            result,
            Err(DepthError::InvalidSampleCount { expected: 128, got: 127 })
        ));
    }

    #[test]
    fn test_new_rejects_unaligned_dimensions() {
        let result = DepthFrame::new(12, 8, vec![0; 96]);
        assert!(matches!(result, Err(DepthError::InvalidDimensions { width: 12, height: 8 })));
    }

    #[test]
    fn test_get_is_row_major() {
        let samples: Vec<u16> = (0..128).collect();
        let frame = DepthFrame::new(16, 8, samples).unwrap();
        assert_eq!(frame.get(0, 0), Some(0));
        assert_eq!(frame.get(15, 0), Some(15));
        assert_eq!(frame.get(0, 1), Some(16));
        assert_eq!(frame.get(16, 0), None);
        assert_eq!(frame.get(0, 8), None);
    }

    #[test]
    fn test_into_parts_returns_what_was_given() {
        let frame = DepthFrame::zeroed(8, 16).unwrap();
        let (w, h, samples) = frame.into_parts();
        assert_eq!((w, h), (8, 16));
        assert!(samples.iter().all(|&s| s == 0));
    }
}
