//! Per-sample range policy. Maps raw depth samples onto the in-range domain
//! `[0, cutoff)`, collapsing everything else to the zero sentinel.
//!
//! The mapping is lossy for out-of-range samples only: a decoded zero can mean
//! either "measured zero" or "out of range".

use crate::profile::{EncodeMode, QuantizationCurve};

/// Classifies one sample: `(is_valid, canonical_value)`.
#[inline]
pub fn classify(sample: u16, cutoff: u16) -> (bool, u16) {
    let valid = sample < cutoff;
    (valid, if valid { sample } else { 0 })
}

/// The classifier for one encode mode.
#[derive(Clone, Copy)]
pub struct SampleClassifier {
    cutoff: u16,
    curve: Option<&'static dyn QuantizationCurve>,
}

impl SampleClassifier {
    pub fn for_mode(mode: EncodeMode) -> Self {
        Self {
            cutoff: mode.cutoff_depth(),
            curve: mode.quantization_curve(),
        }
    }

    /// A classifier with an explicit curve, bypassing the mode table.
    pub fn with_curve(cutoff: u16, curve: &'static dyn QuantizationCurve) -> Self {
        Self {
            cutoff,
            curve: Some(curve),
        }
    }

    pub fn cutoff(&self) -> u16 {
        self.cutoff
    }

    /// Exclusive upper bound on the values the block layer may see.
    pub fn code_limit(&self) -> u16 {
        match self.curve {
            None => self.cutoff,
            Some(curve) if self.cutoff == 0 => curve.forward(0),
            Some(curve) => curve.forward(self.cutoff - 1).saturating_add(1),
        }
    }

    /// Raw sample -> value handed to the block encoder.
    #[inline]
    pub fn canonicalize(&self, sample: u16) -> u16 {
        let (valid, value) = classify(sample, self.cutoff);
        match self.curve {
            Some(curve) if valid => curve.forward(value),
            _ => value,
        }
    }

    /// Decoded block value -> output sample.
    #[inline]
    pub fn restore(&self, code: u16) -> u16 {
        match self.curve {
            Some(curve) => curve.inverse(code),
            None => code,
        }
    }

    /// Builds the encoder's canonical working copy of a sample buffer.
    pub fn canonicalize_all(&self, samples: &[u16]) -> Vec<u16> {
        samples.iter().map(|&s| self.canonicalize(s)).collect()
    }

    /// Turns a buffer of decoded codes into output samples. Identity for
    /// pass-through modes.
    pub fn restore_all(&self, codes: &[u16]) -> Vec<u16> {
        match self.curve {
            None => codes.to_vec(),
            Some(_) => codes.iter().map(|&c| self.restore(c)).collect(),
        }
    }
}

impl std::fmt::Debug for SampleClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleClassifier")
            .field("cutoff", &self.cutoff)
            .field("quantized", &self.curve.is_some())
            .finish()
    }
}
