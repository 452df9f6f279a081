// In: src/bridge/compressor.rs

//! The stateful facade. A `DepthCompressor` owns one stream's worth of state:
//! the active configuration, the frame counter, and a temporal reference for
//! each direction.
//!
//! The encode and decode chains are independent, so one instance may both
//! produce one stream and consume another. Keep one instance per stream pair;
//! the `&mut self` receivers rule out sharing an instance across threads
//! without external locking.

use crate::config::CodecConfig;
use crate::error::DepthError;
use crate::frame_pipeline::{FrameCodec, FrameStats, ReferenceFrame};
use crate::kernels::zstd::ZstdBackend;
use crate::profile::EncodeMode;
use crate::traits::ByteCodecBackend;
use crate::types::DepthFrame;

#[derive(Debug)]
pub struct DepthCompressor<B: ByteCodecBackend = ZstdBackend> {
    codec: FrameCodec<B>,
    config: CodecConfig,
    /// The last frame produced by `compress`. Replaced wholesale on success,
    /// dropped on failure.
    encode_reference: Option<ReferenceFrame>,
    /// The last frame produced by `decompress`, under the same rules.
    decode_reference: Option<ReferenceFrame>,
    next_frame_number: u16,
    frames_since_keyframe: u32,
    last_stats: Option<FrameStats>,
}

impl DepthCompressor<ZstdBackend> {
    /// An instance with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(FrameCodec::default(), CodecConfig::default())
    }

    /// An instance using the zstd back end at the configured level.
    pub fn with_config(config: CodecConfig) -> Result<Self, DepthError> {
        config.validate()?;
        Ok(Self::from_parts(
            FrameCodec::new(ZstdBackend::new(config.zstd_level)),
            config,
        ))
    }
}

impl Default for DepthCompressor<ZstdBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ByteCodecBackend> DepthCompressor<B> {
    /// An instance over a custom byte back end. `config.zstd_level` is ignored.
    pub fn with_backend(config: CodecConfig, backend: B) -> Result<Self, DepthError> {
        config.validate()?;
        Ok(Self::from_parts(FrameCodec::new(backend), config))
    }

    fn from_parts(codec: FrameCodec<B>, config: CodecConfig) -> Self {
        Self {
            codec,
            config,
            encode_reference: None,
            decode_reference: None,
            next_frame_number: 0,
            frames_since_keyframe: 0,
            last_stats: None,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode_mode(&self) -> EncodeMode {
        self.config.mode
    }

    /// Selects the mode for subsequent `compress` calls. A change of mode drops
    /// the held references, so the next frame in either direction must be a
    /// keyframe.
    pub fn set_encode_mode(&mut self, mode: EncodeMode) {
        if self.config.mode != mode {
            log::debug!("encode mode {} -> {}, dropping references", self.config.mode, mode);
            self.encode_reference = None;
            self.decode_reference = None;
        }
        self.config.mode = mode;
    }

    /// True when the next `compress` may emit a delta frame.
    pub fn has_encode_reference(&self) -> bool {
        self.encode_reference.is_some()
    }

    /// True when the next `decompress` can accept a delta frame.
    pub fn has_decode_reference(&self) -> bool {
        self.decode_reference.is_some()
    }

    /// Statistics for the most recent successful `compress`.
    pub fn last_stats(&self) -> Option<&FrameStats> {
        self.last_stats.as_ref()
    }

    /// Forgets all cross-call state.
    pub fn reset(&mut self) {
        self.encode_reference = None;
        self.decode_reference = None;
        self.next_frame_number = 0;
        self.frames_since_keyframe = 0;
        self.last_stats = None;
    }

    //==============================================================================
    // Encode
    //==============================================================================

    /// Compresses one row-major frame under the current mode.
    ///
    /// On failure no bytes are produced and the encode reference is dropped.
    pub fn compress(
        &mut self,
        width: u32,
        height: u32,
        samples: &[u16],
        force_keyframe: bool,
    ) -> Result<Vec<u8>, DepthError> {
        let mode = self.config.mode;
        let keyframe_due = self
            .config
            .keyframe_interval
            .is_some_and(|n| self.frames_since_keyframe.saturating_add(1) >= n);
        let reference = if force_keyframe || keyframe_due || !self.config.temporal_prediction {
            None
        } else {
            self.encode_reference.as_ref()
        };

        let result = self.codec.encode_samples(
            width,
            height,
            samples,
            mode,
            reference,
            self.next_frame_number,
        );

        match result {
            Ok(encoded) => {
                self.next_frame_number = self.next_frame_number.wrapping_add(1);
                self.frames_since_keyframe = if encoded.header.keyframe {
                    0
                } else {
                    self.frames_since_keyframe.saturating_add(1)
                };
                self.last_stats = Some(encoded.stats);
                self.encode_reference = Some(encoded.reference);
                Ok(encoded.bytes)
            }
            Err(e) => {
                log::warn!("compress of {}x{} frame failed: {}", width, height, e);
                self.encode_reference = None;
                Err(e)
            }
        }
    }

    /// As `compress`, for an already-validated frame.
    pub fn compress_frame(
        &mut self,
        frame: &DepthFrame,
        force_keyframe: bool,
    ) -> Result<Vec<u8>, DepthError> {
        self.compress(frame.width(), frame.height(), frame.samples(), force_keyframe)
    }

    //==============================================================================
    // Decode
    //==============================================================================

    /// Decompresses one frame. Delta frames need the immediately preceding
    /// frame to have been decoded by this instance.
    ///
    /// On failure no frame is produced and the decode reference is dropped,
    /// so decoding resumes only at the next keyframe.
    pub fn decompress(&mut self, bytes: &[u8]) -> Result<DepthFrame, DepthError> {
        match self.codec.decode(bytes, self.decode_reference.as_ref()) {
            Ok(decoded) => {
                self.decode_reference = Some(decoded.reference);
                Ok(decoded.frame)
            }
            Err(e) => {
                log::warn!("decompress of {}-byte frame failed: {}", bytes.len(), e);
                self.decode_reference = None;
                Err(e)
            }
        }
    }
}
