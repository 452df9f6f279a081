// In: src/config.rs

//! The single source of truth for all zdepth codec configuration.
//!
//! `CodecConfig` is created once at the application boundary (e.g. from a
//! JSON document shipped with a capture rig) and handed to a
//! `DepthCompressor`. Every field has a default, so an empty document `{}` is a
//! valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::DepthError;
use crate::kernels::zstd::DEFAULT_LEVEL;
use crate::profile::EncodeMode;

/// The full set of encoder-side settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct CodecConfig {
    /// Sensing range profile for every frame this encoder produces.
    #[serde(default)]
    pub mode: EncodeMode,

    /// Zstd level used by the back end. Must be in `1..=22`.
    #[serde(default = "default_zstd_level")]
    pub zstd_level: i32,

    /// If false, every frame is a keyframe.
    #[serde(default = "default_true")]
    pub temporal_prediction: bool,

    /// If set, forces a keyframe every N frames so a decoder joining
    /// mid-stream can resynchronise. Must be non-zero.
    #[serde(default)]
    pub keyframe_interval: Option<u32>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            mode: EncodeMode::default(),
            zstd_level: default_zstd_level(),
            temporal_prediction: true,
            keyframe_interval: None,
        }
    }
}

impl CodecConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, DepthError> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_mode(mut self, mode: EncodeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Checks the value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), DepthError> {
        if !(1..=22).contains(&self.zstd_level) {
            return Err(DepthError::InvalidConfig(format!(
                "zstd_level must be in 1..=22, got {}",
                self.zstd_level
            )));
        }
        if self.keyframe_interval == Some(0) {
            return Err(DepthError::InvalidConfig(
                "keyframe_interval must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_zstd_level() -> i32 {
    DEFAULT_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = CodecConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CodecConfig::default());
        assert_eq!(config.mode, EncodeMode::NotQuantized4095mm);
        assert!(config.temporal_prediction);
    }

    #[test]
    fn test_full_document() {
        let json = r#"{
            "mode": "not_quantized_1023mm",
            "zstd_level": 9,
            "temporal_prediction": false,
            "keyframe_interval": 30
        }"#;
        let config = CodecConfig::from_json_str(json).unwrap();
        assert_eq!(config.mode, EncodeMode::NotQuantized1023mm);
        assert_eq!(config.zstd_level, 9);
        assert!(!config.temporal_prediction);
        assert_eq!(config.keyframe_interval, Some(30));
    }

    #[test]
    fn test_invalid_documents_are_rejected() {
        for json in [
            r#"{"mode": "quantized_1mm"}"#,
            r#"{"zstd_level": 0}"#,
            r#"{"zstd_level": 40}"#,
            r#"{"keyframe_interval": 0}"#,
            r#"{"unknown_field": true}"#,
            "not json",
        ] {
            assert!(
                matches!(CodecConfig::from_json_str(json), Err(DepthError::InvalidConfig(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = CodecConfig::default().with_mode(EncodeMode::NotQuantized511mm);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("not_quantized_511mm"));
        assert_eq!(CodecConfig::from_json_str(&json).unwrap(), config);
    }
}
