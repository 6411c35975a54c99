use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::RecorderError;

/// Device index that selects the system default input device.
pub const DEFAULT_DEVICE_INDEX: i32 = -1;

/// Configuration for a recorder instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Index of the input device to open (-1 = system default).
    pub device_index: i32,

    /// Number of samples returned by each `read` (default: 512).
    pub frame_length: usize,

    /// Number of frames the native engine buffers before dropping the oldest (default: 50).
    pub buffered_frames_count: usize,

    /// Explicit path to the native library, or None to resolve it per platform.
    pub library_path: Option<PathBuf>,

    /// Enable native debug logging right after initialization.
    pub debug_logging: bool,
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), RecorderError> {
        if self.device_index < DEFAULT_DEVICE_INDEX {
            return Err(RecorderError::InvalidArgument(format!(
                "device index {} is invalid, expected -1 (default) or a non-negative index",
                self.device_index
            )));
        }
        if self.frame_length == 0 || i32::try_from(self.frame_length).is_err() {
            return Err(RecorderError::InvalidArgument(format!(
                "frame length {} is invalid, expected a positive 32-bit value",
                self.frame_length
            )));
        }
        if self.buffered_frames_count == 0 || i32::try_from(self.buffered_frames_count).is_err() {
            return Err(RecorderError::InvalidArgument(format!(
                "buffered frames count {} is invalid, expected a positive 32-bit value",
                self.buffered_frames_count
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, RecorderError> {
        let json = fs::read_to_string(path)
            .map_err(|e| RecorderError::StorageError(format!("failed to read config {}: {}", path.display(), e)))?;
        serde_json::from_str(&json)
            .map_err(|e| RecorderError::InvalidArgument(format!("failed to parse config {}: {}", path.display(), e)))
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            device_index: DEFAULT_DEVICE_INDEX,
            frame_length: 512,
            buffered_frames_count: 50,
            library_path: None,
            debug_logging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RecorderConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_device_index_below_default() {
        let config = RecorderConfig {
            device_index: -2,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn rejects_zero_frame_length() {
        let config = RecorderConfig {
            frame_length: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("frame length"));
    }

    #[test]
    fn rejects_zero_buffered_frames() {
        let config = RecorderConfig {
            buffered_frames_count: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("buffered frames count"));
    }

    #[test]
    fn rejects_frame_length_beyond_i32() {
        let config = RecorderConfig {
            frame_length: i32::MAX as usize + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_file_fills_missing_fields_with_defaults() {
        let path = std::env::temp_dir().join(format!("pv_recorder_config_{}.json", std::process::id()));
        fs::write(&path, r#"{ "device_index": 2, "frame_length": 256 }"#).unwrap();

        let config = RecorderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.device_index, 2);
        assert_eq!(config.frame_length, 256);
        assert_eq!(config.buffered_frames_count, 50);
        assert!(config.library_path.is_none());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_json_is_invalid_argument() {
        let path = std::env::temp_dir().join(format!("pv_recorder_bad_config_{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();

        let err = RecorderConfig::from_json_file(&path).unwrap_err();
        assert!(err.is_invalid_argument());

        fs::remove_file(&path).ok();
    }
}
