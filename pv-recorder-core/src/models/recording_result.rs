use serde::{Deserialize, Serialize};

/// Metadata stored alongside a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub file_path: String,
    pub device_name: String,
    pub library_version: String,
    pub sample_rate: u32,
    pub frame_length: usize,
    pub frame_count: u64,
    pub overflow_count: u64,
    pub duration_secs: f64,
    pub checksum: String,
    pub created_at: String,
}

impl RecordingMetadata {
    /// Creates metadata for a mono 16-bit recording made from `frame_count` frames.
    ///
    /// Duration is derived from the sample count rather than wall-clock time.
    #[allow(clippy::too_many_arguments)]
    pub fn new_mono(
        file_path: &str,
        device_name: &str,
        library_version: &str,
        sample_rate: u32,
        frame_length: usize,
        frame_count: u64,
        overflow_count: u64,
        checksum: &str,
    ) -> Self {
        let duration_secs = if sample_rate == 0 {
            0.0
        } else {
            (frame_count * frame_length as u64) as f64 / sample_rate as f64
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_path: file_path.to_string(),
            device_name: device_name.to_string(),
            library_version: library_version.to_string(),
            sample_rate,
            frame_length,
            frame_count,
            overflow_count,
            duration_secs,
            checksum: checksum.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn duration_follows_sample_count() {
        let metadata = RecordingMetadata::new_mono("a.wav", "mic", "1.0.0", 16000, 512, 125, 0, "abc");
        assert_relative_eq!(metadata.duration_secs, 4.0);
        assert!(!metadata.id.is_empty());
    }

    #[test]
    fn zero_sample_rate_has_zero_duration() {
        let metadata = RecordingMetadata::new_mono("a.wav", "mic", "1.0.0", 0, 512, 10, 0, "abc");
        assert_eq!(metadata.duration_secs, 0.0);
    }
}
