use serde::{Deserialize, Serialize};

/// An audio input device reported by the native library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioDevice {
    /// Position in the native device list; pass as `RecorderConfig::device_index`.
    pub index: i32,
    pub name: String,
}

/// Outcome of a successful frame read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// The frame was delivered without loss.
    Complete,
    /// The frame was delivered, but the native buffer overflowed and older frames were dropped.
    Overflowed,
}

/// Level metering for a single frame (RMS and peak, 0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioLevels {
    pub rms: f32,
    pub peak: f32,
}

/// Counters for debugging a recorder session.
#[derive(Debug, Clone, Default)]
pub struct RecorderDiagnostics {
    pub frames_read: u64,
    pub samples_read: u64,
    pub overflow_count: u64,
    pub start_count: u64,
    pub last_levels: AudioLevels,
}
