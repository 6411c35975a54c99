//! # pv-recorder-core
//!
//! Platform-agnostic recorder core library.
//!
//! Provides the recorder state machine, background frame streaming, level
//! metering and WAV output. Backends (the runtime-loaded `libpv_recorder`
//! binding in `pv-recorder-native`) implement the `RecorderBackend` trait
//! and plug into the generic `Recorder`.
//!
//! ## Architecture
//!
//! ```text
//! pv-recorder-core (this crate)
//! ├── traits/       ← RecorderBackend, RecorderDelegate
//! ├── models/       ← RecorderError, RecorderState, RecorderConfig, AudioDevice, etc.
//! ├── processing/   ← level metering, WAV header generation
//! ├── session/      ← Recorder (state machine), FrameStream (reader thread)
//! └── storage/      ← WavFileWriter, metadata sidecars
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AudioDevice, AudioLevels, ReadStatus, RecorderDiagnostics};
pub use models::config::{RecorderConfig, DEFAULT_DEVICE_INDEX};
pub use models::error::RecorderError;
pub use models::recording_result::RecordingMetadata;
pub use models::state::RecorderState;
pub use session::recorder::Recorder;
pub use session::stream::{FrameCallback, FrameStream};
pub use storage::wav_writer::WavFileWriter;
pub use traits::recorder_backend::RecorderBackend;
pub use traits::recorder_delegate::RecorderDelegate;
