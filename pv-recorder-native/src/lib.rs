//! # pv-recorder-native
//!
//! Runtime-loaded binding to the native `libpv_recorder` capture library.
//!
//! Provides:
//! - `NativeLibrary`: dynamic loading and symbol resolution
//! - `NativeRecorder`: a `RecorderBackend` over one native handle
//! - `device_enumerator`: input device listing
//! - `platform`: locating the library binary for the running OS/CPU
//!
//! The capture engine (device I/O, buffering, frame pacing) lives in the
//! native library; this crate only marshals calls into it.
//!
//! ## Usage
//! ```ignore
//! use pv_recorder_core::RecorderConfig;
//!
//! let mut recorder = pv_recorder_native::open(&RecorderConfig::default())?;
//! recorder.start()?;
//! let frame = recorder.read()?;
//! recorder.delete();
//! ```

pub mod device_enumerator;
pub mod ffi;
pub mod library;
pub mod native_recorder;
pub mod platform;
pub mod status;

#[cfg(test)]
mod fake;

use pv_recorder_core::{Recorder, RecorderConfig, RecorderError};

pub use device_enumerator::{available_devices, find_device, list_devices};
pub use library::NativeLibrary;
pub use native_recorder::NativeRecorder;
pub use status::PvRecorderStatus;

/// Recorder backed by the native library.
pub type PvRecorder = Recorder<NativeRecorder>;

/// Initialize a recorder from `config`.
pub fn open(config: &RecorderConfig) -> Result<PvRecorder, RecorderError> {
    Ok(Recorder::new(NativeRecorder::new(config)?))
}

/// Version of the shared default library.
pub fn version() -> Result<String, RecorderError> {
    Ok(NativeLibrary::shared()?.version())
}

/// Sample rate of the shared default library in Hz.
pub fn sample_rate() -> Result<u32, RecorderError> {
    NativeLibrary::shared()?.sample_rate()
}
