use crate::models::audio_models::ReadStatus;
use crate::models::error::RecorderError;

/// Interface for an opened capture engine handle.
///
/// Implemented by:
/// - `NativeRecorder` (runtime-loaded `libpv_recorder`)
/// - test fakes in this crate
///
/// A backend is owned by exactly one `Recorder` and may move between
/// threads, but is never shared.
pub trait RecorderBackend: Send {
    /// Begin capturing from the opened device.
    fn start(&mut self) -> Result<(), RecorderError>;

    /// Stop capturing. Buffered frames are discarded by the engine.
    fn stop(&mut self) -> Result<(), RecorderError>;

    /// Fill `frame` with exactly `frame_length()` samples, blocking until they are available.
    fn read(&mut self, frame: &mut [i16]) -> Result<ReadStatus, RecorderError>;

    /// Toggle verbose logging inside the engine.
    fn set_debug_logging(&mut self, enabled: bool);

    /// Whether the engine reports itself as capturing.
    fn is_recording(&self) -> bool;

    /// Name of the device the engine actually opened.
    fn selected_device(&self) -> Result<String, RecorderError>;

    /// Samples per frame, fixed at initialization.
    fn frame_length(&self) -> usize;

    /// Sample rate of delivered frames in Hz.
    fn sample_rate(&self) -> u32;
}
