use crate::models::error::RecorderError;
use crate::models::state::RecorderState;

/// Event delegate for recorder notifications.
///
/// Methods are called from whichever thread drives the recorder; with a
/// `FrameStream` that is the reader thread.
pub trait RecorderDelegate: Send + Sync {
    /// Called when the recorder state changes.
    fn on_state_changed(&self, state: &RecorderState);

    /// Called when a read reports that frames were dropped by the engine.
    fn on_overflow(&self, frames_read: u64);

    /// Called when a backend operation fails.
    fn on_error(&self, error: &RecorderError);
}
