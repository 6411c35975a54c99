use std::sync::Arc;

use crate::models::audio_models::{ReadStatus, RecorderDiagnostics};
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;
use crate::processing::levels;
use crate::traits::recorder_backend::RecorderBackend;
use crate::traits::recorder_delegate::RecorderDelegate;

/// Object-style recorder API over any `RecorderBackend`.
///
/// Adds a binding-level state machine, diagnostics and delegate
/// notifications on top of the backend's raw calls. The backend stays
/// authoritative for `is_recording`.
pub struct Recorder<B: RecorderBackend> {
    backend: B,
    state: RecorderState,
    diagnostics: RecorderDiagnostics,
    delegate: Option<Arc<dyn RecorderDelegate>>,
}

impl<B: RecorderBackend> Recorder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: RecorderState::Idle,
            diagnostics: RecorderDiagnostics::default(),
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecorderDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn diagnostics(&self) -> RecorderDiagnostics {
        self.diagnostics.clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start recording. Transitions: idle/stopped → recording.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        if self.state.is_recording() {
            return Err(RecorderError::InvalidState("recorder is already recording".into()));
        }

        let result = self.backend.start();
        self.report(result)?;

        self.diagnostics.start_count += 1;
        log::debug!("recorder started ({} samples per frame)", self.backend.frame_length());
        self.set_state(RecorderState::Recording { frames_read: 0 });
        Ok(())
    }

    /// Stop recording. Transitions: recording → stopped.
    pub fn stop(&mut self) -> Result<(), RecorderError> {
        let frames_read = match self.state {
            RecorderState::Recording { frames_read } => frames_read,
            _ => return Err(RecorderError::InvalidState("recorder is not recording".into())),
        };

        let result = self.backend.stop();
        self.report(result)?;

        log::debug!("recorder stopped after {} frames", frames_read);
        self.set_state(RecorderState::Stopped { frames_read });
        Ok(())
    }

    /// Read one frame into a freshly allocated buffer of `frame_length()` samples.
    pub fn read(&mut self) -> Result<Vec<i16>, RecorderError> {
        let mut frame = vec![0i16; self.backend.frame_length()];
        self.read_into(&mut frame)?;
        Ok(frame)
    }

    /// Read one frame into `frame`, which must hold exactly `frame_length()` samples.
    ///
    /// An engine-side overflow is not an error: the frame is still valid,
    /// a warning is logged and the delegate is told.
    pub fn read_into(&mut self, frame: &mut [i16]) -> Result<ReadStatus, RecorderError> {
        let RecorderState::Recording { frames_read } = self.state else {
            return Err(RecorderError::InvalidState("recorder is not recording".into()));
        };

        let expected = self.backend.frame_length();
        if frame.len() != expected {
            return Err(RecorderError::InvalidArgument(format!(
                "frame buffer holds {} samples, expected {}",
                frame.len(),
                expected
            )));
        }

        let result = self.backend.read(frame);
        let status = self.report(result)?;

        let frames_read = frames_read + 1;
        self.state = RecorderState::Recording { frames_read };
        self.diagnostics.frames_read += 1;
        self.diagnostics.samples_read += frame.len() as u64;
        self.diagnostics.last_levels = levels::measure(frame);

        if status == ReadStatus::Overflowed {
            self.diagnostics.overflow_count += 1;
            log::warn!("some audio frames were lost (frame {})", frames_read);
            if let Some(ref delegate) = self.delegate {
                delegate.on_overflow(frames_read);
            }
        }

        Ok(status)
    }

    /// Whether the engine is capturing.
    pub fn is_recording(&self) -> bool {
        self.backend.is_recording()
    }

    pub fn selected_device(&self) -> Result<String, RecorderError> {
        let result = self.backend.selected_device();
        self.report(result)
    }

    pub fn set_debug_logging(&mut self, enabled: bool) {
        self.backend.set_debug_logging(enabled);
    }

    pub fn frame_length(&self) -> usize {
        self.backend.frame_length()
    }

    pub fn sample_rate(&self) -> u32 {
        self.backend.sample_rate()
    }

    /// Release the recorder, stopping it first if needed.
    ///
    /// A failing stop is logged; the native handle is released regardless.
    pub fn delete(mut self) {
        if self.state.is_recording() {
            if let Err(e) = self.stop() {
                log::warn!("failed to stop recorder during delete: {}", e);
            }
        }
        log::debug!("recorder deleted");
    }

    // --- Internal helpers ---

    fn set_state(&mut self, new_state: RecorderState) {
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    fn report<T>(&self, result: Result<T, RecorderError>) -> Result<T, RecorderError> {
        if let Err(ref e) = result {
            if let Some(ref delegate) = self.delegate {
                delegate.on_error(e);
            }
        }
        result
    }
}
