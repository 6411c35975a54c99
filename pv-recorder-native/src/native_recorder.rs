//! `RecorderBackend` over a native `pv_recorder_t` handle.

use std::ptr::{self, NonNull};
use std::sync::Arc;

use pv_recorder_core::models::audio_models::ReadStatus;
use pv_recorder_core::models::config::RecorderConfig;
use pv_recorder_core::models::error::RecorderError;
use pv_recorder_core::traits::recorder_backend::RecorderBackend;

use crate::ffi::{self, CPvRecorder};
use crate::library::NativeLibrary;
use crate::status;

/// One native recorder instance.
///
/// Owns its handle: `pv_recorder_delete` runs exactly once, on drop.
pub struct NativeRecorder {
    library: Arc<NativeLibrary>,
    handle: NonNull<CPvRecorder>,
    frame_length: usize,
    sample_rate: u32,
}

// SAFETY: the handle is owned by exactly one NativeRecorder and all calls
// go through `&mut self` or read-only getters; the native library does not
// tie a handle to the thread that created it. Not Sync: concurrent calls on
// one handle are not supported by the library.
unsafe impl Send for NativeRecorder {}

impl NativeRecorder {
    /// Validate `config`, load the library and initialize a handle.
    pub fn new(config: &RecorderConfig) -> Result<Self, RecorderError> {
        config.validate()?;
        let library = NativeLibrary::resolve(config.library_path.as_deref())?;
        Self::with_library(library, config)
    }

    /// Initialize a handle from an already loaded library.
    pub fn with_library(library: Arc<NativeLibrary>, config: &RecorderConfig) -> Result<Self, RecorderError> {
        config.validate()?;

        // validate() guarantees both fit in i32
        let frame_length = config.frame_length as i32;
        let buffered_frames_count = config.buffered_frames_count as i32;

        let mut raw: *mut CPvRecorder = ptr::null_mut();
        // SAFETY: `raw` is a valid out-pointer for the duration of the call.
        let code = unsafe {
            (library.functions().init)(config.device_index, frame_length, buffered_frames_count, &mut raw)
        };
        status::check(code, "failed to initialize recorder")?;

        let handle = NonNull::new(raw)
            .ok_or_else(|| RecorderError::Runtime("failed to initialize recorder (null handle)".into()))?;

        let sample_rate = match library.sample_rate() {
            Ok(rate) => rate,
            Err(e) => {
                // SAFETY: handle came from a successful init and is not stored anywhere else.
                unsafe { (library.functions().delete)(handle.as_ptr()) };
                return Err(e);
            }
        };

        let mut recorder = Self {
            library,
            handle,
            frame_length: config.frame_length,
            sample_rate,
        };

        if config.debug_logging {
            recorder.set_debug_logging(true);
        }

        log::debug!(
            "initialized native recorder (device index {}, {} samples per frame, {} buffered frames)",
            config.device_index,
            config.frame_length,
            config.buffered_frames_count
        );
        Ok(recorder)
    }

    /// The library this recorder was created from.
    pub fn library(&self) -> &Arc<NativeLibrary> {
        &self.library
    }

    #[cfg(test)]
    pub(crate) fn raw_handle(&self) -> usize {
        self.handle.as_ptr() as usize
    }
}

impl RecorderBackend for NativeRecorder {
    fn start(&mut self) -> Result<(), RecorderError> {
        // SAFETY: handle is live until drop.
        let code = unsafe { (self.library.functions().start)(self.handle.as_ptr()) };
        status::check(code, "failed to start device")
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        // SAFETY: handle is live until drop.
        let code = unsafe { (self.library.functions().stop)(self.handle.as_ptr()) };
        status::check(code, "failed to stop device")
    }

    fn read(&mut self, frame: &mut [i16]) -> Result<ReadStatus, RecorderError> {
        if frame.len() != self.frame_length {
            return Err(RecorderError::InvalidArgument(format!(
                "frame buffer holds {} samples, expected {}",
                frame.len(),
                self.frame_length
            )));
        }

        // SAFETY: the native side writes exactly `frame_length` samples, which
        // matches the buffer length checked above.
        let code = unsafe { (self.library.functions().read)(self.handle.as_ptr(), frame.as_mut_ptr()) };
        status::check_read(code, "failed to read from device")
    }

    fn set_debug_logging(&mut self, enabled: bool) {
        // SAFETY: handle is live until drop.
        unsafe { (self.library.functions().set_debug_logging)(self.handle.as_ptr(), enabled) };
    }

    fn is_recording(&self) -> bool {
        // SAFETY: handle is live until drop.
        unsafe { (self.library.functions().get_is_recording)(self.handle.as_ptr()) }
    }

    fn selected_device(&self) -> Result<String, RecorderError> {
        // SAFETY: the returned string is owned by the handle and copied before
        // any other call is made on it.
        let name = unsafe { ffi::c_str_to_string((self.library.functions().get_selected_device)(self.handle.as_ptr())) };
        name.ok_or_else(|| RecorderError::Runtime("failed to get selected device".into()))
    }

    fn frame_length(&self) -> usize {
        self.frame_length
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for NativeRecorder {
    fn drop(&mut self) {
        // SAFETY: handle came from a successful init and is released only here.
        unsafe { (self.library.functions().delete)(self.handle.as_ptr()) };
        log::debug!("released native recorder handle");
    }
}
