use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::models::audio_models::AudioLevels;
use crate::models::error::RecorderError;
use crate::processing::levels;
use crate::session::recorder::Recorder;
use crate::traits::recorder_backend::RecorderBackend;

/// Callback invoked with every frame read by a `FrameStream`.
///
/// Runs on the reader thread; keep processing minimal or hand the
/// samples off to another thread.
pub type FrameCallback = Arc<dyn Fn(&[i16]) + Send + Sync + 'static>;

type ReaderResult<B> = (Recorder<B>, Result<(), RecorderError>);

/// Push-style wrapper that reads frames on a dedicated thread.
///
/// ```text
/// [native engine] → read() on "pv-recorder-reader" → FrameCallback
/// ```
pub struct FrameStream<B: RecorderBackend + 'static> {
    running: Arc<AtomicBool>,
    frames_delivered: Arc<AtomicU64>,
    levels: Arc<Mutex<AudioLevels>>,
    reader_handle: Option<thread::JoinHandle<ReaderResult<B>>>,
}

impl<B: RecorderBackend + 'static> FrameStream<B> {
    /// Start `recorder` and begin delivering frames to `callback`.
    ///
    /// If the recorder fails to start it is dropped along with its handle.
    pub fn start(mut recorder: Recorder<B>, callback: FrameCallback) -> Result<Self, RecorderError> {
        recorder.start()?;

        let running = Arc::new(AtomicBool::new(true));
        let frames_delivered = Arc::new(AtomicU64::new(0));
        let levels = Arc::new(Mutex::new(AudioLevels::default()));

        let thread_running = Arc::clone(&running);
        let thread_frames = Arc::clone(&frames_delivered);
        let thread_levels = Arc::clone(&levels);

        let handle = thread::Builder::new()
            .name("pv-recorder-reader".into())
            .spawn(move || reader_loop(recorder, thread_running, thread_frames, thread_levels, callback))
            .map_err(|e| RecorderError::Runtime(format!("failed to spawn reader thread: {}", e)))?;

        Ok(Self {
            running,
            frames_delivered,
            levels,
            reader_handle: Some(handle),
        })
    }

    /// Whether the reader thread is still delivering frames.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered.load(Ordering::SeqCst)
    }

    /// Levels of the most recently delivered frame.
    pub fn current_levels(&self) -> AudioLevels {
        *self.levels.lock()
    }

    /// Stop the reader thread and the recorder, handing the recorder back.
    ///
    /// Returns the read error that ended the stream early, if any; the
    /// recorder is released in that case.
    pub fn stop(mut self) -> Result<Recorder<B>, RecorderError> {
        self.running.store(false, Ordering::SeqCst);

        let handle = self
            .reader_handle
            .take()
            .ok_or_else(|| RecorderError::InvalidState("frame stream already stopped".into()))?;

        let (recorder, result) = handle
            .join()
            .map_err(|_| RecorderError::Runtime("reader thread panicked".into()))?;

        result.map(|()| recorder)
    }
}

impl<B: RecorderBackend + 'static> Drop for FrameStream<B> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.reader_handle.take() {
            let _ = handle.join();
        }
    }
}

fn reader_loop<B: RecorderBackend>(
    mut recorder: Recorder<B>,
    running: Arc<AtomicBool>,
    frames_delivered: Arc<AtomicU64>,
    frame_levels: Arc<Mutex<AudioLevels>>,
    callback: FrameCallback,
) -> ReaderResult<B> {
    let mut frame = vec![0i16; recorder.frame_length()];
    let mut result = Ok(());

    while running.load(Ordering::SeqCst) {
        if let Err(e) = recorder.read_into(&mut frame) {
            log::error!("frame stream read failed: {}", e);
            result = Err(e);
            break;
        }

        *frame_levels.lock() = levels::measure(&frame);
        frames_delivered.fetch_add(1, Ordering::SeqCst);
        callback(&frame);
    }

    running.store(false, Ordering::SeqCst);

    if recorder.state().is_recording() {
        if let Err(e) = recorder.stop() {
            log::warn!("failed to stop recorder after streaming: {}", e);
            if result.is_ok() {
                result = Err(e);
            }
        }
    }

    (recorder, result)
}
