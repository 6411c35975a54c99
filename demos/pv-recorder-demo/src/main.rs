use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use parking_lot::Mutex;

use pv_recorder_core::storage::metadata;
use pv_recorder_core::{
    FrameCallback, FrameStream, Recorder, RecorderBackend, RecorderConfig, RecorderError, RecordingMetadata,
    WavFileWriter,
};
use pv_recorder_native::{list_devices, NativeLibrary};

#[derive(Parser)]
#[command(name = "pv-recorder-demo")]
#[command(about = "Record audio from an input device through libpv_recorder")]
struct Args {
    /// List available audio input devices and exit
    #[arg(long)]
    show_audio_devices: bool,

    /// Index of the input device to record from (-1 = default)
    #[arg(long, allow_hyphen_values = true)]
    audio_device_index: Option<i32>,

    /// Samples per frame
    #[arg(long)]
    frame_length: Option<usize>,

    /// Frames buffered by the engine before the oldest are dropped
    #[arg(long)]
    buffered_frames: Option<usize>,

    /// Path to libpv_recorder (defaults to the platform layout or PV_RECORDER_LIBRARY_PATH)
    #[arg(long)]
    library_path: Option<PathBuf>,

    /// JSON recorder configuration; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the recording (default: a timestamped file in Documents)
    #[arg(long)]
    output_wav_path: Option<PathBuf>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration_secs: Option<f64>,

    /// Enable native debug logging
    #[arg(long)]
    debug_logging: bool,
}

impl Args {
    fn recorder_config(&self) -> Result<RecorderConfig, RecorderError> {
        let mut config = match &self.config {
            Some(path) => RecorderConfig::from_json_file(path)?,
            None => RecorderConfig::default(),
        };
        if let Some(index) = self.audio_device_index {
            config.device_index = index;
        }
        if let Some(frame_length) = self.frame_length {
            config.frame_length = frame_length;
        }
        if let Some(buffered) = self.buffered_frames {
            config.buffered_frames_count = buffered;
        }
        if self.library_path.is_some() {
            config.library_path = self.library_path.clone();
        }
        config.debug_logging |= self.debug_logging;
        Ok(config)
    }
}

fn recordings_dir() -> PathBuf {
    let dir = dirs_next::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pv-recorder Recordings");
    fs::create_dir_all(&dir).ok();
    dir
}

fn default_output_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    recordings_dir().join(format!("recording_{}.wav", stamp))
}

fn show_audio_devices(config: &RecorderConfig) -> Result<(), RecorderError> {
    let library = NativeLibrary::resolve(config.library_path.as_deref())?;
    let devices = list_devices(&library)?;
    if devices.is_empty() {
        println!("No audio input devices found.");
    }
    for device in devices {
        println!("index: {}, device name: {}", device.index, device.name);
    }
    Ok(())
}

fn record(config: &RecorderConfig, output: PathBuf, duration: Option<Duration>) -> Result<(), RecorderError> {
    let recorder = pv_recorder_native::open(config)?;
    let library_version = recorder.backend().library().version();
    let device_name = recorder.selected_device()?;
    let sample_rate = recorder.sample_rate();
    let frame_length = recorder.frame_length();

    println!("pv_recorder version: {}", library_version);
    println!("Recording from: {} ({} Hz, {} samples per frame)", device_name, sample_rate, frame_length);

    let mut writer = WavFileWriter::new(output.clone(), sample_rate);
    writer.open()?;
    let writer = Arc::new(Mutex::new(writer));
    let write_error: Arc<Mutex<Option<RecorderError>>> = Arc::new(Mutex::new(None));

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .map_err(|e| RecorderError::Runtime(format!("failed to install Ctrl-C handler: {}", e)))?;
    }

    let callback: FrameCallback = {
        let writer = Arc::clone(&writer);
        let write_error = Arc::clone(&write_error);
        Arc::new(move |frame: &[i16]| {
            if let Err(e) = writer.lock().write_frame(frame) {
                log::error!("failed to write frame: {}", e);
                write_error.lock().get_or_insert(e);
            }
        })
    };

    let stream = FrameStream::start(recorder, callback)?;
    println!("Recording... press Ctrl-C to stop.");

    let started = Instant::now();
    let mut last_meter = Instant::now();
    while stream.is_running() && !interrupted.load(Ordering::SeqCst) {
        if duration.is_some_and(|d| started.elapsed() >= d) {
            break;
        }
        if write_error.lock().is_some() {
            break;
        }
        if last_meter.elapsed() >= Duration::from_millis(500) {
            let levels = stream.current_levels();
            let bars = (levels.rms * 50.0).round() as usize;
            println!("[{:<50}] peak {:.2}", "#".repeat(bars.min(50)), levels.peak);
            last_meter = Instant::now();
        }
        thread::sleep(Duration::from_millis(20));
    }

    let (recorder, checksum) = finish_recording(stream, &writer, &write_error)?;
    let diagnostics = recorder.diagnostics();
    recorder.delete();

    let metadata = RecordingMetadata::new_mono(
        &output.to_string_lossy(),
        &device_name,
        &library_version,
        sample_rate,
        frame_length,
        diagnostics.frames_read,
        diagnostics.overflow_count,
        &checksum,
    );
    let sidecar = metadata::write_metadata(&metadata, &output)?;

    if diagnostics.overflow_count > 0 {
        println!("Warning: {} reads reported lost audio frames.", diagnostics.overflow_count);
    }
    println!(
        "Wrote {:.2}s of audio to {} (metadata: {})",
        metadata.duration_secs,
        output.display(),
        sidecar.display()
    );
    Ok(())
}

/// Stop the stream and finalize the WAV file, in that order, on every path.
///
/// The file is closed even when the stream or a frame write failed, so the
/// samples captured before the failure stay readable.
fn finish_recording<B: RecorderBackend + 'static>(
    stream: FrameStream<B>,
    writer: &Mutex<WavFileWriter>,
    write_error: &Mutex<Option<RecorderError>>,
) -> Result<(Recorder<B>, String), RecorderError> {
    let stopped = stream.stop();

    let mut writer = writer.lock();
    let closed = writer.close();
    if let Err(ref e) = closed {
        log::error!("failed to finalize {}: {}", writer.file_path().display(), e);
    }

    let recorder = stopped?;
    if let Some(e) = write_error.lock().take() {
        return Err(e);
    }
    Ok((recorder, closed?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = args.recorder_config()?;

    if args.show_audio_devices {
        show_audio_devices(&config)?;
        return Ok(());
    }

    let output = args.output_wav_path.clone().unwrap_or_else(default_output_path);
    let duration = args
        .duration_secs
        .map(Duration::try_from_secs_f64)
        .transpose()
        .map_err(|e| RecorderError::InvalidArgument(format!("invalid duration: {}", e)))?;
    record(&config, output, duration)?;
    Ok(())
}
