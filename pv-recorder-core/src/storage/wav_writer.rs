use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::RecorderError;
use crate::processing::wav_format;

/// Streaming mono 16-bit PCM WAV writer for recorded frames.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header]
/// [raw little-endian 16-bit PCM data...]
/// ```
///
/// The header is written with a zero data size on `open` and patched on `close`.
pub struct WavFileWriter {
    file_path: PathBuf,
    sample_rate: u32,
    file: Option<BufWriter<File>>,
    total_bytes_written: u64,
}

impl WavFileWriter {
    pub fn new(file_path: PathBuf, sample_rate: u32) -> Self {
        Self {
            file_path,
            sample_rate,
            file: None,
            total_bytes_written: 0,
        }
    }

    /// Create the file and write the initial 44-byte WAV header.
    pub fn open(&mut self) -> Result<(), RecorderError> {
        if self.file.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| RecorderError::StorageError(format!("failed to create directory: {}", e)))?;
            }
        }

        let file = File::create(&self.file_path)
            .map_err(|e| RecorderError::StorageError(format!("failed to create file: {}", e)))?;
        self.file = Some(BufWriter::new(file));
        self.total_bytes_written = 0;

        let header = wav_format::generate_wav_header(self.sample_rate, wav_format::PCM_BIT_DEPTH, 1, 0);
        self.write_raw(&header)
    }

    /// Append one frame of samples.
    pub fn write_frame(&mut self, frame: &[i16]) -> Result<(), RecorderError> {
        if self.file.is_none() {
            return Err(RecorderError::StorageError("file is not open for writing".into()));
        }
        // RIFF size fields are 32-bit
        let frame_bytes = frame.len() as u64 * 2;
        if self.total_bytes_written + frame_bytes > u32::MAX as u64 {
            return Err(RecorderError::StorageError(format!(
                "WAV size limit reached after {} samples",
                self.samples_written()
            )));
        }
        self.write_raw(&wav_format::pcm_to_le_bytes(frame))
    }

    /// Finalize the file: patch WAV header sizes and compute a SHA-256 checksum.
    pub fn close(&mut self) -> Result<String, RecorderError> {
        let mut writer = self
            .file
            .take()
            .ok_or_else(|| RecorderError::StorageError("file is not open".into()))?;

        let data_size = self.total_bytes_written - wav_format::WAV_HEADER_SIZE as u64;
        let mut header = wav_format::generate_wav_header(self.sample_rate, wav_format::PCM_BIT_DEPTH, 1, 0);
        wav_format::patch_data_size(&mut header, data_size);
        wav_format::patch_file_size(&mut header, self.total_bytes_written);

        writer
            .seek(SeekFrom::Start(0))
            .map_err(|e| RecorderError::StorageError(e.to_string()))?;
        writer
            .write_all(&header)
            .map_err(|e| RecorderError::StorageError(e.to_string()))?;
        writer.flush().map_err(|e| RecorderError::StorageError(e.to_string()))?;
        drop(writer);

        sha256_file(&self.file_path)
    }

    /// Total bytes written so far (including WAV header).
    pub fn bytes_written(&self) -> u64 {
        self.total_bytes_written
    }

    /// Number of samples written so far.
    pub fn samples_written(&self) -> u64 {
        self.total_bytes_written.saturating_sub(wav_format::WAV_HEADER_SIZE as u64) / 2
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), RecorderError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| RecorderError::StorageError("file is not open".into()))?;
        file.write_all(data)
            .map_err(|e| RecorderError::StorageError(format!("write failed: {}", e)))?;
        self.total_bytes_written += data.len() as u64;
        Ok(())
    }
}

/// Compute SHA-256 hex digest of a file.
fn sha256_file(path: &Path) -> Result<String, RecorderError> {
    let data = fs::read(path)
        .map_err(|e| RecorderError::StorageError(format!("failed to read file for checksum: {}", e)))?;
    let digest = Sha256::digest(&data);
    Ok(hex_encode(&digest))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
