use thiserror::Error;

/// Errors that can occur while loading, configuring or reading from a recorder.
///
/// The status-code variants map 1:1 to the native `pv_recorder_status_t`
/// values; the remaining variants are raised by the binding itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("device already initialized: {0}")]
    DeviceAlreadyInitialized(String),

    #[error("device not initialized: {0}")]
    DeviceNotInitialized(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("buffer overflow: {0}")]
    BufferOverflow(String),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("failed to load native library: {0}")]
    LibraryLoad(String),

    #[error("symbol not found in native library: {0}")]
    SymbolNotFound(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl RecorderError {
    /// Whether the error was raised by argument validation rather than by the device.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
