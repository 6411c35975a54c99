//! Native status codes and their translation into `RecorderError`.

use pv_recorder_core::models::audio_models::ReadStatus;
use pv_recorder_core::models::error::RecorderError;

/// Return codes of `libpv_recorder` functions.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PvRecorderStatus {
    Success = 0,
    OutOfMemory = 1,
    InvalidArgument = 2,
    InvalidState = 3,
    BackendError = 4,
    DeviceAlreadyInitialized = 5,
    DeviceNotInitialized = 6,
    IoError = 7,
    BufferOverflow = 8,
    RuntimeError = 9,
}

impl PvRecorderStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        let status = match code {
            0 => Self::Success,
            1 => Self::OutOfMemory,
            2 => Self::InvalidArgument,
            3 => Self::InvalidState,
            4 => Self::BackendError,
            5 => Self::DeviceAlreadyInitialized,
            6 => Self::DeviceNotInitialized,
            7 => Self::IoError,
            8 => Self::BufferOverflow,
            9 => Self::RuntimeError,
            _ => return None,
        };
        Some(status)
    }

    /// Native name of the status, as printed by the C library.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::OutOfMemory => "OUT_OF_MEMORY",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InvalidState => "INVALID_STATE",
            Self::BackendError => "BACKEND_ERROR",
            Self::DeviceAlreadyInitialized => "DEVICE_ALREADY_INITIALIZED",
            Self::DeviceNotInitialized => "DEVICE_NOT_INITIALIZED",
            Self::IoError => "IO_ERROR",
            Self::BufferOverflow => "BUFFER_OVERFLOW",
            Self::RuntimeError => "RUNTIME_ERROR",
        }
    }

    /// Build the error for a failed call. `context` names the operation.
    pub fn to_error(self, context: &str) -> RecorderError {
        let message = format!("{} ({})", context, self.as_str());
        match self {
            Self::OutOfMemory => RecorderError::OutOfMemory(message),
            Self::InvalidArgument => RecorderError::InvalidArgument(message),
            Self::InvalidState => RecorderError::InvalidState(message),
            Self::BackendError => RecorderError::Backend(message),
            Self::DeviceAlreadyInitialized => RecorderError::DeviceAlreadyInitialized(message),
            Self::DeviceNotInitialized => RecorderError::DeviceNotInitialized(message),
            Self::IoError => RecorderError::Io(message),
            Self::BufferOverflow => RecorderError::BufferOverflow(message),
            Self::Success | Self::RuntimeError => RecorderError::Runtime(message),
        }
    }
}

/// Translate a native return code; anything but success is an error.
pub fn check(code: i32, context: &str) -> Result<(), RecorderError> {
    match PvRecorderStatus::from_code(code) {
        Some(PvRecorderStatus::Success) => Ok(()),
        Some(status) => Err(status.to_error(context)),
        None => Err(unknown_status(code, context)),
    }
}

/// Translate the return code of `pv_recorder_read`, where an overflow still delivers a frame.
pub fn check_read(code: i32, context: &str) -> Result<ReadStatus, RecorderError> {
    match PvRecorderStatus::from_code(code) {
        Some(PvRecorderStatus::Success) => Ok(ReadStatus::Complete),
        Some(PvRecorderStatus::BufferOverflow) => Ok(ReadStatus::Overflowed),
        Some(status) => Err(status.to_error(context)),
        None => Err(unknown_status(code, context)),
    }
}

fn unknown_status(code: i32, context: &str) -> RecorderError {
    RecorderError::Runtime(format!("{} (unknown status code {})", context, code))
}
