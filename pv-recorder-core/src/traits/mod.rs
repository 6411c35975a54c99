pub mod recorder_backend;
pub mod recorder_delegate;
