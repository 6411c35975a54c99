pub mod recorder;
pub mod stream;
