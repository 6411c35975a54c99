//! Runtime loading of `libpv_recorder` and symbol resolution.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use libloading::Library;

use pv_recorder_core::models::error::RecorderError;

use crate::ffi::{self, FunctionTable};
use crate::platform;

static SHARED_LIBRARY: OnceLock<Result<Arc<NativeLibrary>, RecorderError>> = OnceLock::new();

/// A loaded `libpv_recorder` with every entry point resolved.
///
/// Recorders keep an `Arc` to the library they were created from, so the
/// code stays mapped while any handle is alive.
pub struct NativeLibrary {
    path: PathBuf,
    functions: FunctionTable,
    // None only for in-process function tables used by tests.
    _library: Option<Library>,
}

impl NativeLibrary {
    /// Open the library at `path` and resolve all symbols.
    pub fn load(path: &Path) -> Result<Arc<Self>, RecorderError> {
        log::debug!("loading native recorder library from {}", path.display());

        // SAFETY: loading runs the library's initializers; libpv_recorder has no
        // initialization side effects beyond its own globals.
        let library = unsafe { Library::new(path) }
            .map_err(|e| RecorderError::LibraryLoad(format!("{}: {}", path.display(), e)))?;

        // SAFETY: each symbol is cast to the signature declared in `ffi`, which
        // mirrors the library's C header.
        let functions = unsafe {
            FunctionTable {
                init: resolve(&library, "pv_recorder_init")?,
                delete: resolve(&library, "pv_recorder_delete")?,
                start: resolve(&library, "pv_recorder_start")?,
                stop: resolve(&library, "pv_recorder_stop")?,
                read: resolve(&library, "pv_recorder_read")?,
                set_debug_logging: resolve(&library, "pv_recorder_set_debug_logging")?,
                get_is_recording: resolve(&library, "pv_recorder_get_is_recording")?,
                get_selected_device: resolve(&library, "pv_recorder_get_selected_device")?,
                get_available_devices: resolve(&library, "pv_recorder_get_available_devices")?,
                free_available_devices: resolve(&library, "pv_recorder_free_available_devices")?,
                sample_rate: resolve(&library, "pv_recorder_sample_rate")?,
                version: resolve(&library, "pv_recorder_version")?,
            }
        };

        Ok(Arc::new(Self {
            path: path.to_path_buf(),
            functions,
            _library: Some(library),
        }))
    }

    /// Process-wide library loaded once from the default location.
    ///
    /// A failed load is cached too; later calls return the same error.
    pub fn shared() -> Result<Arc<Self>, RecorderError> {
        SHARED_LIBRARY
            .get_or_init(|| platform::resolve_library_path(None).and_then(|path| Self::load(&path)))
            .clone()
    }

    /// Load from `path` if given, otherwise use the shared default library.
    pub fn resolve(path: Option<&Path>) -> Result<Arc<Self>, RecorderError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::shared(),
        }
    }

    /// Build a library from an in-process function table.
    #[cfg(test)]
    pub(crate) fn from_functions(functions: FunctionTable) -> Arc<Self> {
        Arc::new(Self {
            path: PathBuf::from("<in-process>"),
            functions,
            _library: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// Version string reported by the library.
    pub fn version(&self) -> String {
        // SAFETY: the library returns a pointer to a static NUL-terminated string.
        unsafe { ffi::c_str_to_string((self.functions.version)()) }.unwrap_or_default()
    }

    /// Sample rate of recorded audio in Hz.
    pub fn sample_rate(&self) -> Result<u32, RecorderError> {
        // SAFETY: takes no arguments and has no preconditions.
        let rate = unsafe { (self.functions.sample_rate)() };
        u32::try_from(rate)
            .ok()
            .filter(|&rate| rate > 0)
            .ok_or_else(|| RecorderError::Runtime(format!("native library reported sample rate {}", rate)))
    }
}

/// Look up `name` and copy out the function pointer.
///
/// # Safety
/// `T` must be the exact function pointer type of the exported symbol.
unsafe fn resolve<T: Copy>(library: &Library, name: &str) -> Result<T, RecorderError> {
    let symbol_name = format!("{}\0", name);
    library
        .get::<T>(symbol_name.as_bytes())
        .map(|symbol| *symbol)
        .map_err(|_| RecorderError::SymbolNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::fake_functions;

    #[test]
    fn missing_file_is_load_error() {
        let result = NativeLibrary::load(Path::new("/nonexistent/libpv_recorder.so"));
        match result {
            Err(RecorderError::LibraryLoad(message)) => assert!(message.contains("/nonexistent")),
            _ => panic!("expected a library load error"),
        }
    }

    #[test]
    fn static_queries_use_function_table() {
        let library = NativeLibrary::from_functions(fake_functions());
        assert_eq!(library.version(), "1.2.0-fake");
        assert_eq!(library.sample_rate().unwrap(), 16000);
    }

    #[test]
    fn non_positive_sample_rate_is_runtime_error() {
        unsafe extern "C" fn zero_rate() -> i32 {
            0
        }

        let functions = FunctionTable {
            sample_rate: zero_rate,
            ..fake_functions()
        };
        let library = NativeLibrary::from_functions(functions);
        assert!(matches!(library.sample_rate(), Err(RecorderError::Runtime(_))));
    }
}
