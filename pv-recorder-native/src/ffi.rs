//! C ABI of `libpv_recorder`.
//!
//! Function pointer types for every exported symbol plus helpers for the
//! C strings the library hands back.

use std::ffi::CStr;
use std::os::raw::c_char;

/// Opaque native recorder state. Only ever used behind a pointer.
#[repr(C)]
pub struct CPvRecorder {
    _private: [u8; 0],
}

pub type PvRecorderInitFn = unsafe extern "C" fn(
    device_index: i32,
    frame_length: i32,
    buffered_frames_count: i32,
    object: *mut *mut CPvRecorder,
) -> i32;

pub type PvRecorderDeleteFn = unsafe extern "C" fn(object: *mut CPvRecorder);

pub type PvRecorderStartFn = unsafe extern "C" fn(object: *mut CPvRecorder) -> i32;

pub type PvRecorderStopFn = unsafe extern "C" fn(object: *mut CPvRecorder) -> i32;

pub type PvRecorderReadFn = unsafe extern "C" fn(object: *mut CPvRecorder, frame: *mut i16) -> i32;

pub type PvRecorderSetDebugLoggingFn = unsafe extern "C" fn(object: *mut CPvRecorder, is_debug_logging_enabled: bool);

pub type PvRecorderGetIsRecordingFn = unsafe extern "C" fn(object: *mut CPvRecorder) -> bool;

pub type PvRecorderGetSelectedDeviceFn = unsafe extern "C" fn(object: *mut CPvRecorder) -> *const c_char;

pub type PvRecorderGetAvailableDevicesFn =
    unsafe extern "C" fn(device_list_length: *mut i32, device_list: *mut *mut *mut c_char) -> i32;

pub type PvRecorderFreeAvailableDevicesFn = unsafe extern "C" fn(device_list_length: i32, device_list: *mut *mut c_char);

pub type PvRecorderSampleRateFn = unsafe extern "C" fn() -> i32;

pub type PvRecorderVersionFn = unsafe extern "C" fn() -> *const c_char;

/// Resolved entry points of a loaded library.
#[derive(Clone, Copy)]
pub struct FunctionTable {
    pub init: PvRecorderInitFn,
    pub delete: PvRecorderDeleteFn,
    pub start: PvRecorderStartFn,
    pub stop: PvRecorderStopFn,
    pub read: PvRecorderReadFn,
    pub set_debug_logging: PvRecorderSetDebugLoggingFn,
    pub get_is_recording: PvRecorderGetIsRecordingFn,
    pub get_selected_device: PvRecorderGetSelectedDeviceFn,
    pub get_available_devices: PvRecorderGetAvailableDevicesFn,
    pub free_available_devices: PvRecorderFreeAvailableDevicesFn,
    pub sample_rate: PvRecorderSampleRateFn,
    pub version: PvRecorderVersionFn,
}

/// Copy a library-owned C string into an owned `String`.
///
/// Returns None for null. Invalid UTF-8 is replaced rather than rejected.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
pub unsafe fn c_str_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_string_is_none() {
        assert_eq!(unsafe { c_str_to_string(std::ptr::null()) }, None);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let bytes = b"Mic \xff\0";
        let name = unsafe { c_str_to_string(bytes.as_ptr() as *const c_char) }.unwrap();
        assert_eq!(name, "Mic \u{fffd}");
    }
}
