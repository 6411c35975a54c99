//! In-process stand-in for `libpv_recorder`, used by unit tests.
//!
//! Behavior is keyed off the device index passed to `init`:
//! - `FAIL_INIT_DEVICE` makes init return INVALID_ARGUMENT,
//! - `NULL_HANDLE_DEVICE` makes init succeed with a null handle,
//! - `OVERFLOW_DEVICE` makes every read report BUFFER_OVERFLOW.

use std::ffi::CString;
use std::os::raw::c_char;
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::ffi::{CPvRecorder, FunctionTable};

pub(crate) const FAIL_INIT_DEVICE: i32 = 90;
pub(crate) const NULL_HANDLE_DEVICE: i32 = 91;
pub(crate) const OVERFLOW_DEVICE: i32 = 92;

pub(crate) const FAKE_DEVICES: [&str; 3] = ["Built-in Microphone", "USB Audio Device", "Headset Mic"];

static DELETED_HANDLES: Mutex<Vec<usize>> = Mutex::new(Vec::new());
static FREED_DEVICE_LISTS: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    // Per thread, since the test harness runs tests in parallel.
    static DELETES_ON_THREAD: Cell<usize> = const { Cell::new(0) };
}

struct FakeRecorder {
    device_index: i32,
    frame_length: usize,
    recording: bool,
    debug_logging: bool,
    reads: i16,
}

pub(crate) fn was_deleted(handle: usize) -> bool {
    DELETED_HANDLES.lock().contains(&handle)
}

/// Number of `pv_recorder_delete` calls made from the current thread.
pub(crate) fn deletes_on_this_thread() -> usize {
    DELETES_ON_THREAD.with(Cell::get)
}

pub(crate) fn freed_device_lists() -> usize {
    FREED_DEVICE_LISTS.load(Ordering::SeqCst)
}

/// Debug-logging flag of a live fake handle.
pub(crate) fn debug_logging_of(handle: usize) -> bool {
    // SAFETY: callers pass the address of a handle they still own.
    unsafe { (*(handle as *const FakeRecorder)).debug_logging }
}

unsafe extern "C" fn fake_init(
    device_index: i32,
    frame_length: i32,
    _buffered_frames_count: i32,
    object: *mut *mut CPvRecorder,
) -> i32 {
    match device_index {
        FAIL_INIT_DEVICE => return 2,
        NULL_HANDLE_DEVICE => {
            *object = std::ptr::null_mut();
            return 0;
        }
        _ => {}
    }
    let recorder = Box::new(FakeRecorder {
        device_index,
        frame_length: frame_length as usize,
        recording: false,
        debug_logging: false,
        reads: 0,
    });
    *object = Box::into_raw(recorder) as *mut CPvRecorder;
    0
}

unsafe extern "C" fn fake_delete(object: *mut CPvRecorder) {
    DELETED_HANDLES.lock().push(object as usize);
    DELETES_ON_THREAD.with(|count| count.set(count.get() + 1));
    drop(Box::from_raw(object as *mut FakeRecorder));
}

unsafe extern "C" fn fake_start(object: *mut CPvRecorder) -> i32 {
    let recorder = &mut *(object as *mut FakeRecorder);
    if recorder.recording {
        return 3;
    }
    recorder.recording = true;
    0
}

unsafe extern "C" fn fake_stop(object: *mut CPvRecorder) -> i32 {
    (*(object as *mut FakeRecorder)).recording = false;
    0
}

unsafe extern "C" fn fake_read(object: *mut CPvRecorder, frame: *mut i16) -> i32 {
    let recorder = &mut *(object as *mut FakeRecorder);
    if !recorder.recording {
        return 3;
    }
    recorder.reads = recorder.reads.wrapping_add(1);
    let samples = std::slice::from_raw_parts_mut(frame, recorder.frame_length);
    samples.fill(recorder.reads);
    if recorder.device_index == OVERFLOW_DEVICE {
        8
    } else {
        0
    }
}

unsafe extern "C" fn fake_set_debug_logging(object: *mut CPvRecorder, enabled: bool) {
    (*(object as *mut FakeRecorder)).debug_logging = enabled;
}

unsafe extern "C" fn fake_get_is_recording(object: *mut CPvRecorder) -> bool {
    (*(object as *mut FakeRecorder)).recording
}

unsafe extern "C" fn fake_get_selected_device(object: *mut CPvRecorder) -> *const c_char {
    match (*(object as *mut FakeRecorder)).device_index {
        1 => b"USB Audio Device\0".as_ptr() as *const c_char,
        _ => b"Built-in Microphone\0".as_ptr() as *const c_char,
    }
}

unsafe extern "C" fn fake_get_available_devices(count: *mut i32, devices: *mut *mut *mut c_char) -> i32 {
    let names: Vec<*mut c_char> = FAKE_DEVICES
        .iter()
        .map(|name| CString::new(*name).map(CString::into_raw).unwrap_or(std::ptr::null_mut()))
        .collect();
    let list = Box::into_raw(names.into_boxed_slice()) as *mut *mut c_char;

    *count = FAKE_DEVICES.len() as i32;
    *devices = list;
    0
}

unsafe extern "C" fn fake_free_available_devices(count: i32, devices: *mut *mut c_char) {
    let names = Box::from_raw(std::ptr::slice_from_raw_parts_mut(devices, count as usize));
    for &name in names.iter() {
        drop(CString::from_raw(name));
    }
    FREED_DEVICE_LISTS.fetch_add(1, Ordering::SeqCst);
}

unsafe extern "C" fn fake_sample_rate() -> i32 {
    16000
}

unsafe extern "C" fn fake_version() -> *const c_char {
    b"1.2.0-fake\0".as_ptr() as *const c_char
}

pub(crate) fn fake_functions() -> FunctionTable {
    FunctionTable {
        init: fake_init,
        delete: fake_delete,
        start: fake_start,
        stop: fake_stop,
        read: fake_read,
        set_debug_logging: fake_set_debug_logging,
        get_is_recording: fake_get_is_recording,
        get_selected_device: fake_get_selected_device,
        get_available_devices: fake_get_available_devices,
        free_available_devices: fake_free_available_devices,
        sample_rate: fake_sample_rate,
        version: fake_version,
    }
}
