//! Audio input device enumeration through `libpv_recorder`.
//!
//! The native list is copied into owned `AudioDevice`s and handed back to
//! the library before returning, on every path.

use std::os::raw::c_char;
use std::ptr;

use pv_recorder_core::models::audio_models::AudioDevice;
use pv_recorder_core::models::error::RecorderError;

use crate::ffi;
use crate::library::NativeLibrary;
use crate::status;

/// Native device list, freed with `pv_recorder_free_available_devices` on drop.
struct DeviceList<'a> {
    library: &'a NativeLibrary,
    count: i32,
    names: *mut *mut c_char,
}

impl DeviceList<'_> {
    fn names(&self) -> Vec<String> {
        if self.names.is_null() {
            return Vec::new();
        }
        (0..self.count.max(0) as usize)
            .map(|i| {
                // SAFETY: the library returned `count` entries, each null or NUL-terminated.
                unsafe { ffi::c_str_to_string(*self.names.add(i)) }.unwrap_or_default()
            })
            .collect()
    }
}

impl Drop for DeviceList<'_> {
    fn drop(&mut self) {
        if !self.names.is_null() {
            // SAFETY: `names` and `count` are exactly what the library handed out.
            unsafe { (self.library.functions().free_available_devices)(self.count, self.names) };
        }
    }
}

/// List the input devices visible to `library`, in native index order.
pub fn list_devices(library: &NativeLibrary) -> Result<Vec<AudioDevice>, RecorderError> {
    let mut count: i32 = 0;
    let mut names: *mut *mut c_char = ptr::null_mut();

    // SAFETY: both out-pointers are valid for the duration of the call.
    let code = unsafe { (library.functions().get_available_devices)(&mut count, &mut names) };
    status::check(code, "failed to get audio devices")?;

    let list = DeviceList { library, count, names };
    let devices = list
        .names()
        .into_iter()
        .enumerate()
        .map(|(index, name)| AudioDevice {
            index: index as i32,
            name,
        })
        .collect::<Vec<_>>();

    log::debug!("found {} audio input devices", devices.len());
    Ok(devices)
}

/// List input devices using the shared default library.
pub fn available_devices() -> Result<Vec<AudioDevice>, RecorderError> {
    list_devices(&*NativeLibrary::shared()?)
}

/// First device whose name contains `fragment`, ignoring case.
pub fn find_device<'a>(devices: &'a [AudioDevice], fragment: &str) -> Option<&'a AudioDevice> {
    let needle = fragment.to_lowercase();
    devices.iter().find(|d| d.name.to_lowercase().contains(&needle))
}
