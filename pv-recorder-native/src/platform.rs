//! Locating the native library for the running platform.
//!
//! Binaries are laid out as `lib/<os>/<cpu>/libpv_recorder.<ext>` under a
//! base directory. ARM Linux boards are identified from `/proc/cpuinfo`.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use pv_recorder_core::models::error::RecorderError;

/// Environment variable holding an explicit path to the library file.
pub const LIBRARY_PATH_ENV: &str = "PV_RECORDER_LIBRARY_PATH";

/// Environment variable overriding the base directory that contains `lib/`.
pub const BASE_DIR_ENV: &str = "PV_RECORDER_BASE_DIR";

const LIBRARY_STEM: &str = "libpv_recorder";

/// Platform directories of a native library: `lib/<os>/<cpu>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    pub os: &'static str,
    pub cpu: &'static str,
}

impl PlatformDirs {
    /// File name of the library for this platform.
    pub fn library_file_name(&self) -> String {
        let extension = match self.os {
            "windows" => "dll",
            "mac" => "dylib",
            _ => "so",
        };
        format!("{}.{}", LIBRARY_STEM, extension)
    }

    /// Path of the library relative to the base directory.
    pub fn relative_library_path(&self) -> PathBuf {
        Path::new("lib").join(self.os).join(self.cpu).join(self.library_file_name())
    }
}

/// Detect the platform directories for the running process.
pub fn current_platform() -> Result<PlatformDirs, RecorderError> {
    let cpuinfo = if env::consts::OS == "linux" && matches!(env::consts::ARCH, "arm" | "aarch64") {
        fs::read_to_string("/proc/cpuinfo").ok()
    } else {
        None
    };
    platform_for(env::consts::OS, env::consts::ARCH, cpuinfo.as_deref())
}

/// Map a Rust target OS/arch pair (plus `/proc/cpuinfo` on ARM Linux) to library directories.
pub fn platform_for(os: &str, arch: &str, cpuinfo: Option<&str>) -> Result<PlatformDirs, RecorderError> {
    let dirs = match (os, arch) {
        ("linux", "x86_64") => PlatformDirs { os: "linux", cpu: "x86_64" },
        ("macos", "x86_64") => PlatformDirs { os: "mac", cpu: "x86_64" },
        ("macos", "aarch64") => PlatformDirs { os: "mac", cpu: "arm64" },
        ("windows", "x86_64") => PlatformDirs { os: "windows", cpu: "amd64" },
        ("windows", "aarch64") => PlatformDirs { os: "windows", cpu: "arm64" },
        ("linux", "arm") | ("linux", "aarch64") => {
            let cpuinfo = cpuinfo.ok_or_else(|| {
                RecorderError::UnsupportedPlatform(format!("cannot read /proc/cpuinfo on linux/{}", arch))
            })?;
            PlatformDirs {
                os: "raspberry-pi",
                cpu: arm_cpu_from_cpuinfo(cpuinfo)?,
            }
        }
        _ => {
            return Err(RecorderError::UnsupportedPlatform(format!("{}/{}", os, arch)));
        }
    };
    Ok(dirs)
}

/// Identify the ARM core from the first `CPU part` line of `/proc/cpuinfo`.
pub fn arm_cpu_from_cpuinfo(cpuinfo: &str) -> Result<&'static str, RecorderError> {
    let part = cpuinfo
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "CPU part")
        .map(|(_, value)| value.trim().to_ascii_lowercase())
        .ok_or_else(|| RecorderError::UnsupportedPlatform("no CPU part in /proc/cpuinfo".into()))?;

    match part.as_str() {
        "0xb76" => Ok("arm11"),
        "0xc07" => Ok("cortex-a7"),
        "0xd03" => Ok("cortex-a53"),
        "0xd08" => Ok("cortex-a72"),
        "0xd0b" => Ok("cortex-a76"),
        other => Err(RecorderError::UnsupportedPlatform(format!("unsupported CPU part {}", other))),
    }
}

/// Resolve the library path.
///
/// Order: `explicit` → `PV_RECORDER_LIBRARY_PATH` → `<base>/lib/<os>/<cpu>/<file>`,
/// where `<base>` is `PV_RECORDER_BASE_DIR` or this crate's source directory.
pub fn resolve_library_path(explicit: Option<&Path>) -> Result<PathBuf, RecorderError> {
    resolve_with(
        explicit,
        env::var_os(LIBRARY_PATH_ENV),
        env::var_os(BASE_DIR_ENV),
        current_platform,
    )
}

/// `resolve_library_path` with the environment and platform passed in.
///
/// `platform` is only consulted when neither an explicit path nor
/// `library_env` is given.
pub fn resolve_with(
    explicit: Option<&Path>,
    library_env: Option<OsString>,
    base_env: Option<OsString>,
    platform: impl FnOnce() -> Result<PlatformDirs, RecorderError>,
) -> Result<PathBuf, RecorderError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = library_env {
        return Ok(PathBuf::from(path));
    }

    let base = base_env
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));
    Ok(base.join(platform()?.relative_library_path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PI4_CPUINFO: &str = "processor\t: 0\nBogoMIPS\t: 108.00\nCPU implementer\t: 0x41\nCPU part\t: 0xd08\nCPU revision\t: 3\n";

    #[test]
    fn desktop_platforms() {
        assert_eq!(
            platform_for("linux", "x86_64", None).unwrap(),
            PlatformDirs { os: "linux", cpu: "x86_64" }
        );
        assert_eq!(
            platform_for("macos", "aarch64", None).unwrap(),
            PlatformDirs { os: "mac", cpu: "arm64" }
        );
        assert_eq!(
            platform_for("windows", "x86_64", None).unwrap(),
            PlatformDirs { os: "windows", cpu: "amd64" }
        );
    }

    #[test]
    fn raspberry_pi_from_cpuinfo() {
        let dirs = platform_for("linux", "aarch64", Some(PI4_CPUINFO)).unwrap();
        assert_eq!(dirs, PlatformDirs { os: "raspberry-pi", cpu: "cortex-a72" });
        assert_eq!(
            dirs.relative_library_path(),
            Path::new("lib/raspberry-pi/cortex-a72/libpv_recorder.so")
        );
    }

    #[test]
    fn arm_linux_without_cpuinfo_is_unsupported() {
        let err = platform_for("linux", "arm", None).unwrap_err();
        assert!(matches!(err, RecorderError::UnsupportedPlatform(_)));
    }

    #[test]
    fn unknown_cpu_part_is_unsupported() {
        let err = arm_cpu_from_cpuinfo("CPU part\t: 0xfff\n").unwrap_err();
        assert!(err.to_string().contains("0xfff"));
    }

    #[test]
    fn cpu_part_is_case_insensitive() {
        assert_eq!(arm_cpu_from_cpuinfo("CPU part : 0xD03").unwrap(), "cortex-a53");
    }

    #[test]
    fn unsupported_os() {
        assert!(platform_for("freebsd", "x86_64", None).is_err());
    }

    #[test]
    fn library_file_extensions() {
        assert_eq!(
            PlatformDirs { os: "windows", cpu: "amd64" }.library_file_name(),
            "libpv_recorder.dll"
        );
        assert_eq!(
            PlatformDirs { os: "mac", cpu: "x86_64" }.library_file_name(),
            "libpv_recorder.dylib"
        );
        assert_eq!(
            PlatformDirs { os: "linux", cpu: "x86_64" }.library_file_name(),
            "libpv_recorder.so"
        );
    }

    #[test]
    fn explicit_path_wins() {
        let path = resolve_library_path(Some(Path::new("/opt/pv/libpv_recorder.so"))).unwrap();
        assert_eq!(path, PathBuf::from("/opt/pv/libpv_recorder.so"));
    }

    fn linux_x86() -> Result<PlatformDirs, RecorderError> {
        Ok(PlatformDirs { os: "linux", cpu: "x86_64" })
    }

    fn unsupported() -> Result<PlatformDirs, RecorderError> {
        Err(RecorderError::UnsupportedPlatform("freebsd/x86_64".into()))
    }

    #[test]
    fn explicit_path_beats_environment() {
        let path = resolve_with(
            Some(Path::new("/opt/pv/libpv_recorder.so")),
            Some(OsString::from("/env/libpv_recorder.so")),
            Some(OsString::from("/base")),
            linux_x86,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/opt/pv/libpv_recorder.so"));
    }

    #[test]
    fn library_env_beats_base_dir() {
        let path = resolve_with(
            None,
            Some(OsString::from("/env/libpv_recorder.so")),
            Some(OsString::from("/base")),
            linux_x86,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/env/libpv_recorder.so"));
    }

    #[test]
    fn library_env_skips_platform_detection() {
        let path = resolve_with(None, Some(OsString::from("/env/libpv_recorder.so")), None, unsupported).unwrap();
        assert_eq!(path, PathBuf::from("/env/libpv_recorder.so"));
    }

    #[test]
    fn base_dir_is_joined_with_platform_layout() {
        let path = resolve_with(None, None, Some(OsString::from("/base")), linux_x86).unwrap();
        assert_eq!(path, PathBuf::from("/base/lib/linux/x86_64/libpv_recorder.so"));
    }

    #[test]
    fn manifest_dir_is_the_default_base() {
        let path = resolve_with(None, None, None, linux_x86).unwrap();
        assert_eq!(
            path,
            Path::new(env!("CARGO_MANIFEST_DIR")).join("lib/linux/x86_64/libpv_recorder.so")
        );
    }

    #[test]
    fn unsupported_platform_without_overrides_fails() {
        let err = resolve_with(None, None, Some(OsString::from("/base")), unsupported).unwrap_err();
        assert!(matches!(err, RecorderError::UnsupportedPlatform(_)));
    }
}
