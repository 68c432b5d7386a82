//! Platform-specific host and disk space utilities

use std::io;
use std::path::{Path, PathBuf};

use crate::types::{DiskInfo, DiskSpace};

/// Root of the primary volume.
#[cfg(windows)]
pub fn primary_mount() -> PathBuf {
    let drive = std::env::var("SystemDrive").unwrap_or_else(|_| "C:".to_string());
    PathBuf::from(format!("{drive}\\"))
}

/// Root of the primary volume.
#[cfg(not(windows))]
pub fn primary_mount() -> PathBuf {
    PathBuf::from("/")
}

/// Get disk space for a given path
#[cfg(unix)]
pub fn get_disk_space(path: &Path) -> io::Result<DiskSpace> {
    use std::ffi::CString;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: statvfs is a standard POSIX call. We check the return value
    // before using the result.
    unsafe {
        let mut stat: MaybeUninit<libc::statvfs> = MaybeUninit::uninit();
        let result = libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr());

        if result != 0 {
            return Err(io::Error::last_os_error());
        }

        let stat = stat.assume_init();

        Ok(DiskSpace {
            total_bytes: u64::from(stat.f_blocks) * u64::from(stat.f_frsize),
            available_bytes: u64::from(stat.f_bavail) * u64::from(stat.f_frsize),
        })
    }
}

#[cfg(not(unix))]
pub fn get_disk_space(_path: &Path) -> io::Result<DiskSpace> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "disk space detection not supported on this platform",
    ))
}

/// Best-effort disk information for the primary volume.
pub fn primary_disk_info() -> Option<DiskInfo> {
    let mount_point = primary_mount();
    match get_disk_space(&mount_point) {
        Ok(space) => Some(DiskInfo { mount_point, space }),
        Err(e) => {
            log::debug!("Disk info unavailable for {}: {e}", mount_point.display());
            None
        }
    }
}

/// Name of the machine the engine runs on, "unknown" if it cannot be read.
pub fn hostname() -> String {
    os_hostname()
        .or_else(|| std::env::var("HOSTNAME").ok())
        .or_else(|| std::env::var("COMPUTERNAME").ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(unix)]
fn os_hostname() -> Option<String> {
    let mut buf = [0u8; 256];

    // SAFETY: the buffer is valid for `buf.len()` bytes and gethostname
    // writes at most that many.
    let result = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if result != 0 {
        return None;
    }

    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Some(String::from_utf8_lossy(&buf[..end]).into_owned())
}

#[cfg(not(unix))]
fn os_hostname() -> Option<String> {
    None
}
