use std::cell::Cell;
use std::fmt;

use core::ffi::c_int;

use super::native::*;
use crate::config;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Errno {
    NoEntry,
    PermissionDenied,
    Exists,
    NameTooLong,
    OutOfMemory,
    NotPermitted,
    InvalidArgument,
    NotSupported,
    Io,
    /// Any other value reported by the C runtime, kept as is.
    Other(c_int),
}

impl Errno {
    pub fn raw(self) -> c_int {
        match self {
            Errno::NoEntry => libc::ENOENT,
            Errno::PermissionDenied => libc::EACCES,
            Errno::Exists => libc::EEXIST,
            Errno::NameTooLong => libc::ENAMETOOLONG,
            Errno::OutOfMemory => libc::ENOMEM,
            Errno::NotPermitted => libc::EPERM,
            Errno::InvalidArgument => libc::EINVAL,
            Errno::NotSupported => libc::ENOTSUP,
            Errno::Io => libc::EIO,
            Errno::Other(raw) => raw,
        }
    }

    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            libc::ENOENT => Errno::NoEntry,
            libc::EACCES => Errno::PermissionDenied,
            libc::EEXIST => Errno::Exists,
            libc::ENAMETOOLONG => Errno::NameTooLong,
            libc::ENOMEM => Errno::OutOfMemory,
            libc::EPERM => Errno::NotPermitted,
            libc::EINVAL => Errno::InvalidArgument,
            libc::ENOTSUP => Errno::NotSupported,
            libc::EIO => Errno::Io,
            other => Errno::Other(other),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Errno::NoEntry => "no such file or directory",
            Errno::PermissionDenied => "permission denied",
            Errno::Exists => "file exists",
            Errno::NameTooLong => "file name too long",
            Errno::OutOfMemory => "out of memory",
            Errno::NotPermitted => "operation not permitted",
            Errno::InvalidArgument => "invalid argument",
            Errno::NotSupported => "operation not supported",
            Errno::Io => "input/output error",
            Errno::Other(_) => "system error",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Errno::Other(raw) => write!(f, "{} {raw}", self.describe()),
            _ => f.write_str(self.describe()),
        }
    }
}

/// Maps a native last-error code onto errno. Codes outside the table become
/// `EIO`, and only those are reported on the diagnostic log.
pub fn translate(err: &NativeError, func: &str) -> Errno {
    match err.code {
        ERROR_FILE_NOT_FOUND => Errno::NoEntry,
        ERROR_ACCESS_DENIED => Errno::PermissionDenied,
        ERROR_ALREADY_EXISTS | ERROR_FILE_EXISTS => Errno::Exists,
        ERROR_PATH_NOT_FOUND => {
            if config::settings().path_not_found_is_enoent {
                Errno::NoEntry
            } else {
                Errno::NameTooLong
            }
        }
        ERROR_NOT_ENOUGH_MEMORY => Errno::OutOfMemory,
        ERROR_NOT_SAME_DEVICE => Errno::NotPermitted,
        _ => {
            crate::logging::ensure_installed();
            log::warn!(target: "posixlink::errno", "{func}: {err}");
            Errno::Io
        }
    }
}

thread_local! {
    static LAST_ERRNO: Cell<c_int> = const { Cell::new(0) };
}

#[cfg(windows)]
extern "C" {
    fn _errno() -> *mut c_int;
}

pub fn set_errno(value: Errno) {
    set_raw_errno(value.raw());
}

pub fn set_raw_errno(value: c_int) {
    LAST_ERRNO.with(|slot| slot.set(value));
    #[cfg(windows)]
    unsafe {
        let crt = _errno();
        if !crt.is_null() {
            *crt = value;
        }
    }
}

/// Last errno stored by a failing entry point on this thread.
pub fn errno() -> c_int {
    LAST_ERRNO.with(|slot| slot.get())
}

#[cfg(windows)]
pub fn crt_errno() -> c_int {
    let slot = unsafe { _errno() };
    if slot.is_null() {
        return libc::EIO;
    }
    unsafe { *slot }
}

#[cfg(not(windows))]
pub fn crt_errno() -> c_int {
    std::io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(libc::EIO)
}
