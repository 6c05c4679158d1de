// POSIX names are unmangled on Windows only, so they never interpose libc elsewhere.

use core::ffi::{c_char, c_int, c_void};
use std::ffi::CStr;
use std::sync::OnceLock;

use crate::common::errno::{self, set_errno, Errno};
use crate::common::time::Timespec;
use crate::common::types::*;
use crate::logging::{self, LogCallback};
use crate::sleep::{MonotonicSleeper, SleepRequest};
use crate::{config, link as links, realpath as resolve, reparse, stat, PlatformHost};

#[cfg(windows)]
pub const PATH_MAX: usize = 260;
#[cfg(not(windows))]
pub const PATH_MAX: usize = libc::PATH_MAX as usize;

static SLEEPER: OnceLock<MonotonicSleeper<PlatformHost>> = OnceLock::new();

fn sleeper() -> &'static MonotonicSleeper<PlatformHost> {
    SLEEPER.get_or_init(|| MonotonicSleeper::new(PlatformHost::new()))
}

fn host() -> PlatformHost {
    PlatformHost::new()
}

fn path_arg<'a>(path: *const c_char) -> Result<&'a CStr, Errno> {
    if path.is_null() {
        return Err(Errno::InvalidArgument);
    }
    Ok(unsafe { CStr::from_ptr(path) })
}

fn status(result: Result<(), Errno>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(err) => {
            set_errno(err);
            -1
        }
    }
}

fn copy_out(resolved: &[u8], buf: *mut c_char) -> Result<*mut c_char, Errno> {
    if !buf.is_null() {
        if resolved.len() >= PATH_MAX {
            return Err(Errno::NameTooLong);
        }
        unsafe {
            std::ptr::copy_nonoverlapping(resolved.as_ptr(), buf as *mut u8, resolved.len());
            *buf.add(resolved.len()) = 0;
        }
        return Ok(buf);
    }

    let out = unsafe { libc::malloc(resolved.len() + 1) } as *mut u8;
    if out.is_null() {
        return Err(Errno::OutOfMemory);
    }
    unsafe {
        std::ptr::copy_nonoverlapping(resolved.as_ptr(), out, resolved.len());
        *out.add(resolved.len()) = 0;
    }
    Ok(out as *mut c_char)
}

// A null `buf` gets a malloc'd result; otherwise `buf` holds PATH_MAX bytes.
#[cfg_attr(windows, no_mangle)]
pub extern "C" fn realpath(path: *const c_char, buf: *mut c_char) -> *mut c_char {
    let result = path_arg(path)
        .and_then(|path| resolve::realpath(&host(), path))
        .and_then(|resolved| copy_out(&resolved, buf));
    match result {
        Ok(out) => out,
        Err(err) => {
            set_errno(err);
            std::ptr::null_mut()
        }
    }
}

#[cfg_attr(windows, no_mangle)]
pub extern "C" fn readlink(path: *const c_char, buf: *mut c_char, bufsiz: usize) -> isize {
    if buf.is_null() {
        set_errno(Errno::InvalidArgument);
        return -1;
    }
    let result = path_arg(path).and_then(|path| {
        let out = unsafe { std::slice::from_raw_parts_mut(buf as *mut u8, bufsiz) };
        reparse::read_link(&host(), path, out)
    });
    match result {
        Ok(count) => count as isize,
        Err(err) => {
            set_errno(err);
            -1
        }
    }
}

#[cfg_attr(windows, no_mangle)]
pub extern "C" fn lstat(path: *const c_char, out: *mut FileStatus) -> c_int {
    let out = unsafe { out.as_mut() };
    let Some(out) = out else {
        set_errno(Errno::InvalidArgument);
        return -1;
    };
    status(path_arg(path).and_then(|path| {
        *out = stat::lstat(&host(), path)?;
        Ok(())
    }))
}

#[cfg_attr(windows, no_mangle)]
pub extern "C" fn symlink(target: *const c_char, linkpath: *const c_char) -> c_int {
    status(path_arg(target).and_then(|target| links::symlink(&host(), target, path_arg(linkpath)?)))
}

#[cfg_attr(windows, no_mangle)]
pub extern "C" fn link(target: *const c_char, linkpath: *const c_char) -> c_int {
    status(path_arg(target).and_then(|target| links::link(&host(), target, path_arg(linkpath)?)))
}

#[cfg_attr(windows, export_name = "isSymLink")]
pub extern "C" fn is_sym_link(path: *const c_char) -> c_int {
    let path = match path_arg(path) {
        Ok(path) => path,
        Err(err) => {
            set_errno(err);
            return -1;
        }
    };
    let link_status = reparse::link_status(&host(), path);
    if let reparse::LinkStatus::Unreadable(err) = link_status {
        set_errno(err);
    }
    link_status.as_raw()
}

#[cfg_attr(windows, no_mangle)]
pub extern "C" fn clock_nanosleep(
    clock_id: c_int,
    flags: c_int,
    request: *const libc::timespec,
    remain: *mut libc::timespec,
) -> c_int {
    let Some(request) = (unsafe { request.as_ref() }) else {
        set_errno(Errno::InvalidArgument);
        return -1;
    };
    let time = Timespec::new(request.tv_sec as i64, request.tv_nsec as i64);
    let mut left = Timespec::ZERO;
    let wants_remain = !remain.is_null();

    let result = SleepRequest::from_raw(clock_id, flags, time).and_then(|request| {
        sleeper().clock_nanosleep(&request, wants_remain.then_some(&mut left))
    });
    if result.is_ok() && wants_remain {
        unsafe {
            (*remain).tv_sec = left.tv_sec as libc::time_t;
            (*remain).tv_nsec = left.tv_nsec as libc::c_long;
        }
    }
    status(result)
}

#[no_mangle]
pub extern "C" fn posixlink_errno() -> c_int {
    errno::errno()
}

#[no_mangle]
pub extern "C" fn posixlink_configure(config: *const PosixLinkConfig) -> c_int {
    status(unsafe { config::configure(config) })
}

#[no_mangle]
pub extern "C" fn posixlink_free(value: *mut c_void) {
    if value.is_null() {
        return;
    }
    unsafe {
        libc::free(value);
    }
}

#[no_mangle]
pub extern "C" fn posixlink_log_set_stderr(level: LogLevel) -> c_int {
    status(logging::log_set_stderr(level))
}

#[no_mangle]
pub extern "C" fn posixlink_log_set_callback(
    callback: LogCallback,
    user_data: *mut c_void,
    level: LogLevel,
) -> c_int {
    status(logging::log_set_callback(callback, user_data, level))
}

#[no_mangle]
pub extern "C" fn posixlink_log_set_level(level: LogLevel) -> c_int {
    status(logging::log_set_level(level))
}

#[no_mangle]
pub extern "C" fn posixlink_log_disable() -> c_int {
    status(logging::log_disable())
}
