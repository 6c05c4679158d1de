use std::ffi::CStr;

use windows_sys::Win32::Storage::FileSystem::{
    CreateHardLinkA, CreateSymbolicLinkA, GetFileAttributesA, GetFinalPathNameByHandleA,
    FILE_NAME_OPENED, INVALID_FILE_ATTRIBUTES, VOLUME_NAME_DOS,
};
use windows_sys::Win32::System::Ioctl::FSCTL_GET_REPARSE_POINT;
use windows_sys::Win32::System::Performance::{QueryPerformanceCounter, QueryPerformanceFrequency};
use windows_sys::Win32::System::Registry::{RegGetValueA, HKEY_LOCAL_MACHINE, RRF_RT_REG_SZ};
use windows_sys::Win32::System::Threading::{
    CreateWaitableTimerExW, CREATE_WAITABLE_TIMER_HIGH_RESOLUTION,
    CREATE_WAITABLE_TIMER_MANUAL_RESET,
};
use windows_sys::Win32::System::IO::DeviceIoControl;

use crate::common::errno::Errno;
use crate::common::native::NativeError;
use crate::common::time::{Timespec, NSEC_PER_SEC};
use crate::host::*;
use crate::reparse::MAXIMUM_REPARSE_DATA_BUFFER_SIZE;

use super::timer::NativeTimer;
use super::win32::{find_first, open_path, read_sized_string, OpenIntent, OwnedHandle};

const TIMER_ALL_ACCESS: u32 = 0x001F_0003;
const CURRENT_VERSION_KEY: &CStr = c"SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion";
const CURRENT_BUILD_VALUE: &CStr = c"CurrentBuildNumber";

#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsHost;

impl WindowsHost {
    pub fn new() -> Self {
        Self
    }
}

fn bool_result(ok: i32) -> Result<(), NativeError> {
    if ok == 0 {
        Err(NativeError::last())
    } else {
        Ok(())
    }
}

impl FileSystemHost for WindowsHost {
    fn file_attributes(&self, path: &CStr) -> Result<u32, NativeError> {
        let attributes = unsafe { GetFileAttributesA(path.as_ptr() as *const u8) };
        if attributes == INVALID_FILE_ATTRIBUTES {
            return Err(NativeError::last());
        }
        Ok(attributes)
    }

    fn find_entry(&self, path: &CStr) -> Result<FindEntry, NativeError> {
        find_first(path)
    }

    fn reparse_data(&self, path: &CStr) -> Result<Vec<u8>, NativeError> {
        let handle = open_path(path, OpenIntent::ReparsePoint)?;
        let mut buf = vec![0u8; MAXIMUM_REPARSE_DATA_BUFFER_SIZE];
        let mut returned = 0u32;
        let ok = unsafe {
            DeviceIoControl(
                handle.raw(),
                FSCTL_GET_REPARSE_POINT,
                std::ptr::null(),
                0,
                buf.as_mut_ptr().cast(),
                buf.len() as u32,
                &mut returned,
                std::ptr::null_mut(),
            )
        };
        bool_result(ok)?;
        buf.truncate(returned as usize);
        Ok(buf)
    }

    fn final_path_name(&self, path: &CStr) -> Result<Vec<u8>, NativeError> {
        let handle = open_path(path, OpenIntent::Follow)?;
        read_sized_string(|buf, capacity| unsafe {
            GetFinalPathNameByHandleA(
                handle.raw(),
                buf,
                capacity,
                FILE_NAME_OPENED | VOLUME_NAME_DOS,
            )
        })
    }

    fn stat(&self, path: &CStr) -> Result<ExtendedStat, Errno> {
        crt_stat(path)
    }

    fn create_symbolic_link(&self, link: &CStr, target: &CStr, flags: u32) -> Result<(), NativeError> {
        let ok = unsafe {
            CreateSymbolicLinkA(link.as_ptr() as *const u8, target.as_ptr() as *const u8, flags)
        };
        bool_result(ok as i32)
    }

    fn create_hard_link(&self, link: &CStr, target: &CStr) -> Result<(), NativeError> {
        let ok = unsafe {
            CreateHardLinkA(
                link.as_ptr() as *const u8,
                target.as_ptr() as *const u8,
                std::ptr::null(),
            )
        };
        bool_result(ok)
    }
}

impl TimerHost for WindowsHost {
    type Timer = NativeTimer;

    fn os_build_number(&self) -> Option<String> {
        let mut buf = [0u8; 64];
        let mut size = buf.len() as u32;
        let status = unsafe {
            RegGetValueA(
                HKEY_LOCAL_MACHINE,
                CURRENT_VERSION_KEY.as_ptr() as *const u8,
                CURRENT_BUILD_VALUE.as_ptr() as *const u8,
                RRF_RT_REG_SZ,
                std::ptr::null_mut(),
                buf.as_mut_ptr().cast(),
                &mut size,
            )
        };
        if status != 0 {
            log::debug!(target: "posixlink::windows", "CurrentBuildNumber unreadable: {status}");
            return None;
        }
        let value = CStr::from_bytes_until_nul(&buf).ok()?;
        Some(value.to_string_lossy().into_owned())
    }

    fn create_timer(&self, kind: TimerKind) -> Result<NativeTimer, NativeError> {
        let flags = match kind {
            TimerKind::HighResolution => CREATE_WAITABLE_TIMER_HIGH_RESOLUTION,
            TimerKind::ManualReset => CREATE_WAITABLE_TIMER_MANUAL_RESET,
        };
        let handle = unsafe {
            CreateWaitableTimerExW(std::ptr::null(), std::ptr::null(), flags, TIMER_ALL_ACCESS)
        };
        OwnedHandle::from_raw(handle).map(NativeTimer::new)
    }

    fn monotonic_now(&self) -> Timespec {
        let mut frequency = 0i64;
        let mut counter = 0i64;
        unsafe {
            QueryPerformanceFrequency(&mut frequency);
            QueryPerformanceCounter(&mut counter);
        }
        if frequency <= 0 {
            return Timespec::ZERO;
        }
        let secs = counter / frequency;
        let nanos = (counter % frequency) as i128 * NSEC_PER_SEC as i128 / frequency as i128;
        Timespec::new(secs, nanos as i64)
    }
}
