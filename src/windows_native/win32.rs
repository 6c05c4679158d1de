use std::ffi::CStr;

use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileA, FindClose, FindFirstFileA, FILE_FLAG_BACKUP_SEMANTICS,
    FILE_FLAG_OPEN_REPARSE_POINT, FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE,
    OPEN_EXISTING, WIN32_FIND_DATAA,
};

use crate::common::native::NativeError;
use crate::host::FindEntry;

pub struct OwnedHandle(HANDLE);

impl OwnedHandle {
    pub fn from_raw(handle: HANDLE) -> Result<Self, NativeError> {
        if handle == 0 || handle == INVALID_HANDLE_VALUE {
            return Err(NativeError::last());
        }
        Ok(Self(handle))
    }

    pub fn raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        unsafe {
            CloseHandle(self.0);
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OpenIntent {
    Follow,
    ReparsePoint,
}

// No access rights are requested; the handle is only queried. Backup
// semantics let directories open.
pub fn open_path(path: &CStr, intent: OpenIntent) -> Result<OwnedHandle, NativeError> {
    let flags = match intent {
        OpenIntent::Follow => FILE_FLAG_BACKUP_SEMANTICS,
        OpenIntent::ReparsePoint => FILE_FLAG_BACKUP_SEMANTICS | FILE_FLAG_OPEN_REPARSE_POINT,
    };
    let handle = unsafe {
        CreateFileA(
            path.as_ptr() as *const u8,
            0,
            FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE,
            std::ptr::null(),
            OPEN_EXISTING,
            flags,
            0,
        )
    };
    OwnedHandle::from_raw(handle)
}

pub fn find_first(path: &CStr) -> Result<FindEntry, NativeError> {
    let mut find_data: WIN32_FIND_DATAA = unsafe { std::mem::zeroed() };
    let handle = unsafe { FindFirstFileA(path.as_ptr() as *const u8, &mut find_data) };
    if handle == INVALID_HANDLE_VALUE {
        return Err(NativeError::last());
    }
    unsafe {
        FindClose(handle);
    }
    Ok(FindEntry {
        attributes: find_data.dwFileAttributes,
        reserved0: find_data.dwReserved0,
    })
}

// Calls a `(buffer, capacity) -> length` API until the result fits.
pub fn read_sized_string<F>(mut call: F) -> Result<Vec<u8>, NativeError>
where
    F: FnMut(*mut u8, u32) -> u32,
{
    let mut buf: Vec<u8> = vec![0; 260];
    loop {
        let len = call(buf.as_mut_ptr(), buf.len() as u32) as usize;
        if len == 0 {
            return Err(NativeError::last());
        }
        if len < buf.len() {
            buf.truncate(len);
            return Ok(buf);
        }
        // Too small: `len` is the required size including the terminator.
        buf.resize(len + 1, 0);
    }
}
