use std::ffi::CStr;

use crate::common::errno::{crt_errno, Errno};
use crate::common::native::NativeError;
use crate::common::time::Timespec;

pub const FILE_ATTRIBUTE_READONLY: u32 = 0x0000_0001;
pub const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x0000_0010;
pub const FILE_ATTRIBUTE_NORMAL: u32 = 0x0000_0080;
pub const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0000_0400;

pub const SYMBOLIC_LINK_FLAG_DIRECTORY: u32 = 0x1;
pub const SYMBOLIC_LINK_FLAG_ALLOW_UNPRIVILEGED_CREATE: u32 = 0x2;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FindEntry {
    pub attributes: u32,
    pub reserved0: u32,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ExtendedStat {
    pub dev: u64,
    pub ino: u64,
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub rdev: u64,
    pub size: u64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
}

pub trait FileSystemHost {
    fn file_attributes(&self, path: &CStr) -> Result<u32, NativeError>;

    fn find_entry(&self, path: &CStr) -> Result<FindEntry, NativeError>;

    fn reparse_data(&self, path: &CStr) -> Result<Vec<u8>, NativeError>;

    fn final_path_name(&self, path: &CStr) -> Result<Vec<u8>, NativeError>;

    // Follows links. Failures carry the C runtime errno unchanged.
    fn stat(&self, path: &CStr) -> Result<ExtendedStat, Errno>;

    fn create_symbolic_link(&self, link: &CStr, target: &CStr, flags: u32) -> Result<(), NativeError>;

    fn create_hard_link(&self, link: &CStr, target: &CStr) -> Result<(), NativeError>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimerKind {
    HighResolution,
    ManualReset,
}

// Armed once; dropping it releases the handle.
pub trait WaitableTimer {
    // Positive due times are absolute (100ns since 1601), negative ones relative.
    fn arm(&mut self, due_time: i64) -> Result<(), NativeError>;

    fn wait(&mut self) -> Result<(), NativeError>;
}

pub trait TimerHost {
    type Timer: WaitableTimer;

    fn os_build_number(&self) -> Option<String>;

    fn create_timer(&self, kind: TimerKind) -> Result<Self::Timer, NativeError>;

    fn monotonic_now(&self) -> Timespec;

    fn realtime_now(&self) -> Timespec {
        let since_epoch = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Timespec::from_duration(since_epoch)
    }

    fn sleep_relative(&self, duration: Timespec) {
        std::thread::sleep(duration.to_duration());
    }
}

/// `stat` from the C runtime (`_stat64` on Windows), widened.
pub fn crt_stat(path: &CStr) -> Result<ExtendedStat, Errno> {
    let mut st: libc::stat = unsafe { std::mem::zeroed() };
    if unsafe { libc::stat(path.as_ptr(), &mut st) } != 0 {
        return Err(Errno::from_raw(crt_errno()));
    }
    Ok(ExtendedStat {
        dev: st.st_dev as u64,
        ino: st.st_ino as u64,
        mode: st.st_mode as u32,
        nlink: st.st_nlink as u64,
        uid: st.st_uid as u32,
        gid: st.st_gid as u32,
        rdev: st.st_rdev as u64,
        size: st.st_size as u64,
        atime: st.st_atime as i64,
        mtime: st.st_mtime as i64,
        ctime: st.st_ctime as i64,
    })
}
