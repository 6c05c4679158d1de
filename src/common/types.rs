use core::ffi::c_char;

#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct StringView {
    pub ptr: *const c_char,
    pub len: usize,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub target: StringView,
    pub message: StringView,
    pub file: StringView,
    pub line: u32,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct PosixLinkConfig {
    pub size: u32,
    pub flags: u32,
    pub reserved: [u64; 6],
}

impl Default for PosixLinkConfig {
    fn default() -> Self {
        Self {
            size: std::mem::size_of::<PosixLinkConfig>() as u32,
            flags: 0,
            reserved: [0; 6],
        }
    }
}

/// Read the OS build number once per process instead of on every monotonic sleep.
pub const POSIXLINK_FLAG_CACHE_TIMER_CAPABILITY: u32 = 1 << 0;
/// Report `ERROR_PATH_NOT_FOUND` as `ENOENT` rather than `ENAMETOOLONG`.
pub const POSIXLINK_FLAG_PATH_NOT_FOUND_IS_ENOENT: u32 = 1 << 1;

/// POSIX-shaped status record filled by `lstat`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FileStatus {
    pub st_dev: u32,
    pub st_ino: u64,
    pub st_mode: u32,
    pub st_nlink: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub st_rdev: u32,
    pub st_size: i64,
    pub st_atime: i64,
    pub st_mtime: i64,
    pub st_ctime: i64,
}

pub const S_IFMT: u32 = 0o170000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFCHR: u32 = 0o020000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFLNK: u32 = S_IFREG | S_IFCHR;

pub fn s_isdir(mode: u32) -> bool {
    (mode & S_IFMT) == S_IFDIR
}

pub fn s_islnk(mode: u32) -> bool {
    (mode & S_IFMT) == S_IFLNK
}
