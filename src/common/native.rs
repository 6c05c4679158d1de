use std::fmt;

// Win32 last-error codes the translation layer and the emulation backend speak.
pub const ERROR_FILE_NOT_FOUND: u32 = 2;
pub const ERROR_PATH_NOT_FOUND: u32 = 3;
pub const ERROR_ACCESS_DENIED: u32 = 5;
pub const ERROR_INVALID_HANDLE: u32 = 6;
pub const ERROR_NOT_ENOUGH_MEMORY: u32 = 8;
pub const ERROR_NOT_SAME_DEVICE: u32 = 17;
pub const ERROR_GEN_FAILURE: u32 = 31;
pub const ERROR_FILE_EXISTS: u32 = 80;
pub const ERROR_INVALID_PARAMETER: u32 = 87;
pub const ERROR_INSUFFICIENT_BUFFER: u32 = 122;
pub const ERROR_ALREADY_EXISTS: u32 = 183;
pub const ERROR_FILENAME_EXCED_RANGE: u32 = 206;
pub const ERROR_MORE_DATA: u32 = 234;
pub const ERROR_NOT_A_REPARSE_POINT: u32 = 4390;

/// A native failure captured where it happened: the last-error code and the
/// system's description of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub code: u32,
    pub message: String,
}

impl NativeError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[cfg(windows)]
    pub fn last() -> Self {
        let code = unsafe { windows_sys::Win32::Foundation::GetLastError() };
        Self::from_code(code)
    }

    #[cfg(windows)]
    pub fn from_code(code: u32) -> Self {
        // std formats Win32 codes through FormatMessageW.
        let message = std::io::Error::from_raw_os_error(code as i32).to_string();
        Self { code, message }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "err={:#x}: {}", self.code, self.message)
    }
}
