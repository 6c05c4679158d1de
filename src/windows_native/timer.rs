use windows_sys::Win32::System::Threading::{SetWaitableTimer, WaitForSingleObject, INFINITE};

use crate::common::native::NativeError;
use crate::host::WaitableTimer;

use super::win32::OwnedHandle;

const WAIT_OBJECT_0: u32 = 0;

/// Waitable timer handle, closed when dropped.
pub struct NativeTimer {
    handle: OwnedHandle,
}

impl NativeTimer {
    pub fn new(handle: OwnedHandle) -> Self {
        Self { handle }
    }
}

impl WaitableTimer for NativeTimer {
    fn arm(&mut self, due_time: i64) -> Result<(), NativeError> {
        let ok = unsafe {
            SetWaitableTimer(self.handle.raw(), &due_time, 0, None, std::ptr::null(), 0)
        };
        if ok == 0 {
            return Err(NativeError::last());
        }
        Ok(())
    }

    fn wait(&mut self) -> Result<(), NativeError> {
        let status = unsafe { WaitForSingleObject(self.handle.raw(), INFINITE) };
        if status != WAIT_OBJECT_0 {
            return Err(NativeError::last());
        }
        Ok(())
    }
}
