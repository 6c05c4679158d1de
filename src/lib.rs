mod common;
mod config;
mod ffi;
mod host;
mod link;
mod logging;
mod realpath;
mod reparse;
mod sleep;
mod stat;


#[cfg(target_os = "windows")]
mod windows_native;
#[cfg(target_os = "windows")]
pub(crate) use windows_native::PlatformHost;

#[cfg(unix)]
pub mod unix_emulation;
#[cfg(unix)]
pub(crate) use unix_emulation::PlatformHost;

#[cfg(not(any(target_os = "windows", unix)))]
compile_error!("posixlink only supports Windows and Unix targets.");

pub use crate::common::errno::Errno;
pub use crate::common::time::Timespec;
pub use crate::common::types::*;
pub use crate::ffi::*;
pub use crate::logging::LogCallback;
pub use crate::sleep::{CLOCK_MONOTONIC, CLOCK_REALTIME, TIMER_ABSTIME};
