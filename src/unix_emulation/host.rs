use std::ffi::{CStr, OsStr};
use std::fs;
use std::io::{self, ErrorKind};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::Path;

use crate::common::errno::Errno;
use crate::common::native::*;
use crate::common::time::Timespec;
use crate::host::*;
use crate::reparse::{ReparseRecord, IO_REPARSE_TAG_SYMLINK, MAXIMUM_REPARSE_DATA_BUFFER_SIZE};

use super::timer::EmulatedTimer;

// Symbolic links carry the reparse attribute and a synthesized reparse
// buffer; failures are reported as Win32 codes.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixHost;

fn path_of(path: &CStr) -> &Path {
    Path::new(OsStr::from_bytes(path.to_bytes()))
}

fn map_io_error(err: &io::Error) -> NativeError {
    let code = match err.raw_os_error() {
        Some(libc::ENOENT) => ERROR_FILE_NOT_FOUND,
        Some(libc::ENOTDIR) => ERROR_PATH_NOT_FOUND,
        Some(libc::EACCES | libc::EPERM | libc::EROFS) => ERROR_ACCESS_DENIED,
        Some(libc::EEXIST) => ERROR_ALREADY_EXISTS,
        Some(libc::ENOMEM) => ERROR_NOT_ENOUGH_MEMORY,
        Some(libc::EXDEV) => ERROR_NOT_SAME_DEVICE,
        Some(libc::ENAMETOOLONG) => ERROR_FILENAME_EXCED_RANGE,
        Some(libc::EINVAL) => ERROR_INVALID_PARAMETER,
        _ => match err.kind() {
            ErrorKind::NotFound => ERROR_FILE_NOT_FOUND,
            ErrorKind::PermissionDenied => ERROR_ACCESS_DENIED,
            ErrorKind::AlreadyExists => ERROR_ALREADY_EXISTS,
            _ => ERROR_GEN_FAILURE,
        },
    };
    NativeError::new(code, err.to_string())
}

fn attributes_of(path: &Path, meta: &fs::Metadata) -> u32 {
    let file_type = meta.file_type();
    let mut attributes = 0;
    if file_type.is_symlink() {
        attributes |= FILE_ATTRIBUTE_REPARSE_POINT;
        // Windows marks links created against a directory as directories.
        if fs::metadata(path).map(|target| target.is_dir()).unwrap_or(false) {
            attributes |= FILE_ATTRIBUTE_DIRECTORY;
        }
    } else if file_type.is_dir() {
        attributes |= FILE_ATTRIBUTE_DIRECTORY;
    }
    if meta.permissions().readonly() {
        attributes |= FILE_ATTRIBUTE_READONLY;
    }
    if attributes == 0 {
        attributes = FILE_ATTRIBUTE_NORMAL;
    }
    attributes
}

impl UnixHost {
    pub fn new() -> Self {
        Self
    }

    fn entry_metadata(&self, path: &CStr) -> Result<(fs::Metadata, u32), NativeError> {
        let path = path_of(path);
        let meta = fs::symlink_metadata(path).map_err(|err| map_io_error(&err))?;
        let attributes = attributes_of(path, &meta);
        Ok((meta, attributes))
    }
}

impl FileSystemHost for UnixHost {
    fn file_attributes(&self, path: &CStr) -> Result<u32, NativeError> {
        self.entry_metadata(path).map(|(_, attributes)| attributes)
    }

    fn find_entry(&self, path: &CStr) -> Result<FindEntry, NativeError> {
        let (meta, attributes) = self.entry_metadata(path)?;
        let reserved0 = if meta.file_type().is_symlink() {
            IO_REPARSE_TAG_SYMLINK
        } else {
            0
        };
        Ok(FindEntry {
            attributes,
            reserved0,
        })
    }

    fn reparse_data(&self, path: &CStr) -> Result<Vec<u8>, NativeError> {
        let (meta, _) = self.entry_metadata(path)?;
        if !meta.file_type().is_symlink() {
            return Err(NativeError::new(
                ERROR_NOT_A_REPARSE_POINT,
                "The file or directory is not a reparse point.",
            ));
        }
        let target = fs::read_link(path_of(path)).map_err(|err| map_io_error(&err))?;
        let data = ReparseRecord::symbolic_link(target.as_os_str().as_bytes()).to_bytes();
        if data.len() > MAXIMUM_REPARSE_DATA_BUFFER_SIZE {
            return Err(NativeError::new(ERROR_MORE_DATA, "More data is available."));
        }
        Ok(data)
    }

    fn final_path_name(&self, path: &CStr) -> Result<Vec<u8>, NativeError> {
        let resolved = fs::canonicalize(path_of(path)).map_err(|err| map_io_error(&err))?;
        Ok(resolved.into_os_string().into_vec())
    }

    fn stat(&self, path: &CStr) -> Result<ExtendedStat, Errno> {
        crt_stat(path)
    }

    fn create_symbolic_link(&self, link: &CStr, target: &CStr, flags: u32) -> Result<(), NativeError> {
        // Directory and privilege flags have no POSIX counterpart.
        log::trace!(target: "posixlink::unix", "symlink flags {flags:#x} ignored");
        std::os::unix::fs::symlink(path_of(target), path_of(link)).map_err(|err| map_io_error(&err))
    }

    fn create_hard_link(&self, link: &CStr, target: &CStr) -> Result<(), NativeError> {
        fs::hard_link(path_of(target), path_of(link)).map_err(|err| map_io_error(&err))
    }
}

impl TimerHost for UnixHost {
    type Timer = EmulatedTimer;

    fn os_build_number(&self) -> Option<String> {
        None
    }

    fn create_timer(&self, kind: TimerKind) -> Result<EmulatedTimer, NativeError> {
        Ok(EmulatedTimer::new(kind))
    }

    fn monotonic_now(&self) -> Timespec {
        let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
        if unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) } != 0 {
            return Timespec::ZERO;
        }
        Timespec::new(ts.tv_sec as i64, ts.tv_nsec as i64)
    }
}
