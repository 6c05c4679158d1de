use std::ffi::CStr;

use crate::common::errno::Errno;
use crate::common::types::*;
use crate::host::{ExtendedStat, FileSystemHost};
use crate::reparse::{link_status, LinkStatus};

impl From<ExtendedStat> for FileStatus {
    fn from(st: ExtendedStat) -> Self {
        // Device ids and link counts are narrowed to the 32-bit record fields.
        Self {
            st_dev: st.dev as u32,
            st_ino: st.ino,
            st_mode: st.mode,
            st_nlink: st.nlink as u32,
            st_uid: st.uid,
            st_gid: st.gid,
            st_rdev: st.rdev as u32,
            st_size: st.size as i64,
            st_atime: st.atime,
            st_mtime: st.mtime,
            st_ctime: st.ctime,
        }
    }
}

// A link to a directory is reported as a link, never as a directory.
pub fn overlay_link_bit(status: &mut FileStatus) {
    status.st_mode |= S_IFLNK;
    status.st_mode &= !S_IFDIR;
}

pub fn stat<H: FileSystemHost>(host: &H, path: &CStr) -> Result<FileStatus, Errno> {
    host.stat(path).map(FileStatus::from)
}

/// Stat that reports symbolic links as such. Metadata is taken from the
/// link target; a failed link detection fails the whole call.
pub fn lstat<H: FileSystemHost>(host: &H, path: &CStr) -> Result<FileStatus, Errno> {
    let mut status = stat(host, path)?;
    match link_status(host, path) {
        LinkStatus::IsSymbolicLink => overlay_link_bit(&mut status),
        LinkStatus::NotALink => {}
        LinkStatus::Unreadable(errno) => return Err(errno),
    }
    Ok(status)
}
