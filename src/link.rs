use std::ffi::CStr;

use crate::common::errno::{translate, Errno};
use crate::common::types::s_isdir;
use crate::host::{FileSystemHost, SYMBOLIC_LINK_FLAG_ALLOW_UNPRIVILEGED_CREATE, SYMBOLIC_LINK_FLAG_DIRECTORY};
use crate::stat::stat;

/// Creates `link` pointing at `target`. The target must exist; its type
/// decides between a file and a directory link.
pub fn symlink<H: FileSystemHost>(host: &H, target: &CStr, link: &CStr) -> Result<(), Errno> {
    let status = stat(host, target)?;

    let mut flags = SYMBOLIC_LINK_FLAG_ALLOW_UNPRIVILEGED_CREATE;
    if s_isdir(status.st_mode) {
        flags |= SYMBOLIC_LINK_FLAG_DIRECTORY;
    }
    log::debug!(target: "posixlink::link", "symlink {link:?} -> {target:?} flags={flags:#x}");

    host.create_symbolic_link(link, target, flags)
        .map_err(|err| translate(&err, "symlink"))
}

/// Hard link. Directories are refused with `EPERM` before any native call.
pub fn link<H: FileSystemHost>(host: &H, target: &CStr, link: &CStr) -> Result<(), Errno> {
    let status = stat(host, target)?;
    if s_isdir(status.st_mode) {
        return Err(Errno::NotPermitted);
    }

    host.create_hard_link(link, target)
        .map_err(|err| translate(&err, "link"))
}
