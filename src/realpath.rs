use std::ffi::CStr;

use crate::common::errno::{translate, Errno};
use crate::host::FileSystemHost;

const VERBATIM_PREFIX: &[u8] = br"\\?\";
const VERBATIM_UNC_PREFIX: &[u8] = br"\\?\UNC\";

/// Drops the `\\?\` prefix; `\\?\UNC\` becomes `\\`.
pub fn strip_verbatim_prefix(mut path: Vec<u8>) -> Vec<u8> {
    if path.starts_with(VERBATIM_UNC_PREFIX) {
        path.drain(..VERBATIM_UNC_PREFIX.len() - 2);
        path[0] = b'\\';
        path[1] = b'\\';
    } else if path.starts_with(VERBATIM_PREFIX) {
        path.drain(..VERBATIM_PREFIX.len());
    }
    path
}

pub fn realpath<H: FileSystemHost>(host: &H, path: &CStr) -> Result<Vec<u8>, Errno> {
    let resolved = host
        .final_path_name(path)
        .map_err(|err| translate(&err, "realpath"))?;
    Ok(strip_verbatim_prefix(resolved))
}
