use std::ffi::CStr;
use std::ops::Range;

use crate::common::errno::{translate, Errno};
use crate::host::{FileSystemHost, FILE_ATTRIBUTE_REPARSE_POINT};

pub const IO_REPARSE_TAG_MOUNT_POINT: u32 = 0xA000_0003;
pub const IO_REPARSE_TAG_SYMLINK: u32 = 0xA000_000C;
pub const SYMLINK_FLAG_RELATIVE: u32 = 0x1;
pub const MAXIMUM_REPARSE_DATA_BUFFER_SIZE: usize = 16 * 1024;

// Little-endian REPARSE_DATA_BUFFER offsets.
const HEADER_LEN: usize = 8;
const MOUNT_POINT_PATH_START: usize = 16;
const SYMLINK_PATH_START: usize = 20;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReparseTag {
    SymbolicLink,
    MountPoint,
    Other(u32),
}

impl ReparseTag {
    pub fn from_raw(tag: u32) -> Self {
        match tag {
            IO_REPARSE_TAG_SYMLINK => ReparseTag::SymbolicLink,
            IO_REPARSE_TAG_MOUNT_POINT => ReparseTag::MountPoint,
            other => ReparseTag::Other(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            ReparseTag::SymbolicLink => IO_REPARSE_TAG_SYMLINK,
            ReparseTag::MountPoint => IO_REPARSE_TAG_MOUNT_POINT,
            ReparseTag::Other(tag) => tag,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReparseRecord {
    pub tag: ReparseTag,
    path_buffer: Vec<u16>,
    substitute: Range<usize>,
    print: Range<usize>,
    relative: bool,
}

fn read_u16(data: &[u8], at: usize) -> Result<u16, Errno> {
    data.get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(Errno::InvalidArgument)
}

fn read_u32(data: &[u8], at: usize) -> Result<u32, Errno> {
    data.get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(Errno::InvalidArgument)
}

fn name_range(offset: u16, length: u16, units: usize) -> Result<Range<usize>, Errno> {
    if offset % 2 != 0 || length % 2 != 0 {
        return Err(Errno::InvalidArgument);
    }
    let start = usize::from(offset) / 2;
    let end = start + usize::from(length) / 2;
    if end > units {
        return Err(Errno::InvalidArgument);
    }
    Ok(start..end)
}

impl ReparseRecord {
    // Other tags and out-of-bounds offsets are EINVAL.
    pub fn decode(data: &[u8]) -> Result<Self, Errno> {
        let tag = ReparseTag::from_raw(read_u32(data, 0)?);
        let data_len = usize::from(read_u16(data, 4)?);
        let path_start = match tag {
            ReparseTag::SymbolicLink => SYMLINK_PATH_START,
            ReparseTag::MountPoint => MOUNT_POINT_PATH_START,
            ReparseTag::Other(_) => return Err(Errno::InvalidArgument),
        };

        let substitute_offset = read_u16(data, 8)?;
        let substitute_length = read_u16(data, 10)?;
        let print_offset = read_u16(data, 12)?;
        let print_length = read_u16(data, 14)?;
        let relative = match tag {
            ReparseTag::SymbolicLink => read_u32(data, 16)? & SYMLINK_FLAG_RELATIVE != 0,
            _ => false,
        };

        let end = (HEADER_LEN + data_len).min(data.len());
        if end < path_start {
            return Err(Errno::InvalidArgument);
        }
        let path_buffer: Vec<u16> = data[path_start..end]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let substitute = name_range(substitute_offset, substitute_length, path_buffer.len())?;
        let print = name_range(print_offset, print_length, path_buffer.len())?;

        Ok(Self {
            tag,
            path_buffer,
            substitute,
            print,
            relative,
        })
    }

    pub fn symbolic_link(target: &[u8]) -> Self {
        let relative = !is_rooted(target);
        let print: Vec<u16> = target.iter().map(|b| u16::from(*b)).collect();
        let mut path_buffer = print.clone();
        let substitute_start = path_buffer.len();
        if !relative && !target.starts_with(b"\\") {
            path_buffer.extend(br"\??\".iter().map(|b| u16::from(*b)));
        }
        path_buffer.extend_from_slice(&print);
        Self {
            tag: ReparseTag::SymbolicLink,
            substitute: substitute_start..path_buffer.len(),
            print: 0..print.len(),
            path_buffer,
            relative,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let path_start = match self.tag {
            ReparseTag::SymbolicLink => SYMLINK_PATH_START,
            _ => MOUNT_POINT_PATH_START,
        };
        let path_bytes = self.path_buffer.len() * 2;
        let data_len = path_start - HEADER_LEN + path_bytes;

        let mut out = Vec::with_capacity(HEADER_LEN + data_len);
        out.extend_from_slice(&self.tag.raw().to_le_bytes());
        out.extend_from_slice(&(data_len as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        for value in [
            self.substitute.start * 2,
            self.substitute.len() * 2,
            self.print.start * 2,
            self.print.len() * 2,
        ] {
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        if self.tag == ReparseTag::SymbolicLink {
            let flags = if self.relative { SYMLINK_FLAG_RELATIVE } else { 0 };
            out.extend_from_slice(&flags.to_le_bytes());
        }
        for unit in &self.path_buffer {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out
    }

    pub fn print_name(&self) -> &[u16] {
        &self.path_buffer[self.print.clone()]
    }

    pub fn substitute_name(&self) -> &[u16] {
        &self.path_buffer[self.substitute.clone()]
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }
}

fn is_rooted(target: &[u8]) -> bool {
    match target {
        [b'/' | b'\\', ..] => true,
        [drive, b':', ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LinkStatus {
    Unreadable(Errno),
    NotALink,
    IsSymbolicLink,
}

impl LinkStatus {
    pub fn as_raw(self) -> i32 {
        match self {
            LinkStatus::Unreadable(_) => -1,
            LinkStatus::NotALink => 0,
            LinkStatus::IsSymbolicLink => 1,
        }
    }
}

// Mount points are not symbolic links.
pub fn link_status<H: FileSystemHost>(host: &H, path: &CStr) -> LinkStatus {
    let entry = match host.find_entry(path) {
        Ok(entry) => entry,
        Err(err) => return LinkStatus::Unreadable(translate(&err, "isSymLink")),
    };
    if entry.attributes & FILE_ATTRIBUTE_REPARSE_POINT != 0 && entry.reserved0 == IO_REPARSE_TAG_SYMLINK {
        LinkStatus::IsSymbolicLink
    } else {
        LinkStatus::NotALink
    }
}

pub fn read_link<H: FileSystemHost>(host: &H, path: &CStr, buf: &mut [u8]) -> Result<usize, Errno> {
    let attributes = host
        .file_attributes(path)
        .map_err(|err| translate(&err, "readlink"))?;
    if attributes & FILE_ATTRIBUTE_REPARSE_POINT == 0 {
        return Err(Errno::InvalidArgument);
    }

    let data = host
        .reparse_data(path)
        .map_err(|err| translate(&err, "readlink"))?;
    let record = ReparseRecord::decode(&data)?;
    log::trace!(
        target: "posixlink::reparse",
        "readlink {:?}: tag={:?} relative={}",
        path,
        record.tag,
        record.is_relative()
    );
    copy_narrowed(record.print_name(), buf)
}

pub fn copy_narrowed(name: &[u16], buf: &mut [u8]) -> Result<usize, Errno> {
    let Some(capacity) = buf.len().checked_sub(1) else {
        return Err(Errno::InvalidArgument);
    };
    let count = name.len().min(capacity);
    for (dst, unit) in buf.iter_mut().zip(&name[..count]) {
        *dst = u8::try_from(*unit).unwrap_or(b'?');
    }
    buf[count] = 0;
    Ok(count)
}
