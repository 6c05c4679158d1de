use std::ffi::{c_char, CStr};
use std::fs;

use posixlink::*;

use super::support::{c_path, TempDir};

fn read_link_string(path: &CStr, bufsiz: usize) -> (isize, Vec<u8>) {
    let mut buf = vec![0xAAu8; bufsiz.max(1)];
    let count = readlink(path.as_ptr(), buf.as_mut_ptr() as *mut c_char, bufsiz);
    (count, buf)
}

#[test]
fn symlink_round_trips_through_readlink() {
    let dir = TempDir::new("roundtrip");
    let target = dir.join("target.txt");
    fs::write(&target, b"payload").unwrap();
    let link_path = dir.join("link.txt");

    let c_target = c_path(&target);
    let c_link = c_path(&link_path);
    assert_eq!(symlink(c_target.as_ptr(), c_link.as_ptr()), 0);
    assert_eq!(is_sym_link(c_link.as_ptr()), 1);

    let (count, buf) = read_link_string(&c_link, 1024);
    let expected = c_target.as_bytes();
    assert_eq!(count as usize, expected.len());
    assert_eq!(&buf[..expected.len()], expected);
    assert_eq!(buf[expected.len()], 0);
}

#[test]
fn small_readlink_buffer_truncates() {
    let dir = TempDir::new("truncate");
    let target = dir.join("a_rather_long_target_name");
    fs::write(&target, b"").unwrap();
    let link_path = dir.join("short");
    assert_eq!(symlink(c_path(&target).as_ptr(), c_path(&link_path).as_ptr()), 0);

    let (count, buf) = read_link_string(&c_path(&link_path), 5);
    assert_eq!(count, 4);
    assert_eq!(&buf[..4], &c_path(&target).as_bytes()[..4]);
    assert_eq!(buf[4], 0);

    let (count, _) = read_link_string(&c_path(&link_path), 0);
    assert_eq!(count, -1);
    assert_eq!(posixlink_errno(), libc::EINVAL);
}

#[test]
fn plain_files_are_not_links() {
    let dir = TempDir::new("plain");
    let file = dir.join("file");
    fs::write(&file, b"x").unwrap();
    let c_file = c_path(&file);

    assert_eq!(is_sym_link(c_file.as_ptr()), 0);
    let (count, _) = read_link_string(&c_file, 64);
    assert_eq!(count, -1);
    assert_eq!(posixlink_errno(), libc::EINVAL);
}

#[test]
fn missing_paths_report_enoent() {
    let dir = TempDir::new("missing");
    let missing = c_path(&dir.join("nope"));

    assert!(realpath(missing.as_ptr(), std::ptr::null_mut()).is_null());
    assert_eq!(posixlink_errno(), libc::ENOENT);

    let (count, _) = read_link_string(&missing, 64);
    assert_eq!(count, -1);
    assert_eq!(posixlink_errno(), libc::ENOENT);

    let mut status = FileStatus::default();
    assert_eq!(lstat(missing.as_ptr(), &mut status), -1);
    assert_eq!(posixlink_errno(), libc::ENOENT);

    assert_eq!(is_sym_link(missing.as_ptr()), -1);
    assert_eq!(posixlink_errno(), libc::ENOENT);

    let link_path = c_path(&dir.join("dangling"));
    assert_eq!(symlink(missing.as_ptr(), link_path.as_ptr()), -1);
    assert_eq!(posixlink_errno(), libc::ENOENT);
    assert!(fs::symlink_metadata(dir.join("dangling")).is_err());
}

#[test]
fn missing_directory_component_reports_enoent() {
    let dir = TempDir::new("nodir");
    fs::write(dir.join("target"), b"").unwrap();
    let below_missing = c_path(&dir.join("nodir").join("file"));

    let mut status = FileStatus::default();
    assert_eq!(lstat(below_missing.as_ptr(), &mut status), -1);
    assert_eq!(posixlink_errno(), libc::ENOENT);

    let link_path = c_path(&dir.join("link"));
    assert_eq!(symlink(below_missing.as_ptr(), link_path.as_ptr()), -1);
    assert_eq!(posixlink_errno(), libc::ENOENT);
    assert!(fs::symlink_metadata(dir.join("link")).is_err());
}

#[test]
fn lstat_marks_directory_links_as_links() {
    let dir = TempDir::new("dirlink");
    let target = dir.join("sub");
    fs::create_dir(&target).unwrap();
    let link_path = dir.join("sub_link");
    assert_eq!(symlink(c_path(&target).as_ptr(), c_path(&link_path).as_ptr()), 0);

    let mut status = FileStatus::default();
    assert_eq!(lstat(c_path(&link_path).as_ptr(), &mut status), 0);
    assert!(s_islnk(status.st_mode));
    assert!(!s_isdir(status.st_mode));

    let mut plain = FileStatus::default();
    assert_eq!(lstat(c_path(&target).as_ptr(), &mut plain), 0);
    assert!(s_isdir(plain.st_mode));
    assert!(!s_islnk(plain.st_mode));
    assert_eq!(plain.st_ino, status.st_ino);
}

#[test]
fn lstat_of_regular_file_reports_size() {
    let dir = TempDir::new("size");
    let file = dir.join("file");
    fs::write(&file, vec![0u8; 321]).unwrap();

    let mut status = FileStatus::default();
    assert_eq!(lstat(c_path(&file).as_ptr(), &mut status), 0);
    assert_eq!(status.st_size, 321);
    assert_eq!(status.st_mode & S_IFMT, S_IFREG);
    assert!(status.st_nlink >= 1);
}

#[test]
fn hard_link_to_directory_is_refused() {
    let dir = TempDir::new("hardlink_dir");
    let target = dir.join("sub");
    fs::create_dir(&target).unwrap();
    let link_path = dir.join("sub_hard");

    assert_eq!(link(c_path(&target).as_ptr(), c_path(&link_path).as_ptr()), -1);
    assert_eq!(posixlink_errno(), libc::EPERM);
    assert!(fs::symlink_metadata(&link_path).is_err());
}

#[test]
fn hard_link_shares_the_inode() {
    let dir = TempDir::new("hardlink");
    let target = dir.join("file");
    fs::write(&target, b"shared").unwrap();
    let link_path = dir.join("file_hard");

    assert_eq!(link(c_path(&target).as_ptr(), c_path(&link_path).as_ptr()), 0);
    assert_eq!(fs::read(&link_path).unwrap(), b"shared");

    let mut status = FileStatus::default();
    assert_eq!(lstat(c_path(&link_path).as_ptr(), &mut status), 0);
    assert_eq!(status.st_nlink, 2);
    assert_eq!(is_sym_link(c_path(&link_path).as_ptr()), 0);

    assert_eq!(link(c_path(&target).as_ptr(), c_path(&link_path).as_ptr()), -1);
    assert_eq!(posixlink_errno(), libc::EEXIST);
}

#[test]
fn realpath_resolves_links_into_caller_or_allocated_buffers() {
    let dir = TempDir::new("realpath");
    let target = dir.join("real");
    fs::write(&target, b"").unwrap();
    let link_path = dir.join("alias");
    assert_eq!(symlink(c_path(&target).as_ptr(), c_path(&link_path).as_ptr()), 0);
    let expected = c_path(&fs::canonicalize(&target).unwrap());

    let allocated = realpath(c_path(&link_path).as_ptr(), std::ptr::null_mut());
    assert!(!allocated.is_null());
    assert_eq!(unsafe { CStr::from_ptr(allocated) }, expected.as_c_str());
    posixlink_free(allocated as *mut std::ffi::c_void);

    let mut buf = vec![0 as c_char; PATH_MAX];
    let out = realpath(c_path(&link_path).as_ptr(), buf.as_mut_ptr());
    assert_eq!(out, buf.as_mut_ptr());
    assert_eq!(unsafe { CStr::from_ptr(out) }, expected.as_c_str());
}

#[test]
fn null_arguments_are_invalid() {
    assert!(realpath(std::ptr::null(), std::ptr::null_mut()).is_null());
    assert_eq!(posixlink_errno(), libc::EINVAL);
    assert_eq!(is_sym_link(std::ptr::null()), -1);
    assert_eq!(posixlink_errno(), libc::EINVAL);
    assert_eq!(lstat(c"/".as_ptr(), std::ptr::null_mut()), -1);
    assert_eq!(posixlink_errno(), libc::EINVAL);
    assert_eq!(symlink(c"/".as_ptr(), std::ptr::null()), -1);
    assert_eq!(posixlink_errno(), libc::EINVAL);
    assert_eq!(readlink(c"/".as_ptr(), std::ptr::null_mut(), 16), -1);
    assert_eq!(posixlink_errno(), libc::EINVAL);
}
