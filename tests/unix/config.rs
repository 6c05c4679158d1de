use std::fs;

use posixlink::*;

use super::support::{c_path, TempDir, CONFIG_MUTEX};

fn config_with(flags: u32) -> PosixLinkConfig {
    PosixLinkConfig {
        flags,
        ..PosixLinkConfig::default()
    }
}

#[test]
fn malformed_configs_are_rejected() {
    let _guard = CONFIG_MUTEX.lock().unwrap();

    let short = PosixLinkConfig {
        size: 4,
        ..PosixLinkConfig::default()
    };
    assert_eq!(posixlink_configure(&short), -1);
    assert_eq!(posixlink_errno(), libc::EINVAL);

    assert_eq!(posixlink_configure(&config_with(1 << 30)), -1);
    assert_eq!(posixlink_errno(), libc::EINVAL);

    assert_eq!(posixlink_configure(std::ptr::null()), 0);
}

#[test]
fn path_not_found_mapping_follows_configuration() {
    let _guard = CONFIG_MUTEX.lock().unwrap();
    let dir = TempDir::new("config");
    let file = dir.join("file");
    fs::write(&file, b"").unwrap();
    // A regular file used as a directory component.
    let below_file = c_path(&file.join("child"));

    assert_eq!(posixlink_configure(std::ptr::null()), 0);
    assert_eq!(is_sym_link(below_file.as_ptr()), -1);
    assert_eq!(posixlink_errno(), libc::ENAMETOOLONG);

    let config = config_with(POSIXLINK_FLAG_PATH_NOT_FOUND_IS_ENOENT);
    assert_eq!(posixlink_configure(&config), 0);
    assert_eq!(is_sym_link(below_file.as_ptr()), -1);
    assert_eq!(posixlink_errno(), libc::ENOENT);

    assert_eq!(posixlink_configure(std::ptr::null()), 0);
}

#[test]
fn lstat_reports_the_c_runtime_errno_whatever_the_configuration() {
    let _guard = CONFIG_MUTEX.lock().unwrap();
    let dir = TempDir::new("stat_errno");
    let file = dir.join("file");
    fs::write(&file, b"").unwrap();
    let below_file = c_path(&file.join("child"));
    let mut status = FileStatus::default();

    for flags in [0, POSIXLINK_FLAG_PATH_NOT_FOUND_IS_ENOENT] {
        assert_eq!(posixlink_configure(&config_with(flags)), 0);
        assert_eq!(lstat(below_file.as_ptr(), &mut status), -1);
        assert_eq!(posixlink_errno(), libc::ENOTDIR);
    }

    assert_eq!(posixlink_configure(std::ptr::null()), 0);
}

#[test]
fn cached_timer_capability_still_sleeps() {
    let _guard = CONFIG_MUTEX.lock().unwrap();
    let config = config_with(POSIXLINK_FLAG_CACHE_TIMER_CAPABILITY);
    assert_eq!(posixlink_configure(&config), 0);

    let mut request: libc::timespec = unsafe { std::mem::zeroed() };
    request.tv_nsec = 1_000_000;
    assert_eq!(
        clock_nanosleep(CLOCK_MONOTONIC, 0, &request, std::ptr::null_mut()),
        0
    );

    assert_eq!(posixlink_configure(std::ptr::null()), 0);
}
