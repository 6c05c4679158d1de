use std::time::{Duration, Instant};

use posixlink::*;

fn timespec(sec: i64, nsec: i64) -> libc::timespec {
    let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
    ts.tv_sec = sec as libc::time_t;
    ts.tv_nsec = nsec as libc::c_long;
    ts
}

#[test]
fn monotonic_relative_sleep_uses_waitable_timer() {
    let request = timespec(0, 5_000_000);
    let mut remain = timespec(1, 1);
    let start = Instant::now();
    assert_eq!(clock_nanosleep(CLOCK_MONOTONIC, 0, &request, &mut remain), 0);
    assert!(start.elapsed() >= Duration::from_millis(4));
    assert_eq!((remain.tv_sec, remain.tv_nsec), (0, 0));
}

#[test]
fn negative_monotonic_request_is_invalid() {
    let request = timespec(-1, 0);
    assert_eq!(
        clock_nanosleep(CLOCK_MONOTONIC, 0, &request, std::ptr::null_mut()),
        -1
    );
    assert_eq!(posixlink_errno(), libc::EINVAL);
}
