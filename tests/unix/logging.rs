use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use posixlink::{
    posixlink_log_disable, posixlink_log_set_callback, posixlink_log_set_level,
    posixlink_log_set_stderr, LogLevel, LogRecord,
};

static LOG_COUNT: AtomicUsize = AtomicUsize::new(0);
static LOG_MUTEX: Mutex<()> = Mutex::new(());
const TARGET: &str = "posixlink::logging_test";

extern "C" fn log_callback(record: *const LogRecord, user_data: *mut c_void) {
    if record.is_null() {
        return;
    }
    let rec = unsafe { &*record };
    let target = unsafe { std::slice::from_raw_parts(rec.target.ptr as *const u8, rec.target.len) };
    if target != TARGET.as_bytes() {
        return;
    }
    LOG_COUNT.fetch_add(1, Ordering::SeqCst);
    if !user_data.is_null() {
        let counter = unsafe { &*(user_data as *const AtomicUsize) };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn logging_callback_receives_records() {
    let _guard = LOG_MUTEX.lock().unwrap();
    posixlink_log_disable();
    LOG_COUNT.store(0, Ordering::SeqCst);

    let user_counter = Box::new(AtomicUsize::new(0));
    let user_ptr = Box::into_raw(user_counter) as *mut c_void;

    assert_eq!(posixlink_log_set_callback(Some(log_callback), user_ptr, LogLevel::Info), 0);

    log::info!(target: TARGET, "logging smoke test");
    log::debug!(target: TARGET, "debug should be filtered");

    assert_eq!(LOG_COUNT.load(Ordering::SeqCst), 1);
    let user_count = unsafe { &*(user_ptr as *const AtomicUsize) }.load(Ordering::SeqCst);
    assert_eq!(user_count, 1);

    posixlink_log_disable();
    unsafe { drop(Box::from_raw(user_ptr as *mut AtomicUsize)) };
}

#[test]
fn logging_level_off_suppresses_records() {
    let _guard = LOG_MUTEX.lock().unwrap();
    posixlink_log_disable();
    LOG_COUNT.store(0, Ordering::SeqCst);

    assert_eq!(
        posixlink_log_set_callback(Some(log_callback), std::ptr::null_mut(), LogLevel::Info),
        0
    );
    assert_eq!(posixlink_log_set_level(LogLevel::Off), 0);

    log::info!(target: TARGET, "should not be logged");
    assert_eq!(LOG_COUNT.load(Ordering::SeqCst), 0);

    posixlink_log_disable();
}

#[test]
fn stderr_mode_can_be_selected() {
    let _guard = LOG_MUTEX.lock().unwrap();
    assert_eq!(posixlink_log_set_stderr(LogLevel::Error), 0);
    assert_eq!(posixlink_log_disable(), 0);
}
