use crate::common::errno::Errno;
use crate::common::types::{LogLevel, LogRecord, StringView};

use core::ffi::{c_char, c_void};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};

pub type LogCallback = Option<extern "C" fn(record: *const LogRecord, user_data: *mut c_void)>;

const MODE_DISABLED: u8 = 0;
const MODE_STDERR: u8 = 1;
const MODE_CALLBACK: u8 = 2;

struct CallbackState {
    callback: LogCallback,
    user_data: usize,
}

impl CallbackState {
    const fn new() -> Self {
        Self {
            callback: None,
            user_data: 0,
        }
    }
}

pub struct PosixLinkLogger {
    mode: AtomicU8,
    level: AtomicU8,
    callback: Mutex<CallbackState>,
}

impl PosixLinkLogger {
    const fn new() -> Self {
        Self {
            mode: AtomicU8::new(MODE_STDERR),
            level: AtomicU8::new(LogLevel::Warn as u8),
            callback: Mutex::new(CallbackState::new()),
        }
    }

    fn level(&self) -> Option<Level> {
        level_from_u8(self.level.load(Ordering::Relaxed))
    }

    fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
        log::set_max_level(level_filter_from_u8(level as u8));
    }

    fn set_mode(&self, mode: u8) {
        self.mode.store(mode, Ordering::Relaxed);
    }

    fn set_callback(&self, callback: LogCallback, user_data: *mut c_void) {
        if let Ok(mut state) = self.callback.lock() {
            state.callback = callback;
            state.user_data = user_data as usize;
        }
    }
}

impl Log for PosixLinkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let Some(level) = self.level() else {
            return false;
        };
        metadata.level() <= level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        match self.mode.load(Ordering::Relaxed) {
            MODE_STDERR => {
                eprintln!("[posixlink][{}] {}", record.level(), record.args());
            }
            MODE_CALLBACK => {
                let Ok(state) = self.callback.lock() else {
                    return;
                };
                let Some(callback) = state.callback else {
                    return;
                };
                let message = record.args().to_string();
                let target = record.target();
                let file = record.file().unwrap_or("");
                let line = record.line().unwrap_or(0);

                let record = LogRecord {
                    level: log_level_from_record(record.level()),
                    target: string_view_from_str(target),
                    message: string_view_from_str(&message),
                    file: string_view_from_str(file),
                    line,
                };

                callback(&record as *const LogRecord, state.user_data as *mut c_void);
            }
            _ => {}
        }
    }

    fn flush(&self) {}
}

static LOGGER: PosixLinkLogger = PosixLinkLogger::new();
static LOGGER_STATE: OnceLock<LoggerInstall> = OnceLock::new();

#[derive(Copy, Clone)]
enum LoggerInstall {
    Installed,
    External,
}

fn init_logger() -> LoggerInstall {
    *LOGGER_STATE.get_or_init(|| match log::set_logger(&LOGGER) {
        Ok(()) => {
            log::set_max_level(level_filter_from_u8(LOGGER.level.load(Ordering::Relaxed)));
            LoggerInstall::Installed
        }
        Err(_) => LoggerInstall::External,
    })
}

/// Installs the crate logger (stderr, warnings and up) unless the process
/// already has one. Diagnostics from error translation go through here.
pub fn ensure_installed() {
    init_logger();
}

fn level_filter_from_u8(level: u8) -> LevelFilter {
    match level {
        x if x == LogLevel::Error as u8 => LevelFilter::Error,
        x if x == LogLevel::Warn as u8 => LevelFilter::Warn,
        x if x == LogLevel::Info as u8 => LevelFilter::Info,
        x if x == LogLevel::Debug as u8 => LevelFilter::Debug,
        x if x == LogLevel::Trace as u8 => LevelFilter::Trace,
        _ => LevelFilter::Off,
    }
}

fn level_from_u8(level: u8) -> Option<Level> {
    match level {
        x if x == LogLevel::Error as u8 => Some(Level::Error),
        x if x == LogLevel::Warn as u8 => Some(Level::Warn),
        x if x == LogLevel::Info as u8 => Some(Level::Info),
        x if x == LogLevel::Debug as u8 => Some(Level::Debug),
        x if x == LogLevel::Trace as u8 => Some(Level::Trace),
        _ => None,
    }
}

fn log_level_from_record(level: Level) -> LogLevel {
    match level {
        Level::Error => LogLevel::Error,
        Level::Warn => LogLevel::Warn,
        Level::Info => LogLevel::Info,
        Level::Debug => LogLevel::Debug,
        Level::Trace => LogLevel::Trace,
    }
}

fn string_view_from_str(value: &str) -> StringView {
    StringView {
        ptr: value.as_ptr() as *const c_char,
        len: value.len(),
    }
}

pub fn log_set_stderr(level: LogLevel) -> Result<(), Errno> {
    if matches!(init_logger(), LoggerInstall::External) {
        return Err(Errno::Io);
    }
    LOGGER.set_mode(MODE_STDERR);
    LOGGER.set_level(level);
    Ok(())
}

pub fn log_set_callback(callback: LogCallback, user_data: *mut c_void, level: LogLevel) -> Result<(), Errno> {
    if callback.is_none() {
        return log_disable();
    }
    if matches!(init_logger(), LoggerInstall::External) {
        return Err(Errno::Io);
    }
    LOGGER.set_callback(callback, user_data);
    LOGGER.set_mode(MODE_CALLBACK);
    LOGGER.set_level(level);
    Ok(())
}

pub fn log_set_level(level: LogLevel) -> Result<(), Errno> {
    match init_logger() {
        LoggerInstall::Installed => LOGGER.set_level(level),
        LoggerInstall::External => log::set_max_level(level_filter_from_u8(level as u8)),
    }
    Ok(())
}

pub fn log_disable() -> Result<(), Errno> {
    match init_logger() {
        LoggerInstall::Installed => {
            LOGGER.set_mode(MODE_DISABLED);
            LOGGER.set_level(LogLevel::Off);
        }
        LoggerInstall::External => log::set_max_level(LevelFilter::Off),
    }
    Ok(())
}
