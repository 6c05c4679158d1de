use core::ffi::c_int;
use std::sync::OnceLock;

use crate::common::errno::Errno;
use crate::common::native::NativeError;
use crate::common::time::{Timespec, DELTA_EPOCH_IN_100NS};
use crate::config;
use crate::host::{TimerHost, TimerKind, WaitableTimer};

pub const CLOCK_REALTIME: c_int = 0;
pub const CLOCK_MONOTONIC: c_int = 1;
pub const TIMER_ABSTIME: c_int = 1;

// Windows 10 2004, the first build accepting CREATE_WAITABLE_TIMER_HIGH_RESOLUTION.
pub const WIN2004_BUILD_NUMBER: u32 = 19041;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ClockDomain {
    RealTime,
    Monotonic,
}

impl ClockDomain {
    pub fn from_raw(clock_id: c_int) -> Result<Self, Errno> {
        match clock_id {
            CLOCK_REALTIME => Ok(ClockDomain::RealTime),
            CLOCK_MONOTONIC => Ok(ClockDomain::Monotonic),
            _ => Err(Errno::InvalidArgument),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SleepRequest {
    pub clock: ClockDomain,
    pub absolute: bool,
    pub time: Timespec,
}

impl SleepRequest {
    // Any non-zero flags value requests an absolute deadline.
    pub fn from_raw(clock_id: c_int, flags: c_int, time: Timespec) -> Result<Self, Errno> {
        Ok(Self {
            clock: ClockDomain::from_raw(clock_id)?,
            absolute: flags != 0,
            time,
        })
    }

    pub fn relative(clock: ClockDomain, time: Timespec) -> Self {
        Self {
            clock,
            absolute: false,
            time,
        }
    }

    pub fn absolute(clock: ClockDomain, time: Timespec) -> Self {
        Self {
            clock,
            absolute: true,
            time,
        }
    }
}

pub fn parse_build_number(value: &str) -> Option<u32> {
    let trimmed = value.trim_start();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().ok()
}

pub fn supports_high_resolution(build: Option<&str>) -> bool {
    build
        .and_then(parse_build_number)
        .is_some_and(|number| number >= WIN2004_BUILD_NUMBER)
}

/// Kernel due time in 100ns units, negative when relative.
pub fn due_time(request: &SleepRequest) -> Result<i64, Errno> {
    let ticks = request.time.to_100ns().ok_or(Errno::InvalidArgument)?;
    if request.absolute {
        ticks
            .checked_add(DELTA_EPOCH_IN_100NS)
            .ok_or(Errno::InvalidArgument)
    } else {
        Ok(-ticks)
    }
}

fn timer_failure(err: NativeError) -> Errno {
    crate::logging::ensure_installed();
    log::warn!(target: "posixlink::sleep", "clock_nanosleep: {err}");
    Errno::NotSupported
}

pub struct MonotonicSleeper<H> {
    host: H,
    high_resolution: OnceLock<bool>,
}

impl<H: TimerHost> MonotonicSleeper<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            high_resolution: OnceLock::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn read_capability(&self) -> bool {
        supports_high_resolution(self.host.os_build_number().as_deref())
    }

    // The build number is read on every call unless caching was configured.
    pub fn timer_kind(&self) -> TimerKind {
        let high_resolution = if config::settings().cache_timer_capability {
            *self.high_resolution.get_or_init(|| self.read_capability())
        } else {
            self.read_capability()
        };
        if high_resolution {
            TimerKind::HighResolution
        } else {
            TimerKind::ManualReset
        }
    }

    pub fn clock_nanosleep(&self, request: &SleepRequest, remain: Option<&mut Timespec>) -> Result<(), Errno> {
        match request.clock {
            ClockDomain::RealTime => self.sleep_realtime(request, remain),
            ClockDomain::Monotonic => self.sleep_monotonic(request, remain),
        }
    }

    fn sleep_realtime(&self, request: &SleepRequest, remain: Option<&mut Timespec>) -> Result<(), Errno> {
        if !(0..crate::common::time::NSEC_PER_SEC).contains(&request.time.tv_nsec) {
            return Err(Errno::InvalidArgument);
        }
        let duration = if request.absolute {
            // A deadline already in the past sleeps for zero.
            request
                .time
                .sub(&self.host.realtime_now())
                .saturating_non_negative()
        } else {
            if request.time.is_negative() {
                return Err(Errno::InvalidArgument);
            }
            request.time
        };

        self.host.sleep_relative(duration);
        if let Some(remain) = remain {
            *remain = Timespec::ZERO;
        }
        Ok(())
    }

    fn sleep_monotonic(&self, request: &SleepRequest, remain: Option<&mut Timespec>) -> Result<(), Errno> {
        if !request.time.is_valid() {
            return Err(Errno::InvalidArgument);
        }
        let due = due_time(request)?;
        let kind = self.timer_kind();
        log::trace!(target: "posixlink::sleep", "monotonic sleep due={due} kind={kind:?}");

        let mut timer = self.host.create_timer(kind).map_err(timer_failure)?;
        let started = remain.is_some().then(|| self.host.monotonic_now());

        timer.arm(due).map_err(timer_failure)?;
        timer.wait().map_err(timer_failure)?;
        drop(timer);

        if let Some(remain) = remain {
            *remain = match started {
                Some(started) if !request.absolute => {
                    let elapsed = self.host.monotonic_now().sub(&started);
                    request.time.sub(&elapsed).saturating_non_negative()
                }
                _ => Timespec::ZERO,
            };
        }
        Ok(())
    }
}
