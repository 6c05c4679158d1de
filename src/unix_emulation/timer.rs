use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::common::native::{NativeError, ERROR_INVALID_HANDLE, ERROR_INVALID_PARAMETER};
use crate::common::time::DELTA_EPOCH_IN_100NS;
use crate::host::{TimerKind, WaitableTimer};

#[derive(Debug)]
pub struct EmulatedTimer {
    kind: TimerKind,
    deadline: Option<Instant>,
}

fn invalid_due_time() -> NativeError {
    NativeError::new(ERROR_INVALID_PARAMETER, "The parameter is incorrect.")
}

fn ticks_to_duration(ticks: u64) -> Result<Duration, NativeError> {
    ticks
        .checked_mul(100)
        .map(Duration::from_nanos)
        .ok_or_else(invalid_due_time)
}

impl EmulatedTimer {
    pub fn new(kind: TimerKind) -> Self {
        Self {
            kind,
            deadline: None,
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }
}

impl WaitableTimer for EmulatedTimer {
    fn arm(&mut self, due_time: i64) -> Result<(), NativeError> {
        let now = Instant::now();
        let wait = if due_time < 0 {
            ticks_to_duration(due_time.unsigned_abs())?
        } else {
            let since_unix = due_time.saturating_sub(DELTA_EPOCH_IN_100NS).max(0) as u64;
            let target = UNIX_EPOCH
                .checked_add(ticks_to_duration(since_unix)?)
                .ok_or_else(invalid_due_time)?;
            target.duration_since(SystemTime::now()).unwrap_or_default()
        };
        self.deadline = Some(now.checked_add(wait).ok_or_else(invalid_due_time)?);
        Ok(())
    }

    fn wait(&mut self) -> Result<(), NativeError> {
        let Some(deadline) = self.deadline else {
            return Err(NativeError::new(ERROR_INVALID_HANDLE, "The timer was never armed."));
        };
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            std::thread::sleep(deadline - now);
        }
    }
}
