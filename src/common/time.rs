pub const NSEC_PER_SEC: i64 = 1_000_000_000;

/// 100ns intervals between the Windows epoch (1601-01-01) and the Unix epoch.
pub const DELTA_EPOCH_IN_100NS: i64 = 116_444_736_000_000_000;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Timespec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}

impl Timespec {
    pub const ZERO: Timespec = Timespec { tv_sec: 0, tv_nsec: 0 };

    pub const fn new(tv_sec: i64, tv_nsec: i64) -> Self {
        Self { tv_sec, tv_nsec }
    }

    pub fn is_valid(&self) -> bool {
        self.tv_sec >= 0 && (0..NSEC_PER_SEC).contains(&self.tv_nsec)
    }

    pub fn is_negative(&self) -> bool {
        self.tv_sec < 0
    }

    // Seconds saturate at the i64 bounds.
    pub fn sub(&self, other: &Timespec) -> Timespec {
        let mut sec = self.tv_sec.saturating_sub(other.tv_sec);
        let mut nsec = self.tv_nsec - other.tv_nsec;
        if nsec < 0 {
            sec = sec.saturating_sub(1);
            nsec += NSEC_PER_SEC;
        }
        Timespec::new(sec, nsec)
    }

    pub fn add(&self, other: &Timespec) -> Timespec {
        let mut sec = self.tv_sec.saturating_add(other.tv_sec);
        let mut nsec = self.tv_nsec + other.tv_nsec;
        if nsec >= NSEC_PER_SEC {
            sec = sec.saturating_add(1);
            nsec -= NSEC_PER_SEC;
        }
        Timespec::new(sec, nsec)
    }

    pub fn saturating_non_negative(self) -> Timespec {
        if self.is_negative() {
            Timespec::ZERO
        } else {
            self
        }
    }

    /// Whole 100ns kernel ticks, or `None` when the value does not fit.
    pub fn to_100ns(&self) -> Option<i64> {
        let nanos = self.tv_sec.checked_mul(NSEC_PER_SEC)?.checked_add(self.tv_nsec)?;
        Some(nanos / 100)
    }

    pub fn to_duration(&self) -> std::time::Duration {
        let valid = self.saturating_non_negative();
        std::time::Duration::new(valid.tv_sec as u64, valid.tv_nsec as u32)
    }

    pub fn from_duration(duration: std::time::Duration) -> Timespec {
        Timespec::new(duration.as_secs() as i64, duration.subsec_nanos() as i64)
    }
}
