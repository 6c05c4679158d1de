use crate::common::errno::Errno;
use crate::common::types::*;

use std::sync::RwLock;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Settings {
    pub cache_timer_capability: bool,
    pub path_not_found_is_enoent: bool,
}

impl Settings {
    const fn defaults() -> Self {
        Self {
            cache_timer_capability: false,
            path_not_found_is_enoent: false,
        }
    }

    pub fn from_flags(flags: u32) -> Self {
        Self {
            cache_timer_capability: flags & POSIXLINK_FLAG_CACHE_TIMER_CAPABILITY != 0,
            path_not_found_is_enoent: flags & POSIXLINK_FLAG_PATH_NOT_FOUND_IS_ENOENT != 0,
        }
    }
}

static SETTINGS: RwLock<Settings> = RwLock::new(Settings::defaults());

pub fn settings() -> Settings {
    match SETTINGS.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

pub fn install(settings: Settings) {
    let mut guard = match SETTINGS.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = settings;
}

/// Applies a caller-provided config block. A null pointer restores defaults;
/// a block smaller than the known layout is rejected.
///
/// # Safety
/// `config` must be null or point to a readable `PosixLinkConfig`.
pub unsafe fn configure(config: *const PosixLinkConfig) -> Result<(), Errno> {
    let Some(config) = config.as_ref() else {
        install(Settings::defaults());
        return Ok(());
    };
    if (config.size as usize) < std::mem::size_of::<PosixLinkConfig>() {
        return Err(Errno::InvalidArgument);
    }
    let known = POSIXLINK_FLAG_CACHE_TIMER_CAPABILITY | POSIXLINK_FLAG_PATH_NOT_FOUND_IS_ENOENT;
    if config.flags & !known != 0 {
        return Err(Errno::InvalidArgument);
    }
    let settings = Settings::from_flags(config.flags);
    log::debug!(target: "posixlink::config", "configured {settings:?}");
    install(settings);
    Ok(())
}

#[cfg(test)]
pub(crate) static TEST_CONFIG_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
