mod host;
mod timer;

pub use host::UnixHost;
pub use timer::EmulatedTimer;

pub type PlatformHost = UnixHost;
