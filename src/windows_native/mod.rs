mod host;
mod timer;
mod win32;

pub use host::WindowsHost;
pub use timer::NativeTimer;

pub type PlatformHost = WindowsHost;
