pub mod errno;
pub mod native;
pub mod time;
pub mod types;
