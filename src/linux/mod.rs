//! Linux specific devices.

mod dev;
mod libc;

pub use self::dev::Tap;
