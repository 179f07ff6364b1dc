#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate byteorder;
extern crate get_if_addrs;
#[macro_use]
extern crate lazy_static;
#[cfg(target_os = "linux")]
extern crate libc;
#[macro_use]
extern crate log;
extern crate rand;

pub mod core;

#[cfg(target_os = "linux")]
pub mod linux;

pub mod testbed;

use crate::core::repr::Ipv4Address;

#[derive(Debug)]
pub enum Error {
    /// Indicates an error where a buffer was too small or too large.
    Exhausted,
    /// Indicates an error where a packet or frame is malformed.
    Malformed,
    /// Indicates an error where a checksum is invalid.
    Checksum,
    /// Indicates an error where a packet was dropped without processing.
    Ignored,
    /// Indicates an error where a next hop has no link-layer mapping.
    MacResolution(Ipv4Address),
    /// Indicates an error on an underlying device.
    Device(crate::core::dev::Error),
    /// Indicates a generic IO error.
    IO(std::io::Error),
}

impl From<crate::core::dev::Error> for Error {
    fn from(err: crate::core::dev::Error) -> Error {
        Error::Device(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IO(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
