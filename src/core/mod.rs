//! Core, platform independent router code.

pub mod check;
pub mod dev;
pub mod dv;
pub mod neighbors;
pub mod repr;
pub mod route;
pub mod service;
pub mod time;
