//! Canned router setups for demos and tests.

mod env;

pub use self::env::*;
