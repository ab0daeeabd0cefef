//! Indicator library underpinning the strategy ensemble: thin wrappers over `ta`'s streaming
//! indicators plus the handful (ADX, KDJ, volume ratio) it doesn't ship.
#[cfg(test)]
#[macro_use]
extern crate float_cmp;
#[macro_use]
extern crate serde;
#[macro_use]
extern crate thiserror;

pub use ta::{Close, High, Low, Next, Open, Reset, Volume};

pub mod error;
pub mod indicators;

pub use error::{Error, Result};
