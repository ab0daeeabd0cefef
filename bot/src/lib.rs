//! Wires the gateway, strategy ensemble, filter pipeline, risk manager and optional plugins into
//! one control loop (spec §4). `main.rs` only owns process startup and the `tokio` scheduling
//! loop; everything else lives here so it can be exercised by tests without a real exchange.
#![deny(unused_must_use, unused_mut)]

#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate serde;
#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate tracing;

pub mod analyzer;
pub mod config;
pub mod control_loop;
pub mod error;
pub mod indicators;
pub mod market;
pub mod state;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::control_loop::ControlLoop;
    pub use crate::error::{Error, Result};
    pub use crate::state::{BotState, PauseReason};
}
