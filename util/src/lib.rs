#[macro_use]
extern crate tracing;

pub mod time;

#[path = "tracing.rs"]
pub mod logging;
