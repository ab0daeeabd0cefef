//! Prometheus metrics surface for the trading core (spec.md §6's emitted event stream, realized
//! as counters/gauges rather than a bespoke event bus).
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate tracing;
#[macro_use]
extern crate prometheus;

pub mod trading;

pub mod prelude {
    pub use crate::trading::*;
}
