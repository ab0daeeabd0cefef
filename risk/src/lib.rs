#![deny(unused_must_use, unused_mut)]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate tracing;

pub mod circuit_breaker;
pub mod manager;
pub mod metrics;
pub mod position;
pub mod sizing;
pub mod stops;

pub mod prelude {
    pub use crate::circuit_breaker::{CircuitBreakerSettings, CircuitBreakerState, TripReason};
    pub use crate::manager::{IntervalSettings, RiskManager};
    pub use crate::metrics::RiskMetrics;
    pub use crate::position::Position;
    pub use crate::sizing::{SizingInputs, SizingSettings};
    pub use crate::stops::{ExitReason, StopSettings};
}
