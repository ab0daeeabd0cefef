//! Strategy ensemble: per-strategy `Signal`s, consensus aggregation, and the market-regime
//! detector that gates which strategies are active (spec §4.2–§4.3). Concrete strategies live in
//! the sibling `strategies` crate; this crate only defines the contract and the pure algorithms.
#![deny(unused_must_use, unused_mut)]

#[macro_use]
extern crate serde;
#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate tracing;

pub mod ensemble;
pub mod indicator_snapshot;
pub mod regime;
pub mod settings;
pub mod signal;
pub mod strategy;

pub mod prelude {
    pub use crate::ensemble::{aggregate, EnsembleThresholds};
    pub use crate::indicator_snapshot::IndicatorSnapshot;
    pub use crate::regime::{allowed_strategies, classify, Regime, RegimeOutput, RegimeThresholds};
    pub use crate::settings::StrategySettings;
    pub use crate::signal::{AggregatedSignal, Side, Signal};
    pub use crate::strategy::Strategy;
}
