//! Ordered signal-filter pipeline (spec §4.4): circuit breaker, direction, trend,
//! execution-quality, optional ML quality and optional LLM policy gates, short-circuiting on the
//! first rejection and recording every verdict into a [`trade_tag::TradeTag`].
#![deny(unused_must_use, unused_mut)]

#[macro_use]
extern crate serde;
#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate thiserror;
#[macro_use]
extern crate tracing;

pub mod direction;
pub mod error;
pub mod execution_quality;
pub mod pipeline;
pub mod trade_tag;
pub mod trend;

pub mod prelude {
    pub use crate::direction::DirectionThresholds;
    pub use crate::error::{Error, Result};
    pub use crate::execution_quality::{ExecutionQualityInputs, ExecutionQualitySettings};
    pub use crate::pipeline::{final_action, run_llm_gate, run_sync_gates, PipelineContext, PipelineSettings};
    pub use crate::trade_tag::{GateName, GateRecord, TradeTag};
}
