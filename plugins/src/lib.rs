//! Plug-in ports the filter pipeline consults: an ML quality scorer and an LLM policy layer.
//! Both are plain trait objects the host application wires up; there is no compile-time plugin
//! registry here, since the host links exactly one implementation of each per deployment.
#![deny(unused_must_use, unused_mut)]

#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate serde;
#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate tracing;

pub mod error;
pub mod llm;
pub mod ml;

pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::llm::{FailureMode, LlmPolicy, LlmPolicySettings, ParamBounds, PolicyAnalyzer, PolicyContext, PolicyDecision, RawPolicyDecision, RiskMode};
    pub use crate::ml::{apply as apply_ml_filter, MlFilterOutcome, MlMode, QualityScorer};
}
