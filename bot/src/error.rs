//! Top-level error type for the control loop. Every fallible step funnels into this so
//! [`crate::control_loop::ControlLoop::tick`] has one `Result` to reason about (spec §4.10).
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Gateway(#[from] gateway::error::Error),
    #[error("indicator engine construction failed: {0}")]
    Indicators(#[from] anyhow::Error),
    #[error("configuration invalid: {0}")]
    Config(String),
}

pub type Result<T> = core::result::Result<T, Error>;
