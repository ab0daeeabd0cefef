use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("plugin call timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("plugin call failed: {0}")]
    CallFailed(String),
    #[error("daily call cap of {0} reached")]
    DailyCallCapReached(u32),
    #[error("daily cost cap of ${0:.2} reached")]
    DailyCostCapReached(f64),
    #[error("response failed schema validation: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = core::result::Result<T, Error>;
