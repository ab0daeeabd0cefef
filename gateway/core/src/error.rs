//! Error type returned by [`crate::gateway::ExchangeGateway`] implementations and the kind
//! classification used to drive [`crate::backoff::ExchangeBackoffState`].
use thiserror::Error;

use crate::exchange::Exchange;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    ParseFloat(#[from] ::std::num::ParseFloatError),
    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),
    #[error("network error talking to {0}: {1}")]
    TransientNetwork(Exchange, String),
    #[error("rate limit exceeded on {0}")]
    RateLimit(Exchange),
    #[error("authentication failed for {0}: {1}")]
    AuthFailure(Exchange, String),
    #[error("order rejected: {0}")]
    OrderRejected(String),
    #[error("insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: f64, available: f64 },
    #[error("market closed for {0}")]
    MarketClosed(String),
    #[error("stale data: last update {age_ms}ms ago exceeds {max_age_ms}ms")]
    StaleData { age_ms: i64, max_age_ms: i64 },
    #[error("plugin unavailable: {0}")]
    PluginUnavailable(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("fatal error: {0}")]
    Fatal(String),
    #[error("exchange returned an unhandled error: {0}")]
    ExchangeError(String),
    #[error("invalid config: expected credentials for {expected:?}, found {find:?}")]
    InvalidConfigType { expected: Exchange, find: Exchange },
    #[error("missing field \"{0}\"")]
    MissingField(String),
    #[error("feature not implemented by this exchange adapter")]
    FeatureNotImplemented,
    #[error("order not found: {0}")]
    NotFound(String),
    #[error("gateway is paused until {until} due to {reason}")]
    Paused { reason: String, until: i64 },
}

/// Coarse error classification driving the exponential backoff in §4.6 / §7. Two errors of the
/// same kind get the same backoff treatment regardless of their exact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    TransientNetwork,
    RateLimit,
    AuthFailure,
    OrderRejected,
    InsufficientBalance,
    MarketClosed,
    StaleData,
    PluginUnavailable,
    InvariantViolation,
    Fatal,
    Other,
}

impl ErrorKind {
    /// `AuthFailure` and `InvariantViolation` must never be retried silently; everything else can
    /// be retried behind a backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool { !matches!(self, Self::AuthFailure | Self::InvariantViolation | Self::Fatal) }
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TransientNetwork(..) | Self::HttpClient(_) => ErrorKind::TransientNetwork,
            Self::RateLimit(_) => ErrorKind::RateLimit,
            Self::AuthFailure(..) => ErrorKind::AuthFailure,
            Self::OrderRejected(_) => ErrorKind::OrderRejected,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::MarketClosed(_) => ErrorKind::MarketClosed,
            Self::StaleData { .. } => ErrorKind::StaleData,
            Self::PluginUnavailable(_) => ErrorKind::PluginUnavailable,
            Self::InvariantViolation(_) => ErrorKind::InvariantViolation,
            Self::Fatal(_) => ErrorKind::Fatal,
            _ => ErrorKind::Other,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
