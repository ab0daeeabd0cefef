//! Per-exchange error backoff state (§4.6). Doubles from `min_backoff` to `max_backoff` on each
//! consecutive failure and decays after `reset_after` of idle success.
use std::time::Duration;

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    pub min_backoff: Duration,
    pub max_backoff: Duration,
    pub reset_after: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(120),
            reset_after: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeBackoffState {
    config: BackoffConfig,
    last_error_kind: Option<ErrorKind>,
    consecutive_errors: u32,
    paused_until_ms: i64,
    last_success_ms: i64,
}

impl ExchangeBackoffState {
    #[must_use]
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            last_error_kind: None,
            consecutive_errors: 0,
            paused_until_ms: 0,
            last_success_ms: 0,
        }
    }

    /// Whether calls must be rejected locally without reaching the exchange.
    #[must_use]
    pub fn is_paused(&self, now_ms: i64) -> bool { now_ms < self.paused_until_ms }

    #[must_use]
    pub fn paused_until_ms(&self) -> i64 { self.paused_until_ms }

    #[must_use]
    pub fn consecutive_errors(&self) -> u32 { self.consecutive_errors }

    /// Record a failure and compute the new pause window. Non-retryable kinds (`AuthFailure`,
    /// `InvariantViolation`, `Fatal`) still accumulate the counter so callers can observe it, but
    /// the gateway must surface them rather than silently retry — that decision is the caller's.
    pub fn record_error(&mut self, kind: ErrorKind, now_ms: i64) {
        self.last_error_kind = Some(kind);
        self.consecutive_errors += 1;
        let shift = self.consecutive_errors.saturating_sub(1).min(20);
        let backoff = self.config.min_backoff.saturating_mul(1u32.checked_shl(shift).unwrap_or(u32::MAX));
        let backoff = backoff.min(self.config.max_backoff);
        self.paused_until_ms = now_ms + backoff.as_millis() as i64;
    }

    /// A successful call decays the counter once the exchange has been quiet for `reset_after`.
    pub fn record_success(&mut self, now_ms: i64) {
        if self.last_success_ms > 0 && now_ms - self.last_success_ms >= self.config.reset_after.as_millis() as i64 {
            self.consecutive_errors = 0;
            self.last_error_kind = None;
        }
        self.last_success_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_backoff_up_to_max() {
        let config = BackoffConfig {
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(8),
            reset_after: Duration::from_secs(60),
        };
        let mut state = ExchangeBackoffState::new(config);
        state.record_error(ErrorKind::TransientNetwork, 0);
        assert_eq!(state.paused_until_ms(), 1_000);
        state.record_error(ErrorKind::TransientNetwork, 1_000);
        assert_eq!(state.paused_until_ms(), 1_000 + 2_000);
        state.record_error(ErrorKind::TransientNetwork, 3_000);
        assert_eq!(state.paused_until_ms(), 3_000 + 4_000);
        state.record_error(ErrorKind::TransientNetwork, 7_000);
        // would be 8s but clamps to max_backoff of 8s, same result here
        assert_eq!(state.paused_until_ms(), 7_000 + 8_000);
        state.record_error(ErrorKind::TransientNetwork, 15_000);
        // next doubling would exceed max_backoff, clamp applies
        assert_eq!(state.paused_until_ms(), 15_000 + 8_000);
    }

    #[test]
    fn idle_success_resets_counter() {
        let config = BackoffConfig {
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            reset_after: Duration::from_secs(30),
        };
        let mut state = ExchangeBackoffState::new(config);
        state.record_error(ErrorKind::TransientNetwork, 0);
        assert_eq!(state.consecutive_errors(), 1);
        state.record_success(1_000);
        assert_eq!(state.consecutive_errors(), 1, "too soon to reset");
        state.record_success(40_000);
        assert_eq!(state.consecutive_errors(), 0);
    }

    #[test]
    fn is_paused_reflects_window() {
        let mut state = ExchangeBackoffState::new(BackoffConfig::default());
        state.record_error(ErrorKind::RateLimit, 0);
        assert!(state.is_paused(500));
        assert!(!state.is_paused(1_500));
    }
}
