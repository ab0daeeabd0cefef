//! Global trading halt triggered by loss or drawdown thresholds (spec §4.5, §4.10). While
//! tripped, no `PositionOpened` event may be emitted until cleared (spec §8 invariant).
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum TripReason {
    DailyLoss,
    ConsecutiveLosses,
    RapidDrawdown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CircuitBreakerSettings {
    pub max_daily_loss_pct: f64,
    pub max_consecutive_losses: u32,
    pub rapid_drawdown_pct: f64,
    pub rapid_drawdown_window_mins: i64,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            max_daily_loss_pct: 0.05,
            max_consecutive_losses: 5,
            rapid_drawdown_pct: 0.03,
            rapid_drawdown_window_mins: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CircuitBreakerState {
    pub daily_loss_budget: f64,
    pub tripped: bool,
    pub tripped_reason: Option<TripReason>,
    pub reset_at: Option<DateTime<Utc>>,
}

impl CircuitBreakerState {
    #[must_use]
    pub fn new(starting_balance: f64, settings: &CircuitBreakerSettings) -> Self {
        Self {
            daily_loss_budget: starting_balance * settings.max_daily_loss_pct,
            tripped: false,
            tripped_reason: None,
            reset_at: None,
        }
    }

    fn trip(&mut self, reason: TripReason, reset_at: DateTime<Utc>) {
        self.tripped = true;
        self.tripped_reason = Some(reason);
        self.reset_at = Some(reset_at);
        error!(reason = ?reason, "circuit breaker tripped");
    }

    /// Evaluates the three trip conditions against current state; `next_day_boundary` is the
    /// UTC midnight the daily-loss trip resets at.
    pub fn evaluate(
        &mut self,
        starting_balance: f64,
        daily_pnl: f64,
        consecutive_losses: u32,
        drawdown_pct_in_window: f64,
        settings: &CircuitBreakerSettings,
        now: DateTime<Utc>,
        next_day_boundary: DateTime<Utc>,
    ) {
        if self.tripped {
            return;
        }
        if starting_balance > 0.0 && daily_pnl / starting_balance <= -settings.max_daily_loss_pct {
            self.trip(TripReason::DailyLoss, next_day_boundary);
            return;
        }
        if consecutive_losses >= settings.max_consecutive_losses {
            self.trip(TripReason::ConsecutiveLosses, now + chrono::Duration::hours(1));
            return;
        }
        if drawdown_pct_in_window >= settings.rapid_drawdown_pct {
            self.trip(TripReason::RapidDrawdown, now + chrono::Duration::minutes(settings.rapid_drawdown_window_mins));
        }
    }

    /// Clears the trip once `now` has passed `reset_at`.
    pub fn maybe_clear(&mut self, now: DateTime<Utc>) {
        if self.tripped {
            if let Some(reset_at) = self.reset_at {
                if now >= reset_at {
                    self.tripped = false;
                    self.tripped_reason = None;
                    self.reset_at = None;
                    info!("circuit breaker cleared");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_loss_breach_trips() {
        let settings = CircuitBreakerSettings::default();
        let mut state = CircuitBreakerState::new(10_000.0, &settings);
        let now = Utc::now();
        state.evaluate(10_000.0, -550.0, 0, 0.0, &settings, now, now + chrono::Duration::hours(1));
        assert!(state.tripped);
        assert_eq!(state.tripped_reason, Some(TripReason::DailyLoss));
    }

    #[test]
    fn clears_after_reset_at() {
        let settings = CircuitBreakerSettings::default();
        let mut state = CircuitBreakerState::new(10_000.0, &settings);
        let now = Utc::now();
        state.evaluate(10_000.0, -550.0, 0, 0.0, &settings, now, now);
        assert!(state.tripped);
        state.maybe_clear(now + chrono::Duration::seconds(1));
        assert!(!state.tripped);
    }
}
