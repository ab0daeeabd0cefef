//! Ties sizing, stops, metrics and the circuit breaker together behind one owner the bot loop
//! holds by explicit reference (spec §9: no language-level singleton).
use std::time::Duration;

use chrono::{DateTime, Utc};
use strategy::prelude::Side;

use crate::circuit_breaker::{CircuitBreakerSettings, CircuitBreakerState};
use crate::metrics::RiskMetrics;
use crate::position::Position;
use crate::sizing::{self, SizingInputs, SizingSettings};
use crate::stops::{self, ExitReason, StopSettings};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntervalSettings {
    pub idle_interval: Duration,
    pub position_interval: Duration,
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self { idle_interval: Duration::from_secs(5), position_interval: Duration::from_secs(2) }
    }
}

pub struct RiskManager {
    pub metrics: RiskMetrics,
    pub breaker: CircuitBreakerState,
    pub sizing: SizingSettings,
    pub stops: StopSettings,
    pub breaker_settings: CircuitBreakerSettings,
    pub intervals: IntervalSettings,
    pub starting_balance: f64,
}

impl RiskManager {
    #[must_use]
    pub fn new(starting_balance: f64, sizing: SizingSettings, stops: StopSettings, breaker_settings: CircuitBreakerSettings, intervals: IntervalSettings) -> Self {
        Self {
            metrics: RiskMetrics::default(),
            breaker: CircuitBreakerState::new(starting_balance, &breaker_settings),
            sizing,
            stops,
            breaker_settings,
            intervals,
            starting_balance,
        }
    }

    /// When flat, evaluate every `idle_interval`; in position, every `position_interval` for
    /// finer exit granularity (spec §4.5).
    #[must_use]
    pub fn check_interval(&self, has_open_position: bool) -> Duration {
        if has_open_position {
            self.intervals.position_interval
        } else {
            self.intervals.idle_interval
        }
    }

    #[must_use]
    pub fn size_order_usdt(&self, balance: f64, leverage: f64, price: f64, realised_volatility: f64, signal_strength: f64, signal_min_strength: f64, llm_multiplier: Option<f64>) -> f64 {
        let inputs = SizingInputs {
            balance,
            leverage,
            price,
            kelly_fraction: self.metrics.kelly_fraction(),
            realised_volatility,
            signal_strength,
            signal_min_strength,
            consecutive_losses: self.metrics.consecutive_losses,
            llm_position_multiplier: llm_multiplier,
        };
        sizing::position_size_usdt(&inputs, &self.sizing)
    }

    #[must_use]
    pub fn open_position(&self, side: Side, amount: f64, price: f64, leverage: f64, atr: f64, entry_fee: f64, now: DateTime<Utc>, strategy_name: impl Into<String>, reason: impl Into<String>) -> Position {
        let stop_loss = stops::compute_stop_loss(side, price, leverage, atr, &self.stops);
        let take_profit = stops::compute_take_profit(side, price, &self.stops);
        Position::open(side, amount, price, now, entry_fee, stop_loss, take_profit, strategy_name, reason)
    }

    #[must_use]
    pub fn evaluate_exit(&self, position: &mut Position, price: f64, manual_close_requested: bool) -> Option<ExitReason> {
        position.update_price_window(price);
        stops::evaluate_exit(position, price, manual_close_requested, &self.stops)
    }

    /// Records a position close, runs the circuit-breaker evaluation, and returns whether it
    /// just tripped.
    pub fn close_position(&mut self, pnl: f64, drawdown_pct_in_window: f64, now: DateTime<Utc>, next_day_boundary: DateTime<Utc>) -> bool {
        self.metrics.record_close(pnl);
        let was_tripped = self.breaker.tripped;
        self.breaker.evaluate(
            self.starting_balance,
            self.metrics.daily_pnl,
            self.metrics.consecutive_losses,
            drawdown_pct_in_window,
            &self.breaker_settings,
            now,
            next_day_boundary,
        );
        !was_tripped && self.breaker.tripped
    }

    pub fn maybe_clear_breaker(&mut self, now: DateTime<Utc>) { self.breaker.maybe_clear(now); }
}
