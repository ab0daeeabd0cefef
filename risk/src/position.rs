//! The single canonical `Position` value (spec §9 design note resolving the source's recurring
//! dict-vs-object ambiguity): adapters translate exchange responses into this type at the
//! gateway boundary and nowhere else.
use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use strategy::prelude::Side;

const RECENT_PRICES_CAPACITY: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub side: Side,
    pub amount: f64,
    pub entry_price: f64,
    pub entry_time: DateTime<Utc>,
    pub entry_fee: f64,
    pub stop_loss_price: f64,
    pub take_profit_price: f64,
    pub trailing_activated: bool,
    pub dynamic_tp_activated: bool,
    pub highest_price: f64,
    pub lowest_price: f64,
    pub max_profit_usdt: f64,
    pub recent_prices: VecDeque<f64>,
    pub strategy_name: String,
    pub reason: String,
}

impl Position {
    #[must_use]
    pub fn open(
        side: Side,
        amount: f64,
        entry_price: f64,
        entry_time: DateTime<Utc>,
        entry_fee: f64,
        stop_loss_price: f64,
        take_profit_price: f64,
        strategy_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            side,
            amount,
            entry_price,
            entry_time,
            entry_fee,
            stop_loss_price,
            take_profit_price,
            trailing_activated: false,
            dynamic_tp_activated: false,
            highest_price: entry_price,
            lowest_price: entry_price,
            max_profit_usdt: 0.0,
            recent_prices: VecDeque::with_capacity(RECENT_PRICES_CAPACITY),
            strategy_name: strategy_name.into(),
            reason: reason.into(),
        }
    }

    /// Reconstructs a `Position` from an exchange-reported open position on startup (spec §4.8),
    /// conservatively filling fields the exchange doesn't report.
    #[must_use]
    pub fn reconstruct(side: Side, amount: f64, entry_price: f64, current_price: f64, now: DateTime<Utc>) -> Self {
        Self::open(side, amount, entry_price, now, 0.0, entry_price, entry_price, "recovered", "startup position recovery")
            .tap_price(current_price)
    }

    fn tap_price(mut self, price: f64) -> Self {
        self.update_price_window(price);
        self
    }

    /// Mutated on each tick: updates the favourable/unfavourable extremes and the trailing FIFO.
    pub fn update_price_window(&mut self, price: f64) {
        self.highest_price = self.highest_price.max(price);
        self.lowest_price = self.lowest_price.min(price);
        if self.recent_prices.len() == RECENT_PRICES_CAPACITY {
            self.recent_prices.pop_front();
        }
        self.recent_prices.push_back(price);
        let pnl = self.unrealized_pnl(price);
        self.max_profit_usdt = self.max_profit_usdt.max(pnl);
    }

    #[must_use]
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.side {
            Side::Long => self.amount * (price - self.entry_price),
            Side::Short => self.amount * (self.entry_price - price),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn recent_price_mean(&self) -> Option<f64> {
        if self.recent_prices.is_empty() {
            None
        } else {
            Some(self.recent_prices.iter().sum::<f64>() / self.recent_prices.len() as f64)
        }
    }
}
