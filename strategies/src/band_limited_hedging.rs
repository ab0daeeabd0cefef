//! Band-limited dynamic hedging (spec §4.9): a dual long+short position that rebalances as price
//! moves away from a reference point, realising profit from the winning leg and feeding part of
//! it into the losing leg. Unlike the other ensemble members this strategy is stateful across
//! ticks, so it isn't modelled as a [`strategy::prelude::Strategy`] — it owns its own
//! Active/Pause/Exit sub-state machine and is driven directly by the bot loop.
use strategy::prelude::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum HedgeState {
    Active,
    Paused,
    Exit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HedgeSettings {
    /// Minimum effective step as a multiple of the taker fee rate (default `9 × fee_rate`).
    pub mes_fee_multiplier: f64,
    /// Fraction of realised profit migrated to reduce the losing leg; the remainder is
    /// redistributed symmetrically to both legs.
    pub alpha: f64,
    pub base_position_ratio: f64,
    pub min_rebalance_profit_multiplier: f64,
    /// Below this realised volatility (annualised, over the rebalance window) the strategy exits.
    pub exit_eta: f64,
    pub exit_mes_ratio: f64,
    pub fee_rate: f64,
}

impl Default for HedgeSettings {
    fn default() -> Self {
        Self {
            mes_fee_multiplier: 9.0,
            alpha: 0.5,
            base_position_ratio: 0.95,
            min_rebalance_profit_multiplier: 1.5,
            exit_eta: 0.0005,
            exit_mes_ratio: 0.5,
            fee_rate: 0.0006,
        }
    }
}

impl HedgeSettings {
    #[must_use]
    pub fn mes(&self) -> f64 { self.mes_fee_multiplier * self.fee_rate }
}

/// One leg of the hedge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Leg {
    pub side: Side,
    pub size: f64,
    pub entry_price: f64,
}

impl Leg {
    #[must_use]
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.side {
            Side::Long => self.size * (price - self.entry_price),
            Side::Short => self.size * (self.entry_price - price),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RebalanceAction {
    pub closed_leg: Side,
    pub realized_profit: f64,
    pub new_reference_price: f64,
    pub migrated_to_losing_leg: f64,
    pub redistributed_per_leg: f64,
}

/// Tracks the dual-leg position and reference price; `maybe_rebalance` is called once per tick
/// while `state == Active`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandLimitedHedging {
    pub state: HedgeState,
    pub long: Leg,
    pub short: Leg,
    pub reference_price: f64,
    pub settings: HedgeSettings,
}

impl BandLimitedHedging {
    #[must_use]
    pub fn open(initial_capital: f64, price: f64, settings: HedgeSettings) -> Self {
        let per_leg = settings.base_position_ratio * initial_capital / 2.0;
        let size = per_leg / price;
        Self {
            state: HedgeState::Active,
            long: Leg { side: Side::Long, size, entry_price: price },
            short: Leg { side: Side::Short, size, entry_price: price },
            reference_price: price,
            settings,
        }
    }

    fn dynamic_threshold(&self, size: f64, price: f64) -> f64 {
        (size * price * self.settings.fee_rate * self.settings.min_rebalance_profit_multiplier).max(0.08)
    }

    /// Evaluates whether the move since `reference_price` exceeds the minimum effective step and,
    /// if so, realises the profitable leg and redistributes capital per the algorithm in §4.9.
    pub fn maybe_rebalance(&mut self, price: f64) -> Option<RebalanceAction> {
        if self.state != HedgeState::Active {
            return None;
        }
        let step = (price - self.reference_price).abs() / self.reference_price;
        if step < self.settings.mes() {
            return None;
        }

        let (winner, loser) = if price > self.reference_price { (self.long, self.short) } else { (self.short, self.long) };
        let profit = winner.unrealized_pnl(price);
        if profit < self.dynamic_threshold(winner.size, price) {
            return None;
        }

        let migrated = self.settings.alpha * profit;
        let redistributed_total = (1.0 - self.settings.alpha) * profit;
        let redistributed_per_leg = redistributed_total / 2.0;

        // `migrated` comes out of the realised profit, not the loser's notional, so it only
        // reduces the losing leg's exposure; the symmetric remainder still grows both legs.
        let new_loser_size = (loser.size - migrated / price).max(0.0);
        let new_winner_size = winner.size + redistributed_per_leg / price;
        let new_loser_size = new_loser_size + redistributed_per_leg / price;

        match winner.side {
            Side::Long => {
                self.long = Leg { side: Side::Long, size: new_winner_size, entry_price: price };
                self.short = Leg { side: Side::Short, size: new_loser_size, entry_price: price };
            }
            _ => {
                self.short = Leg { side: Side::Short, size: new_winner_size, entry_price: price };
                self.long = Leg { side: Side::Long, size: new_loser_size, entry_price: price };
            }
        }
        self.reference_price = price;

        Some(RebalanceAction {
            closed_leg: winner.side,
            realized_profit: profit,
            new_reference_price: price,
            migrated_to_losing_leg: migrated,
            redistributed_per_leg,
        })
    }

    /// Exits when effective volatility over the rebalance window collapses below `exit_eta`, or
    /// when risk capital committed exceeds the configured cap.
    pub fn maybe_exit(&mut self, realized_volatility: f64, risk_capital_used: f64, risk_capital_cap: f64) {
        if self.state != HedgeState::Active {
            return;
        }
        if realized_volatility < self.settings.exit_eta || risk_capital_used > risk_capital_cap {
            self.state = HedgeState::Exit;
        }
    }

    pub fn pause(&mut self) { self.state = HedgeState::Paused; }

    pub fn resume(&mut self) { self.state = HedgeState::Active; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebalance_triggers_above_mes_and_moves_reference_price() {
        let settings = HedgeSettings { fee_rate: 0.0006, ..HedgeSettings::default() };
        let mut hedge = BandLimitedHedging::open(10_000.0, 100.0, settings);
        let action = hedge.maybe_rebalance(100.91);
        assert!(action.is_some());
        assert_eq!(hedge.reference_price, 100.91);
    }

    #[test]
    fn no_rebalance_below_mes() {
        let mut hedge = BandLimitedHedging::open(10_000.0, 100.0, HedgeSettings::default());
        assert!(hedge.maybe_rebalance(100.1).is_none());
    }

    #[test]
    fn paused_hedge_never_rebalances() {
        let mut hedge = BandLimitedHedging::open(10_000.0, 100.0, HedgeSettings::default());
        hedge.pause();
        assert!(hedge.maybe_rebalance(105.0).is_none());
    }
}
