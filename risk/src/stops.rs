//! Stop-loss, fixed/dynamic take-profit, and trailing-stop computation (spec §4.5). Dynamic
//! take-profit and the trailing stop are kept as distinct mechanisms per the §9 design note: the
//! former is a realised-profit-gated mean-reversion exit, the latter a peak-tracking offset exit.
use strategy::prelude::Side;

use crate::position::Position;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StopSettings {
    pub sl_pct: f64,
    pub atr_multiplier: f64,
    pub tp_pct: f64,
    pub trailing_stop_pct: f64,
    pub dynamic_tp_enabled: bool,
    pub dynamic_tp_min_profit_usdt: f64,
    pub dynamic_tp_fee_multiplier: f64,
    pub dynamic_tp_fallback_pct: f64,
    pub fee_rate: f64,
}

impl Default for StopSettings {
    fn default() -> Self {
        Self {
            sl_pct: 0.02,
            atr_multiplier: 2.5,
            tp_pct: 0.04,
            trailing_stop_pct: 0.01,
            dynamic_tp_enabled: true,
            dynamic_tp_min_profit_usdt: 0.08,
            dynamic_tp_fee_multiplier: 1.5,
            dynamic_tp_fallback_pct: 0.004,
            fee_rate: 0.0006,
        }
    }
}

/// Picks the wider of the fixed and ATR-based stop-loss candidates (min for longs, max for
/// shorts) so the tighter of the two never forces a premature exit.
#[must_use]
pub fn compute_stop_loss(side: Side, entry: f64, leverage: f64, atr: f64, settings: &StopSettings) -> f64 {
    let fixed = match side {
        Side::Long => entry * (1.0 - settings.sl_pct / leverage),
        _ => entry * (1.0 + settings.sl_pct / leverage),
    };
    let atr_based = match side {
        Side::Long => entry - settings.atr_multiplier * atr,
        _ => entry + settings.atr_multiplier * atr,
    };
    match side {
        Side::Long => fixed.min(atr_based),
        _ => fixed.max(atr_based),
    }
}

#[must_use]
pub fn compute_take_profit(side: Side, entry: f64, settings: &StopSettings) -> f64 {
    match side {
        Side::Long => entry * (1.0 + settings.tp_pct),
        _ => entry * (1.0 - settings.tp_pct),
    }
}

#[must_use]
fn dynamic_tp_threshold(position: &Position, price: f64, settings: &StopSettings) -> f64 {
    (position.amount * price * settings.fee_rate * settings.dynamic_tp_fee_multiplier).max(settings.dynamic_tp_min_profit_usdt)
}

/// Trailing stop only activates once it has moved into locked-in profit territory (`trailing_price
/// > entry` for longs, symmetric for shorts) — never earlier (spec §4.5, §8 boundary behaviour).
#[must_use]
fn trailing_price(position: &Position, settings: &StopSettings) -> Option<f64> {
    let candidate = match position.side {
        Side::Long => position.highest_price * (1.0 - settings.trailing_stop_pct),
        _ => position.lowest_price * (1.0 + settings.trailing_stop_pct),
    };
    let locked_in = match position.side {
        Side::Long => candidate > position.entry_price,
        _ => candidate < position.entry_price,
    };
    locked_in.then_some(candidate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    FixedTakeProfit,
    DynamicTrailingTakeProfit,
    TrailingStop,
    ManualClose,
}

/// Exit evaluation in the exact order of spec §4.5: stop-loss, fixed take-profit, dynamic
/// trailing take-profit, trailing stop, manual close. First trigger wins.
#[must_use]
pub fn evaluate_exit(position: &mut Position, price: f64, manual_close_requested: bool, settings: &StopSettings) -> Option<ExitReason> {
    let hit_stop_loss = match position.side {
        Side::Long => price <= position.stop_loss_price,
        _ => price >= position.stop_loss_price,
    };
    if hit_stop_loss {
        return Some(ExitReason::StopLoss);
    }

    let hit_fixed_tp = match position.side {
        Side::Long => price >= position.take_profit_price,
        _ => price <= position.take_profit_price,
    };
    if hit_fixed_tp {
        return Some(ExitReason::FixedTakeProfit);
    }

    if settings.dynamic_tp_enabled {
        let net_profit = position.unrealized_pnl(price) - position.entry_fee;
        if !position.dynamic_tp_activated && net_profit > dynamic_tp_threshold(position, price, settings) {
            position.dynamic_tp_activated = true;
        }
        if position.dynamic_tp_activated {
            if let Some(mean) = position.recent_price_mean() {
                let triggered = match position.side {
                    Side::Long => price <= mean * (1.0 - settings.dynamic_tp_fallback_pct),
                    _ => price >= mean * (1.0 + settings.dynamic_tp_fallback_pct),
                };
                if triggered {
                    return Some(ExitReason::DynamicTrailingTakeProfit);
                }
            }
        }
    }

    if let Some(trail) = trailing_price(position, settings) {
        position.trailing_activated = true;
        let hit_trailing = match position.side {
            Side::Long => price <= trail,
            _ => price >= trail,
        };
        if hit_trailing {
            return Some(ExitReason::TrailingStop);
        }
    }

    if manual_close_requested {
        return Some(ExitReason::ManualClose);
    }

    None
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn atr_stop_wins_when_wider_than_fixed() {
        let settings = StopSettings { sl_pct: 0.004 * 1.0, atr_multiplier: 2.5, ..StopSettings::default() };
        // fixed sl_pct/leverage = 0.004 at leverage 1 -> 99.6; atr 2.5*1.0 -> 97.5; expect 97.5.
        let sl = compute_stop_loss(Side::Long, 100.0, 1.0, 1.0, &settings);
        assert!((sl - 97.5).abs() < 1e-9);
    }

    #[test]
    fn trailing_never_activates_before_locked_in_profit() {
        let mut pos = Position::open(Side::Long, 1.0, 100.0, Utc::now(), 0.0, 95.0, 110.0, "t", "t");
        pos.update_price_window(100.5);
        assert!(trailing_price(&pos, &StopSettings::default()).is_none());
    }

    #[test]
    fn exit_order_prefers_stop_loss_over_everything_else() {
        let mut pos = Position::open(Side::Long, 1.0, 100.0, Utc::now(), 0.0, 99.0, 101.0, "t", "t");
        let exit = evaluate_exit(&mut pos, 98.0, true, &StopSettings::default());
        assert_eq!(exit, Some(ExitReason::StopLoss));
    }

    #[test]
    fn dynamic_trailing_take_profit_fires_per_spec_scenario() {
        let settings = StopSettings {
            fee_rate: 0.0006,
            dynamic_tp_min_profit_usdt: 0.08,
            dynamic_tp_fee_multiplier: 1.5,
            dynamic_tp_fallback_pct: 0.004,
            tp_pct: 10.0, // disable fixed TP for this scenario
            trailing_stop_pct: 10.0, // disable trailing stop for this scenario
            ..StopSettings::default()
        };
        let size = 1.0;
        let mut pos = Position::open(Side::Long, size, 100.0, Utc::now(), 0.0, 90.0, 1_000.0, "t", "t");
        // Window mean works out to 101.9, matching the spec §8 scenario exactly.
        for p in [101.7, 101.8, 101.9, 102.0, 102.1] {
            pos.update_price_window(p);
        }
        let _ = evaluate_exit(&mut pos, 102.1, false, &settings);
        assert!(pos.dynamic_tp_activated);
        let exit = evaluate_exit(&mut pos, 101.4, false, &settings);
        assert_eq!(exit, Some(ExitReason::DynamicTrailingTakeProfit));
    }
}
