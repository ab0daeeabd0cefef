use gateway_core::types::Candle;
use stats::indicators::{CrossAbove, CrossUnder};
use strategy::prelude::{IndicatorSnapshot, Side, Signal, Strategy};

use crate::series::ema_series;

pub struct EmaCross {
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for EmaCross {
    fn default() -> Self { Self { fast_period: 9, slow_period: 21 } }
}

impl Strategy for EmaCross {
    fn name(&self) -> &'static str { "ema_cross" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        if candles.len() < self.slow_period + 1 {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }
        let fast = ema_series(candles, self.fast_period);
        let slow = ema_series(candles, self.slow_period);
        let n = fast.len();
        let prev = (fast[n - 2], slow[n - 2]);
        let curr = (fast[n - 1], slow[n - 1]);

        let mut up = CrossAbove { last_delta: prev.0 - prev.1 };
        if up.binary(curr.0, curr.1) {
            return Signal {
                strategy_name: self.name(),
                side: Side::Long,
                strength: 0.65,
                confidence: 0.55,
                reason: format!("ema{} crossed above ema{}", self.fast_period, self.slow_period),
                indicators: *ind,
            };
        }
        let mut down = CrossUnder { last_delta: prev.0 - prev.1 };
        if down.binary(curr.0, curr.1) {
            return Signal {
                strategy_name: self.name(),
                side: Side::Short,
                strength: 0.65,
                confidence: 0.55,
                reason: format!("ema{} crossed below ema{}", self.fast_period, self.slow_period),
                indicators: *ind,
            };
        }
        Signal::hold(self.name(), "no crossover", *ind)
    }
}
