use gateway_core::types::Candle;
use strategy::prelude::{IndicatorSnapshot, Side, Signal, Strategy};

use crate::series::kdj_series;

pub struct KdjCross;

impl Strategy for KdjCross {
    fn name(&self) -> &'static str { "kdj_cross" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        if candles.len() < 10 {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }
        let series = kdj_series(candles, 9);
        let n = series.len();
        let (prev, curr) = (series[n - 2], series[n - 1]);

        let crossed_up = prev.k <= prev.d && curr.k > curr.d;
        let crossed_down = prev.k >= prev.d && curr.k < curr.d;

        if crossed_up && curr.k < 80.0 {
            return Signal {
                strategy_name: self.name(),
                side: Side::Long,
                strength: ((80.0 - curr.k) / 80.0).clamp(0.0, 1.0).max(0.5),
                confidence: 0.5,
                reason: "K crossed above D out of oversold territory".to_string(),
                indicators: *ind,
            };
        }
        if crossed_down && curr.k > 20.0 {
            return Signal {
                strategy_name: self.name(),
                side: Side::Short,
                strength: ((curr.k - 20.0) / 80.0).clamp(0.0, 1.0).max(0.5),
                confidence: 0.5,
                reason: "K crossed below D out of overbought territory".to_string(),
                indicators: *ind,
            };
        }
        Signal::hold(self.name(), "no crossover", *ind)
    }
}
