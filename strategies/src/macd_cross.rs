use gateway_core::types::Candle;
use stats::indicators::CrossAbove;
use strategy::prelude::{IndicatorSnapshot, Side, Signal, Strategy};

use crate::series::macd_series;

pub struct MacdCross;

impl Strategy for MacdCross {
    fn name(&self) -> &'static str { "macd_cross" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        if candles.len() < 35 {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }
        let series = macd_series(candles, 12, 26, 9);
        let [prev, curr] = match series.as_slice() {
            [.., a, b] => [*a, *b],
            _ => return Signal::hold(self.name(), "insufficient history", *ind),
        };

        let mut up = CrossAbove { last_delta: prev.macd - prev.signal };
        if up.binary(curr.macd, curr.signal) {
            let strength = (curr.histogram.abs() / ind.atr.max(1e-9)).clamp(0.0, 1.0).max(0.5);
            return Signal {
                strategy_name: self.name(),
                side: Side::Long,
                strength,
                confidence: 0.6,
                reason: "MACD crossed above signal".to_string(),
                indicators: *ind,
            };
        }
        let crossed_down = prev.macd - prev.signal > 0.0 && curr.macd - curr.signal <= 0.0;
        if crossed_down {
            let strength = (curr.histogram.abs() / ind.atr.max(1e-9)).clamp(0.0, 1.0).max(0.5);
            return Signal {
                strategy_name: self.name(),
                side: Side::Short,
                strength,
                confidence: 0.6,
                reason: "MACD crossed below signal".to_string(),
                indicators: *ind,
            };
        }
        Signal::hold(self.name(), "no crossover", *ind)
    }
}
