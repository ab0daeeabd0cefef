use gateway_core::types::Candle;
use strategy::prelude::{IndicatorSnapshot, Side, Signal, Strategy};

const VOLUME_SPIKE: f64 = 1.5;

pub struct VolumeBreakout;

impl Strategy for VolumeBreakout {
    fn name(&self) -> &'static str { "volume_breakout" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        if candles.len() < 20 || ind.volume_ratio.is_nan() {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }
        if ind.volume_ratio < VOLUME_SPIKE {
            return Signal::hold(self.name(), "no volume expansion", *ind);
        }
        let last = candles.last().expect("checked len above");
        let recent_high = candles[candles.len() - 20..].iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let recent_low = candles[candles.len() - 20..].iter().map(|c| c.low).fold(f64::MAX, f64::min);
        let strength = (ind.volume_ratio / 3.0).clamp(0.0, 1.0).max(0.5);

        if last.close >= recent_high {
            return Signal {
                strategy_name: self.name(),
                side: Side::Long,
                strength,
                confidence: 0.55,
                reason: "volume-confirmed breakout above recent high".to_string(),
                indicators: *ind,
            };
        }
        if last.close <= recent_low {
            return Signal {
                strategy_name: self.name(),
                side: Side::Short,
                strength,
                confidence: 0.55,
                reason: "volume-confirmed breakdown below recent low".to_string(),
                indicators: *ind,
            };
        }
        Signal::hold(self.name(), "volume spike without a price breakout", *ind)
    }
}
