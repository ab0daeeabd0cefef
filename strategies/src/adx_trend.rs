use gateway_core::types::Candle;
use strategy::prelude::{IndicatorSnapshot, Side, Signal, Strategy};

const TREND_ADX: f64 = 25.0;

pub struct AdxTrend;

impl Strategy for AdxTrend {
    fn name(&self) -> &'static str { "adx_trend" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        if candles.len() < 20 {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }
        if ind.adx.adx < TREND_ADX {
            return Signal::hold(self.name(), "adx below trend threshold", *ind);
        }
        let di_spread = (ind.adx.plus_di - ind.adx.minus_di).abs();
        let strength = (di_spread / 40.0).clamp(0.0, 1.0).max(0.5);

        if ind.adx.plus_di > ind.adx.minus_di {
            return Signal {
                strategy_name: self.name(),
                side: Side::Long,
                strength,
                confidence: (ind.adx.adx / 50.0).clamp(0.0, 1.0),
                reason: "strong trend with +DI dominant".to_string(),
                indicators: *ind,
            };
        }
        Signal {
            strategy_name: self.name(),
            side: Side::Short,
            strength,
            confidence: (ind.adx.adx / 50.0).clamp(0.0, 1.0),
            reason: "strong trend with -DI dominant".to_string(),
            indicators: *ind,
        }
    }
}
