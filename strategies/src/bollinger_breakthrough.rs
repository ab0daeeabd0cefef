//! Mean-revert counterpart to [`crate::bollinger_trend`]: a close outside the bands absent a
//! confirmed EMA trend is read as overextension due for a reversion.
use gateway_core::types::Candle;
use strategy::prelude::{IndicatorSnapshot, Side, Signal, Strategy};

pub struct BollingerBreakthrough;

impl Strategy for BollingerBreakthrough {
    fn name(&self) -> &'static str { "bollinger_breakthrough" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        if candles.len() < 20 {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }
        let trending = (ind.ema_fast - ind.ema_mid).abs() / ind.ema_mid.max(1e-9) > 0.002;

        if ind.close < ind.bollinger.lower && !trending {
            let strength = (1.0 - ind.bollinger.percent_b).clamp(0.0, 1.0).max(0.5);
            return Signal {
                strategy_name: self.name(),
                side: Side::Long,
                strength,
                confidence: 0.55,
                reason: "oversold below lower band, no confirmed trend".to_string(),
                indicators: *ind,
            };
        }
        if ind.close > ind.bollinger.upper && !trending {
            let strength = ind.bollinger.percent_b.clamp(0.0, 1.0).max(0.5);
            return Signal {
                strategy_name: self.name(),
                side: Side::Short,
                strength,
                confidence: 0.55,
                reason: "overbought above upper band, no confirmed trend".to_string(),
                indicators: *ind,
            };
        }
        Signal::hold(self.name(), "inside bands or trending", *ind)
    }
}
