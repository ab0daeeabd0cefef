//! Breakout-follow: a close outside the bands in the direction of the prevailing EMA trend is
//! read as trend continuation, not mean reversion (see [`crate::bollinger_breakthrough`] for the
//! opposite read).
use gateway_core::types::Candle;
use strategy::prelude::{IndicatorSnapshot, Signal, Strategy};

pub struct BollingerTrend;

impl Strategy for BollingerTrend {
    fn name(&self) -> &'static str { "bollinger_trend" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        if candles.len() < 20 {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }
        let uptrend = ind.ema_fast > ind.ema_mid;
        let downtrend = ind.ema_fast < ind.ema_mid;

        if ind.close > ind.bollinger.upper && uptrend {
            let strength = (ind.bollinger.percent_b - 1.0).clamp(0.0, 1.0).max(0.55);
            return Signal {
                strategy_name: self.name(),
                side: strategy::prelude::Side::Long,
                strength,
                confidence: 0.6,
                reason: "close above upper band with confirmed uptrend".to_string(),
                indicators: *ind,
            };
        }
        if ind.close < ind.bollinger.lower && downtrend {
            let strength = (-ind.bollinger.percent_b).clamp(0.0, 1.0).max(0.55);
            return Signal {
                strategy_name: self.name(),
                side: strategy::prelude::Side::Short,
                strength,
                confidence: 0.6,
                reason: "close below lower band with confirmed downtrend".to_string(),
                indicators: *ind,
            };
        }
        Signal::hold(self.name(), "no confirmed breakout", *ind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stats::indicators::{AdxOutput, BollingerOutput, KdjOutput, MacdOutput};

    fn snap(close: f64, upper: f64, lower: f64, ema_fast: f64, ema_mid: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close,
            ema_fast,
            ema_mid,
            ema_slow: ema_mid,
            macd: MacdOutput { macd: 0.0, signal: 0.0, histogram: 0.0 },
            rsi: 50.0,
            bollinger: BollingerOutput { upper, middle: (upper + lower) / 2.0, lower, bandwidth_pct: 0.02, percent_b: (close - lower) / (upper - lower) },
            atr: 1.0,
            atr_pct: 0.01,
            adx: AdxOutput { adx: 25.0, plus_di: 20.0, minus_di: 15.0 },
            kdj: KdjOutput { k: 50.0, d: 50.0, j: 50.0 },
            volume_ratio: 1.0,
        }
    }

    #[test]
    fn breakout_above_upper_band_in_uptrend_is_long() {
        let candles = vec![Candle { open_ts: 0, open: 100.0, high: 101.0, low: 99.0, close: 100.0, volume: 1.0, is_final: true }; 25];
        let ind = snap(105.0, 104.0, 96.0, 102.0, 100.0);
        let sig = BollingerTrend.evaluate(&candles, &ind);
        assert_eq!(sig.side, strategy::prelude::Side::Long);
    }
}
