//! Trend filter (spec §4.4 gate 3): an explicit rule list rejecting opens that fight a strong
//! directional market, keyed on ADX, RSI, MACD magnitude and Bollinger %b.
use strategy::prelude::{IndicatorSnapshot, Side};

const STRONG_TREND_ADX: f64 = 25.0;
const OVERSOLD_RSI: f64 = 20.0;
const OVERBOUGHT_RSI: f64 = 80.0;

#[must_use]
pub fn evaluate(side: Side, indicators: &IndicatorSnapshot) -> Result<(), &'static str> {
    match side {
        Side::Long => {
            if indicators.adx.adx > STRONG_TREND_ADX && indicators.ema_fast < indicators.ema_slow && indicators.macd.histogram < 0.0 {
                return Err("counter-trend: adx-confirmed downtrend");
            }
            if indicators.rsi < OVERSOLD_RSI {
                return Err("rsi oversold extreme");
            }
            if indicators.adx.adx > STRONG_TREND_ADX && indicators.bollinger.percent_b > 1.0 {
                return Err("chasing price beyond upper band in a strong trend");
            }
            Ok(())
        }
        Side::Short => {
            if indicators.adx.adx > STRONG_TREND_ADX && indicators.ema_fast > indicators.ema_slow && indicators.macd.histogram > 0.0 {
                return Err("counter-trend: adx-confirmed uptrend");
            }
            if indicators.rsi > OVERBOUGHT_RSI {
                return Err("rsi overbought extreme");
            }
            if indicators.adx.adx > STRONG_TREND_ADX && indicators.bollinger.percent_b < 0.0 {
                return Err("chasing price beyond lower band in a strong trend");
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use stats::indicators::{AdxOutput, BollingerOutput, KdjOutput, MacdOutput};

    use super::*;

    fn indicators(adx: f64, ema_fast: f64, ema_slow: f64, macd_histogram: f64, rsi: f64, percent_b: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 100.0,
            ema_fast,
            ema_mid: (ema_fast + ema_slow) / 2.0,
            ema_slow,
            macd: MacdOutput { macd: 0.0, signal: 0.0, histogram: macd_histogram },
            rsi,
            bollinger: BollingerOutput { upper: 0.0, middle: 0.0, lower: 0.0, bandwidth_pct: 0.0, percent_b },
            atr: 1.0,
            atr_pct: 0.01,
            adx: AdxOutput { adx, plus_di: 0.0, minus_di: 0.0 },
            kdj: KdjOutput { k: 50.0, d: 50.0, j: 50.0 },
            volume_ratio: 1.0,
        }
    }

    #[test]
    fn long_rejected_in_adx_confirmed_downtrend() {
        let ind = indicators(30.0, 10.0, 12.0, -0.5, 50.0, 0.5);
        assert_eq!(evaluate(Side::Long, &ind), Err("counter-trend: adx-confirmed downtrend"));
    }

    #[test]
    fn long_rejected_on_extreme_oversold_rsi() {
        let ind = indicators(10.0, 12.0, 10.0, 0.1, 15.0, 0.5);
        assert_eq!(evaluate(Side::Long, &ind), Err("rsi oversold extreme"));
    }

    #[test]
    fn long_passes_in_a_healthy_uptrend() {
        let ind = indicators(28.0, 12.0, 10.0, 0.3, 55.0, 0.6);
        assert!(evaluate(Side::Long, &ind).is_ok());
    }

    #[test]
    fn short_rejected_in_adx_confirmed_uptrend() {
        let ind = indicators(30.0, 12.0, 10.0, 0.5, 50.0, 0.5);
        assert_eq!(evaluate(Side::Short, &ind), Err("counter-trend: adx-confirmed uptrend"));
    }
}
