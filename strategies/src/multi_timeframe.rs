//! Resamples the candle window into a coarser timeframe (`resample_factor` native bars per
//! synthetic bar) and requires its EMA trend to agree with the native-timeframe trend before
//! voting, filtering out native-timeframe noise.
use gateway_core::types::Candle;
use strategy::prelude::{IndicatorSnapshot, Side, Signal, Strategy};

use crate::series::ema_series;

pub struct MultiTimeframe {
    pub resample_factor: usize,
}

impl Default for MultiTimeframe {
    fn default() -> Self { Self { resample_factor: 4 } }
}

fn resample(candles: &[Candle], factor: usize) -> Vec<Candle> {
    candles
        .chunks(factor)
        .map(|chunk| Candle {
            open_ts: chunk[0].open_ts,
            open: chunk[0].open,
            high: chunk.iter().map(|c| c.high).fold(f64::MIN, f64::max),
            low: chunk.iter().map(|c| c.low).fold(f64::MAX, f64::min),
            close: chunk.last().expect("chunk is non-empty").close,
            volume: chunk.iter().map(|c| c.volume).sum(),
            is_final: chunk.last().expect("chunk is non-empty").is_final,
        })
        .collect()
}

impl Strategy for MultiTimeframe {
    fn name(&self) -> &'static str { "multi_timeframe" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        let higher = resample(candles, self.resample_factor);
        if higher.len() < 22 || candles.len() < 22 {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }

        let higher_fast = ema_series(&higher, 9);
        let higher_slow = ema_series(&higher, 21);
        let higher_uptrend = *higher_fast.last().expect("non-empty") > *higher_slow.last().expect("non-empty");
        let higher_downtrend = *higher_fast.last().expect("non-empty") < *higher_slow.last().expect("non-empty");

        let native_uptrend = ind.ema_fast > ind.ema_mid;
        let native_downtrend = ind.ema_fast < ind.ema_mid;

        if higher_uptrend && native_uptrend {
            return Signal {
                strategy_name: self.name(),
                side: Side::Long,
                strength: 0.6,
                confidence: 0.6,
                reason: "higher and native timeframe trends agree upward".to_string(),
                indicators: *ind,
            };
        }
        if higher_downtrend && native_downtrend {
            return Signal {
                strategy_name: self.name(),
                side: Side::Short,
                strength: 0.6,
                confidence: 0.6,
                reason: "higher and native timeframe trends agree downward".to_string(),
                indicators: *ind,
            };
        }
        Signal::hold(self.name(), "timeframes disagree", *ind)
    }
}
