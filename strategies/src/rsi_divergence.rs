//! Bullish divergence: price prints a lower low while RSI prints a higher low (buyers losing
//! momentum to the downside); bearish divergence is the mirror on highs.
use gateway_core::types::Candle;
use strategy::prelude::{IndicatorSnapshot, Side, Signal, Strategy};

use crate::series::rsi_series;

const LOOKBACK: usize = 14;

pub struct RsiDivergence;

impl Strategy for RsiDivergence {
    fn name(&self) -> &'static str { "rsi_divergence" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        if candles.len() < LOOKBACK + 15 {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }
        let rsi = rsi_series(candles, 14);
        let window = &candles[candles.len() - LOOKBACK..];
        let rsi_window = &rsi[rsi.len() - LOOKBACK..];
        let half = LOOKBACK / 2;

        let (first_low_idx, _) = window[..half].iter().enumerate().min_by(|a, b| a.1.low.total_cmp(&b.1.low)).unwrap();
        let (second_low_idx, _) = window[half..].iter().enumerate().min_by(|a, b| a.1.low.total_cmp(&b.1.low)).unwrap();
        let second_low_idx = half + second_low_idx;
        let price_lower_low = window[second_low_idx].low < window[first_low_idx].low;
        let rsi_higher_low = rsi_window[second_low_idx] > rsi_window[first_low_idx];

        if price_lower_low && rsi_higher_low && ind.rsi < 40.0 {
            return Signal {
                strategy_name: self.name(),
                side: Side::Long,
                strength: 0.6,
                confidence: 0.5,
                reason: "bullish RSI divergence".to_string(),
                indicators: *ind,
            };
        }

        let (first_high_idx, _) = window[..half].iter().enumerate().max_by(|a, b| a.1.high.total_cmp(&b.1.high)).unwrap();
        let (second_high_idx, _) = window[half..].iter().enumerate().max_by(|a, b| a.1.high.total_cmp(&b.1.high)).unwrap();
        let second_high_idx = half + second_high_idx;
        let price_higher_high = window[second_high_idx].high > window[first_high_idx].high;
        let rsi_lower_high = rsi_window[second_high_idx] < rsi_window[first_high_idx];

        if price_higher_high && rsi_lower_high && ind.rsi > 60.0 {
            return Signal {
                strategy_name: self.name(),
                side: Side::Short,
                strength: 0.6,
                confidence: 0.5,
                reason: "bearish RSI divergence".to_string(),
                indicators: *ind,
            };
        }

        Signal::hold(self.name(), "no divergence", *ind)
    }
}
