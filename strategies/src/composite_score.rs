//! Weighted blend of several indicator-derived scores into one directional vote, active across
//! every regime (spec §4.3 allow-list) as a fallback when single-indicator strategies disagree.
use gateway_core::types::Candle;
use strategy::prelude::{IndicatorSnapshot, Side, Signal, Strategy};

const WEIGHT_TREND: f64 = 0.3;
const WEIGHT_MOMENTUM: f64 = 0.3;
const WEIGHT_OSCILLATOR: f64 = 0.2;
const WEIGHT_VOLUME: f64 = 0.2;

pub struct CompositeScore;

impl Strategy for CompositeScore {
    fn name(&self) -> &'static str { "composite_score" }

    fn evaluate(&self, candles: &[Candle], ind: &IndicatorSnapshot) -> Signal {
        if candles.len() < 30 {
            return Signal::hold(self.name(), "insufficient history", *ind);
        }

        let trend_score = ((ind.ema_fast - ind.ema_slow) / ind.ema_slow.max(1e-9)).clamp(-0.02, 0.02) / 0.02;
        let momentum_score = (ind.macd.histogram / ind.atr.max(1e-9)).clamp(-2.0, 2.0) / 2.0;
        let oscillator_score = ((ind.rsi - 50.0) / 50.0).clamp(-1.0, 1.0);
        let volume_score = if ind.volume_ratio.is_nan() { 0.0 } else { ((ind.volume_ratio - 1.0) / 2.0).clamp(-1.0, 1.0) };

        let composite = WEIGHT_TREND * trend_score
            + WEIGHT_MOMENTUM * momentum_score
            + WEIGHT_OSCILLATOR * oscillator_score
            + WEIGHT_VOLUME * volume_score;

        let strength = composite.abs().clamp(0.0, 1.0);
        if strength < 0.3 {
            return Signal::hold(self.name(), "composite score too weak", *ind);
        }

        let side = if composite > 0.0 { Side::Long } else { Side::Short };
        Signal {
            strategy_name: self.name(),
            side,
            strength,
            confidence: strength,
            reason: format!("composite score {composite:.2}"),
            indicators: *ind,
        }
    }
}
