//! Stateful per-symbol indicator bank. Every closed candle is fed through once; the resulting
//! [`IndicatorSnapshot`] is shared by the whole strategy ensemble for that tick (spec §4.2), which
//! is why this lives in the bot crate rather than being recomputed per-strategy.
use gateway::types::Candle;
use stats::indicators::{Adx, Atr, Bollinger, ExponentialMovingAverage, Kdj, Macd, Rsi, VolumeRatio};
use stats::Next;
use strategy::prelude::{IndicatorSnapshot, StrategySettings};

pub struct IndicatorEngine {
    ema_fast: ExponentialMovingAverage,
    ema_mid: ExponentialMovingAverage,
    ema_slow: ExponentialMovingAverage,
    macd: Macd,
    rsi: Rsi,
    bollinger: Bollinger,
    atr: Atr,
    adx: Adx,
    kdj: Kdj,
    volume_ratio: VolumeRatio,
}

impl IndicatorEngine {
    pub fn new(settings: &StrategySettings) -> anyhow::Result<Self> {
        Ok(Self {
            ema_fast: ExponentialMovingAverage::new(2.0, settings.ema_fast_period as u32)?,
            ema_mid: ExponentialMovingAverage::new(2.0, settings.ema_mid_period as u32)?,
            ema_slow: ExponentialMovingAverage::new(2.0, settings.ema_slow_period as u32)?,
            macd: Macd::new(settings.macd_fast, settings.macd_slow, settings.macd_signal)?,
            rsi: Rsi::new(settings.rsi_period)?,
            bollinger: Bollinger::new(settings.bollinger_period, settings.bollinger_k)?,
            atr: Atr::new(settings.atr_period)?,
            adx: Adx::new(settings.adx_period)?,
            kdj: Kdj::new(settings.kdj_period)?,
            volume_ratio: VolumeRatio::new(settings.volume_ratio_period)?,
        })
    }

    /// Feeds one closed candle through every wrapped indicator and returns the aligned snapshot.
    /// Callers must only pass candles with `is_final == true` (spec §4.2: indicators never see a
    /// partially-formed bar).
    pub fn update(&mut self, candle: &Candle) -> IndicatorSnapshot {
        let atr = self.atr.next(candle.high, candle.low, candle.close);
        IndicatorSnapshot {
            close: candle.close,
            ema_fast: self.ema_fast.next(candle.close),
            ema_mid: self.ema_mid.next(candle.close),
            ema_slow: self.ema_slow.next(candle.close),
            macd: self.macd.next(candle.close),
            rsi: self.rsi.next(candle.close),
            bollinger: self.bollinger.next(candle.close),
            atr,
            atr_pct: if candle.close != 0.0 { atr / candle.close } else { 0.0 },
            adx: self.adx.next(candle.high, candle.low, candle.close),
            kdj: self.kdj.next(candle.high, candle.low, candle.close),
            volume_ratio: self.volume_ratio.next(candle.volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(close: f64) -> Candle { Candle { open_ts: 0, open: close, high: close + 1.0, low: close - 1.0, close, volume: 100.0, is_final: true } }

    #[test]
    fn warms_up_without_panicking_over_sixty_ticks() {
        let mut engine = IndicatorEngine::new(&StrategySettings::default()).unwrap();
        let mut price = 100.0;
        for i in 0..60 {
            price += if i % 2 == 0 { 0.5 } else { -0.2 };
            let snapshot = engine.update(&candle(price));
            assert!(snapshot.close > 0.0);
        }
    }

    #[test]
    fn atr_pct_tracks_atr_relative_to_price() {
        let mut engine = IndicatorEngine::new(&StrategySettings::default()).unwrap();
        let mut last = engine.update(&candle(100.0));
        for i in 1..20 {
            last = engine.update(&candle(100.0 + i as f64));
        }
        assert!((last.atr_pct - last.atr / last.close).abs() < 1e-9);
    }
}
