//! Recomputes full NaN-padded indicator series over a candle window. Strategies that need more
//! than the latest snapshot (crossovers, divergence) pull one of these rather than carrying their
//! own streaming state — the indicators spec permits recomputation (§9 design note).
use gateway_core::types::Candle;
use stats::indicators::{Atr, Bollinger, BollingerOutput, ExponentialMovingAverage, Kdj, KdjOutput, Macd, MacdOutput, Rsi};
use stats::Next;

pub fn ema_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let mut ema = ExponentialMovingAverage::new(2.0, period as u32).expect("validated at startup");
    candles.iter().map(|c| ema.next(c.close)).collect()
}

pub fn macd_series(candles: &[Candle], fast: u32, slow: u32, signal: u32) -> Vec<MacdOutput> {
    let mut macd = Macd::new(fast, slow, signal).expect("validated at startup");
    candles.iter().map(|c| macd.next(c.close)).collect()
}

pub fn rsi_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let mut rsi = Rsi::new(period).expect("validated at startup");
    candles.iter().map(|c| rsi.next(c.close)).collect()
}

pub fn bollinger_series(candles: &[Candle], period: usize, k: f64) -> Vec<BollingerOutput> {
    let mut bb = Bollinger::new(period, k).expect("validated at startup");
    candles.iter().map(|c| bb.next(c.close)).collect()
}

pub fn atr_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let mut atr = Atr::new(period).expect("validated at startup");
    candles.iter().map(|c| atr.next(c.high, c.low, c.close)).collect()
}

pub fn kdj_series(candles: &[Candle], period: usize) -> Vec<KdjOutput> {
    let mut kdj = Kdj::new(period).expect("validated at startup");
    candles.iter().map(|c| kdj.next(c.high, c.low, c.close)).collect()
}

/// Last `n` candles counted as bullish (`close > open`), used by the uptrend-confirmation check.
#[must_use]
pub fn bullish_count(candles: &[Candle], n: usize) -> usize {
    candles.iter().rev().take(n).filter(|c| c.is_bullish()).count()
}
