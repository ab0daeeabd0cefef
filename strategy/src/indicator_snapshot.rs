//! All indicator values aligned to the latest closed candle in a window, computed once per tick
//! and shared by every strategy in the ensemble.
use stats::indicators::{AdxOutput, BollingerOutput, KdjOutput, MacdOutput};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub ema_fast: f64,
    pub ema_mid: f64,
    pub ema_slow: f64,
    pub macd: MacdOutput,
    pub rsi: f64,
    pub bollinger: BollingerOutput,
    pub atr: f64,
    pub atr_pct: f64,
    pub adx: AdxOutput,
    pub kdj: KdjOutput,
    pub volume_ratio: f64,
}

impl IndicatorSnapshot {
    #[must_use]
    pub fn market_regime_code(&self, regime: crate::regime::Regime) -> f64 {
        match regime {
            crate::regime::Regime::Ranging => 0.0,
            crate::regime::Regime::Trending => 1.0,
            crate::regime::Regime::Transitioning => 0.5,
        }
    }

    /// The fixed 10-element feature vector the optional ML quality filter scores (spec §4.4).
    #[must_use]
    pub fn ml_features(&self, signal_strength: f64, agreement: f64, price_change_10: f64, volatility_10: f64, regime: crate::regime::Regime) -> [f64; 10] {
        [
            signal_strength,
            agreement,
            self.rsi,
            self.adx.adx,
            self.atr_pct,
            self.bollinger.percent_b,
            self.volume_ratio,
            price_change_10,
            volatility_10,
            self.market_regime_code(regime),
        ]
    }
}
