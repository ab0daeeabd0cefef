use crate::ensemble::EnsembleThresholds;
use crate::regime::RegimeThresholds;

/// Per-strategy indicator period overrides, validated once at startup (§9 design note).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySettings {
    pub ema_fast_period: usize,
    pub ema_mid_period: usize,
    pub ema_slow_period: usize,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_k: f64,
    pub atr_period: usize,
    pub adx_period: usize,
    pub kdj_period: usize,
    pub volume_ratio_period: usize,
    pub ensemble: EnsembleThresholds,
    pub regime: RegimeThresholds,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            ema_fast_period: 9,
            ema_mid_period: 21,
            ema_slow_period: 55,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_k: 2.0,
            atr_period: 14,
            adx_period: 14,
            kdj_period: 9,
            volume_ratio_period: 20,
            ensemble: EnsembleThresholds::default(),
            regime: RegimeThresholds::default(),
        }
    }
}

impl StrategySettings {
    /// Validation failures here are fatal at startup, per the "config as many loose constants"
    /// redesign note (§9).
    pub fn validate(&self) -> Result<(), String> {
        if self.ema_fast_period >= self.ema_mid_period || self.ema_mid_period >= self.ema_slow_period {
            return Err("ema periods must satisfy fast < mid < slow".to_string());
        }
        if self.macd_fast >= self.macd_slow {
            return Err("macd_fast must be < macd_slow".to_string());
        }
        Ok(())
    }
}
