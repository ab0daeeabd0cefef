//! Market-regime classification from ADX and Bollinger bandwidth (spec §4.3). Precedence order
//! matters: the strong-trend override must be checked before the standard trending rule, or a
//! high-ADX/moderate-bandwidth market misclassifies as ranging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Ranging,
    Trending,
    Transitioning,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegimeThresholds {
    pub trend_exit_adx: f64,
    pub trend_exit_bb: f64,
    pub strong_trend_adx: f64,
    pub strong_trend_bb: f64,
    pub standard_trend_adx: f64,
    pub standard_trend_bb: f64,
    pub ranging_adx: f64,
    pub ranging_bb: f64,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            trend_exit_adx: 27.0,
            trend_exit_bb: 0.025,
            strong_trend_adx: 35.0,
            strong_trend_bb: 0.020,
            standard_trend_adx: 30.0,
            standard_trend_bb: 0.030,
            ranging_adx: 20.0,
            ranging_bb: 0.020,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegimeOutput {
    pub regime: Regime,
    pub confidence: f64,
}

/// `bandwidth_pct` is the raw fraction (`(upper-lower)/middle`), not a percentage.
#[must_use]
pub fn classify(adx: f64, bandwidth_pct: f64, previous: Option<Regime>, t: &RegimeThresholds) -> RegimeOutput {
    let regime = if previous == Some(Regime::Trending) && adx >= t.trend_exit_adx && bandwidth_pct >= t.trend_exit_bb {
        Regime::Trending
    } else if adx >= t.strong_trend_adx && bandwidth_pct > t.strong_trend_bb {
        Regime::Trending
    } else if adx >= t.standard_trend_adx && bandwidth_pct > t.standard_trend_bb {
        Regime::Trending
    } else if adx < t.ranging_adx && bandwidth_pct < t.ranging_bb {
        Regime::Ranging
    } else {
        Regime::Transitioning
    };

    let score_adx = ((adx - t.ranging_adx) / (t.strong_trend_adx - t.ranging_adx)).clamp(0.0, 1.0);
    let score_bb = ((bandwidth_pct - t.ranging_bb) / (t.strong_trend_bb - t.ranging_bb)).clamp(0.0, 1.0);
    let confidence = 0.7 * score_adx + 0.3 * score_bb;

    RegimeOutput { regime, confidence }
}

/// Allow-list of strategy names active in each regime (spec §4.3).
#[must_use]
pub fn allowed_strategies(regime: Regime) -> &'static [&'static str] {
    match regime {
        Regime::Trending => &["macd_cross", "ema_cross", "adx_trend", "volume_breakout", "multi_timeframe", "composite_score"],
        Regime::Ranging => &["bollinger_trend", "bollinger_breakthrough", "kdj_cross", "rsi_divergence", "composite_score"],
        Regime::Transitioning => &["composite_score", "multi_timeframe"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tight_range_classifies_ranging() {
        let out = classify(19.9, 0.019, None, &RegimeThresholds::default());
        assert_eq!(out.regime, Regime::Ranging);
    }

    #[test]
    fn strong_trend_override_beats_ranging_looking_bandwidth() {
        // The scenario from spec §8: adx=36.8, bandwidth=2.41% previously misclassified as ranging.
        let out = classify(36.8, 0.0241, None, &RegimeThresholds::default());
        assert_eq!(out.regime, Regime::Trending);
    }

    #[test]
    fn boundary_strong_trend_override() {
        let out = classify(35.1, 0.021, None, &RegimeThresholds::default());
        assert_eq!(out.regime, Regime::Trending);
    }

    #[test]
    fn hysteresis_keeps_trending_state_above_exit_thresholds() {
        let out = classify(27.5, 0.026, Some(Regime::Trending), &RegimeThresholds::default());
        assert_eq!(out.regime, Regime::Trending);
    }

    #[test]
    fn otherwise_transitioning() {
        let out = classify(25.0, 0.025, None, &RegimeThresholds::default());
        assert_eq!(out.regime, Regime::Transitioning);
    }
}
