//! Optional ML quality scorer (spec §4.4 gate 5): `score(features) -> [0,1]`, loaded lazily and
//! unloadable after idle. The fixed 10-element feature vector is assembled by the caller
//! (`strategy::IndicatorSnapshot::ml_features`).
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
pub enum MlMode {
    Off,
    Shadow,
    Filter,
}

pub trait QualityScorer: Send + Sync {
    /// Always in `[0, 1]`; higher means more confident the signal is worth acting on.
    fn score(&self, features: &[f64; 10]) -> Result<f64>;

    /// Called by the host when the scorer has been idle; implementations may drop cached model
    /// weights here. Default is a no-op for scorers with nothing to release.
    fn unload_if_idle(&self) {}
}

#[derive(Debug, Clone, Copy)]
pub struct MlFilterOutcome {
    pub score: f64,
    pub passed: bool,
}

/// Applies `mode` to a raw score: `Off` always passes without scoring, `Shadow` scores but never
/// rejects, `Filter` rejects below `threshold`.
#[must_use]
pub fn apply(mode: MlMode, scorer: &dyn QualityScorer, features: &[f64; 10], threshold: f64) -> Option<MlFilterOutcome> {
    if mode == MlMode::Off {
        return None;
    }
    let score = scorer.score(features).ok()?;
    let passed = mode == MlMode::Shadow || score >= threshold;
    Some(MlFilterOutcome { score, passed })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScorer(f64);
    impl QualityScorer for FixedScorer {
        fn score(&self, _features: &[f64; 10]) -> Result<f64> { Ok(self.0) }
    }

    #[test]
    fn off_mode_skips_scoring_entirely() {
        let scorer = FixedScorer(0.1);
        assert!(apply(MlMode::Off, &scorer, &[0.0; 10], 0.5).is_none());
    }

    #[test]
    fn shadow_mode_always_passes() {
        let scorer = FixedScorer(0.1);
        let out = apply(MlMode::Shadow, &scorer, &[0.0; 10], 0.9).unwrap();
        assert!(out.passed);
    }

    #[test]
    fn filter_mode_rejects_below_threshold() {
        let scorer = FixedScorer(0.3);
        let out = apply(MlMode::Filter, &scorer, &[0.0; 10], 0.5).unwrap();
        assert!(!out.passed);
    }
}
