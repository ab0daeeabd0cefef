use std::collections::HashMap;

use crate::signal::{AggregatedSignal, Side, Signal};

/// Separate, asymmetric acceptance thresholds for Long vs Short (spec §4.2): Long is strictly
/// stricter to correct a historical long-side underperformance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnsembleThresholds {
    pub long_min_agreement: f64,
    pub long_min_strength: f64,
    pub long_min_confidence: f64,
    pub short_min_agreement: f64,
    pub short_min_strength: f64,
    pub short_min_confidence: f64,
}

impl Default for EnsembleThresholds {
    fn default() -> Self {
        Self {
            long_min_agreement: 0.75,
            long_min_strength: 0.80,
            long_min_confidence: 0.6,
            short_min_agreement: 0.60,
            short_min_strength: 0.65,
            short_min_confidence: 0.5,
        }
    }
}

impl EnsembleThresholds {
    #[must_use]
    fn for_side(&self, side: Side) -> (f64, f64, f64) {
        match side {
            Side::Long => (self.long_min_agreement, self.long_min_strength, self.long_min_confidence),
            _ => (self.short_min_agreement, self.short_min_strength, self.short_min_confidence),
        }
    }
}

/// Runs the ensemble aggregation algorithm of spec §4.2 over one tick's worth of per-strategy
/// signals: majority vote, agreement fraction, weighted-mean strength of the winning side, then
/// gate against [`EnsembleThresholds`].
#[must_use]
pub fn aggregate(signals: &[Signal], thresholds: &EnsembleThresholds) -> AggregatedSignal {
    let active: Vec<&Signal> = signals.iter().filter(|s| !s.side.is_hold()).collect();
    if active.is_empty() {
        return AggregatedSignal::hold();
    }

    let mut votes: HashMap<Side, usize> = HashMap::new();
    for s in &active {
        *votes.entry(s.side).or_insert(0) += 1;
    }

    let max_votes = *votes.values().max().expect("active is non-empty");
    // A tie for the top vote count collapses to Hold (spec §4.2 step 1).
    let leaders: Vec<Side> = votes.iter().filter(|(_, c)| **c == max_votes).map(|(s, _)| *s).collect();
    if leaders.len() != 1 {
        return AggregatedSignal::hold();
    }
    let winning_side = leaders[0];
    let winning_votes = max_votes;

    let winners: Vec<&&Signal> = active.iter().filter(|s| s.side == winning_side).collect();
    let agreement = winning_votes as f64 / active.len() as f64;
    let total_strength: f64 = winners.iter().map(|s| s.strength).sum();
    let strength = total_strength / winners.len() as f64;
    let total_confidence: f64 = winners.iter().map(|s| s.confidence).sum();
    let confidence = total_confidence / winners.len() as f64;
    let contributing_strategies = winners.iter().map(|s| s.strategy_name).collect();

    let (min_agreement, min_strength, min_confidence) = thresholds.for_side(winning_side);
    if agreement < min_agreement || strength < min_strength || confidence < min_confidence {
        return AggregatedSignal::hold();
    }

    AggregatedSignal {
        side: winning_side,
        strength,
        confidence,
        agreement,
        contributing_strategies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator_snapshot::IndicatorSnapshot;
    use stats::indicators::{AdxOutput, BollingerOutput, KdjOutput, MacdOutput};

    fn snap() -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 100.0,
            ema_fast: 100.0,
            ema_mid: 100.0,
            ema_slow: 100.0,
            macd: MacdOutput { macd: 0.0, signal: 0.0, histogram: 0.0 },
            rsi: 50.0,
            bollinger: BollingerOutput { upper: 101.0, middle: 100.0, lower: 99.0, bandwidth_pct: 0.02, percent_b: 0.5 },
            atr: 1.0,
            atr_pct: 0.01,
            adx: AdxOutput { adx: 20.0, plus_di: 20.0, minus_di: 15.0 },
            kdj: KdjOutput { k: 50.0, d: 50.0, j: 50.0 },
            volume_ratio: 1.0,
        }
    }

    fn sig(name: &'static str, side: Side, strength: f64, confidence: f64) -> Signal {
        Signal { strategy_name: name, side, strength, confidence, reason: String::new(), indicators: snap() }
    }

    #[test]
    fn zero_active_strategies_yields_hold_with_no_division_by_zero() {
        let out = aggregate(&[sig("a", Side::Hold, 0.0, 0.0)], &EnsembleThresholds::default());
        assert_eq!(out.side, Side::Hold);
    }

    #[test]
    fn tie_collapses_to_hold() {
        let signals = vec![sig("a", Side::Long, 0.9, 0.9), sig("b", Side::Short, 0.9, 0.9)];
        let out = aggregate(&signals, &EnsembleThresholds::default());
        assert_eq!(out.side, Side::Hold);
    }

    #[test]
    fn majority_long_passes_when_thresholds_met() {
        let signals = vec![
            sig("a", Side::Long, 0.9, 0.9),
            sig("b", Side::Long, 0.85, 0.8),
            sig("c", Side::Short, 0.9, 0.9),
        ];
        let out = aggregate(&signals, &EnsembleThresholds::default());
        assert_eq!(out.side, Side::Long);
        assert!((out.agreement - (2.0 / 3.0)).abs() < 1e-9);
        assert_eq!(out.contributing_strategies.len(), 2);
    }

    #[test]
    fn long_rejected_below_stricter_threshold_even_though_short_would_pass() {
        let signals = vec![sig("a", Side::Long, 0.5, 0.9), sig("b", Side::Long, 0.5, 0.9)];
        let out = aggregate(&signals, &EnsembleThresholds::default());
        assert_eq!(out.side, Side::Hold);
    }
}
