use gateway_core::types::Candle;

use crate::indicator_snapshot::IndicatorSnapshot;
use crate::signal::Signal;

/// Capability every ensemble member implements: a stateless value function over a candle window
/// and its indicator snapshot. Modelled as a trait object rather than an inheritance hierarchy —
/// each strategy is a data-plus-function unit (§9).
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `candles` is oldest-first, ending at the latest closed (or partial) bar. Implementations
    /// MUST return `Hold` when the window is shorter than their required lookback, and must never
    /// mutate either argument.
    fn evaluate(&self, candles: &[Candle], indicators: &IndicatorSnapshot) -> Signal;
}
