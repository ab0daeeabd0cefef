//! `TradeTag`: the append-only decision-chain record emitted for every signal attempt, executed
//! or rejected (spec §3). The core only emits it; persistence is the host application's concern.
use chrono::{DateTime, Utc};
use gateway_core::types::Symbol;
use strategy::prelude::{AggregatedSignal, IndicatorSnapshot, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum GateName {
    CircuitBreaker,
    Direction,
    Trend,
    ExecutionQuality,
    MlQuality,
    LlmPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateRecord {
    pub gate: GateName,
    pub passed: bool,
    pub reason: Option<String>,
}

impl GateRecord {
    #[must_use]
    pub fn pass(gate: GateName) -> Self { Self { gate, passed: true, reason: None } }

    #[must_use]
    pub fn fail(gate: GateName, reason: impl Into<String>) -> Self { Self { gate, passed: false, reason: Some(reason.into()) } }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeTag {
    pub ts: DateTime<Utc>,
    pub symbol: Symbol,
    pub indicators: IndicatorSnapshot,
    pub signal: AggregatedSignal,
    pub gates: Vec<GateRecord>,
    pub final_action: Side,
    pub fill_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub pnl: Option<f64>,
    pub hold_time_secs: Option<i64>,
}

impl TradeTag {
    #[must_use]
    pub fn new(ts: DateTime<Utc>, symbol: impl Into<Symbol>, indicators: IndicatorSnapshot, signal: AggregatedSignal) -> Self {
        Self {
            ts,
            symbol: symbol.into(),
            indicators,
            signal,
            gates: Vec::new(),
            final_action: Side::Hold,
            fill_price: None,
            exit_price: None,
            pnl: None,
            hold_time_secs: None,
        }
    }

    /// True once every recorded gate passed; an empty gate list (e.g. the aggregated signal was
    /// already `Hold`) counts as rejected, never as a vacuous pass.
    #[must_use]
    pub fn all_gates_passed(&self) -> bool { !self.gates.is_empty() && self.gates.iter().all(|g| g.passed) }

    /// The reason of the first failing gate, matching the order-preserving, short-circuiting
    /// invariant in spec §8.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> { self.gates.iter().find(|g| !g.passed).and_then(|g| g.reason.as_deref()) }
}
