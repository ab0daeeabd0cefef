use crate::indicator_snapshot::IndicatorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Long,
    Short,
    CloseLong,
    CloseShort,
    Hold,
}

impl Side {
    #[must_use]
    pub fn is_hold(&self) -> bool { matches!(self, Self::Hold) }

    #[must_use]
    pub fn is_entry(&self) -> bool { matches!(self, Self::Long | Self::Short) }
}

/// A pure value: one strategy's opinion for the current tick. Strategies never mutate the
/// candles or indicators they're handed and never carry side effects of their own.
///
/// Not `Deserialize`: `strategy_name`/`contributing_strategies` below hold `&'static str`,
/// which only ever comes from a literal inside this workspace, never from parsed input.
#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub strategy_name: &'static str,
    pub side: Side,
    pub strength: f64,
    pub confidence: f64,
    pub reason: String,
    pub indicators: IndicatorSnapshot,
}

impl Signal {
    #[must_use]
    pub fn hold(strategy_name: &'static str, reason: impl Into<String>, indicators: IndicatorSnapshot) -> Self {
        Self {
            strategy_name,
            side: Side::Hold,
            strength: 0.0,
            confidence: 0.0,
            reason: reason.into(),
            indicators,
        }
    }
}

/// The ensemble's consensus for one tick (spec §3/§4.2).
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedSignal {
    pub side: Side,
    pub strength: f64,
    pub confidence: f64,
    /// Fraction of active strategies that voted for `side`.
    pub agreement: f64,
    pub contributing_strategies: Vec<&'static str>,
}

impl AggregatedSignal {
    #[must_use]
    pub fn hold() -> Self {
        Self {
            side: Side::Hold,
            strength: 0.0,
            confidence: 0.0,
            agreement: 0.0,
            contributing_strategies: Vec::new(),
        }
    }
}
