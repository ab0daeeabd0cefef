//! Concrete members of the strategy ensemble (spec §4.2) plus the special dual-hedge strategy
//! (§4.9), which is driven directly by the bot loop rather than through the [`strategy::Strategy`]
//! trait.
#[macro_use]
extern crate serde;
#[macro_use]
extern crate strum_macros;

pub mod adx_trend;
pub mod band_limited_hedging;
pub mod bollinger_breakthrough;
pub mod bollinger_trend;
pub mod composite_score;
pub mod ema_cross;
pub mod kdj_cross;
pub mod macd_cross;
pub mod multi_timeframe;
pub mod rsi_divergence;
mod series;
pub mod volume_breakout;

use strategy::prelude::Strategy;

/// Builds the full, regime-unfiltered ensemble; callers intersect with
/// [`strategy::prelude::allowed_strategies`] for the active regime before evaluating.
#[must_use]
pub fn all_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(bollinger_trend::BollingerTrend),
        Box::new(bollinger_breakthrough::BollingerBreakthrough),
        Box::new(macd_cross::MacdCross),
        Box::new(ema_cross::EmaCross::default()),
        Box::new(rsi_divergence::RsiDivergence),
        Box::new(kdj_cross::KdjCross),
        Box::new(adx_trend::AdxTrend),
        Box::new(volume_breakout::VolumeBreakout),
        Box::new(multi_timeframe::MultiTimeframe::default()),
        Box::new(composite_score::CompositeScore),
    ]
}
