//! Rolling candle window plus the bridge into [`crate::indicators::IndicatorEngine`]: strategies
//! need a lookback window, the indicator bank only ever needs the newest closed bar.
use std::collections::VecDeque;

use gateway::types::Candle;
use strategy::prelude::IndicatorSnapshot;

use crate::indicators::IndicatorEngine;

const WINDOW_CAPACITY: usize = 200;

pub struct MarketState {
    window: VecDeque<Candle>,
    last_indicator_ts: Option<i64>,
}

impl MarketState {
    #[must_use]
    pub fn new() -> Self { Self { window: VecDeque::with_capacity(WINDOW_CAPACITY), last_indicator_ts: None } }

    /// Merges freshly-fetched candles into the window (replacing the still-open bar in place) and
    /// feeds every newly-closed bar through `engine`, returning the latest snapshot if any bar
    /// closed this call.
    pub fn ingest(&mut self, candles: Vec<Candle>, engine: &mut IndicatorEngine) -> Option<IndicatorSnapshot> {
        let mut snapshot = None;
        for candle in candles {
            match self.window.back_mut() {
                Some(last) if last.open_ts == candle.open_ts => *last = candle,
                _ => {
                    if self.window.len() == WINDOW_CAPACITY {
                        self.window.pop_front();
                    }
                    self.window.push_back(candle);
                }
            }
            if candle.is_final && self.last_indicator_ts != Some(candle.open_ts) {
                snapshot = Some(engine.update(&candle));
                self.last_indicator_ts = Some(candle.open_ts);
            }
        }
        snapshot
    }

    #[must_use]
    pub fn candles(&self) -> Vec<Candle> { self.window.iter().copied().collect() }

    #[must_use]
    pub fn is_warmed_up(&self, min_candles: usize) -> bool { self.window.len() >= min_candles }
}

impl Default for MarketState {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use strategy::prelude::StrategySettings;

    use super::*;

    fn candle(ts: i64, close: f64, is_final: bool) -> Candle { Candle { open_ts: ts, open: close, high: close + 1.0, low: close - 1.0, close, volume: 10.0, is_final } }

    #[test]
    fn partial_bar_is_replaced_in_place_not_appended() {
        let mut engine = IndicatorEngine::new(&StrategySettings::default()).unwrap();
        let mut state = MarketState::new();
        state.ingest(vec![candle(1, 100.0, false)], &mut engine);
        state.ingest(vec![candle(1, 100.5, true)], &mut engine);
        assert_eq!(state.candles().len(), 1);
    }

    #[test]
    fn closed_bar_only_updates_indicators_once() {
        let mut engine = IndicatorEngine::new(&StrategySettings::default()).unwrap();
        let mut state = MarketState::new();
        let snap1 = state.ingest(vec![candle(1, 100.0, true)], &mut engine);
        let snap2 = state.ingest(vec![candle(1, 100.0, true)], &mut engine);
        assert!(snap1.is_some());
        assert!(snap2.is_none());
    }
}
