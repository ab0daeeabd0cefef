//! Orders the six gates from spec §4.4 and enforces the order-preserving, short-circuiting
//! invariant in §8: the TradeTag's rejection reason always equals the first failing gate, and no
//! gate downstream of a rejection runs at all.
use chrono::{DateTime, Utc};
use plugins::prelude::{apply_ml_filter, LlmPolicy, MlMode, PolicyAnalyzer, PolicyContext, QualityScorer};
use strategy::prelude::{AggregatedSignal, IndicatorSnapshot, Side};

use crate::direction::{self, DirectionThresholds};
use crate::execution_quality::{self, ExecutionQualityInputs, ExecutionQualitySettings};
use crate::trade_tag::{GateName, GateRecord, TradeTag};
use crate::trend;

pub struct PipelineSettings {
    pub direction: DirectionThresholds,
    pub execution: ExecutionQualitySettings,
    pub ml_mode: MlMode,
    pub ml_quality_threshold: f64,
}

/// Everything the pipeline needs for one tick beyond the static settings above. Borrowed, not
/// owned, since a tag only needs to read these values once.
pub struct PipelineContext<'a> {
    pub candles: &'a [gateway_core::types::Candle],
    pub win_rate: f64,
    pub execution_inputs: ExecutionQualityInputs<'a>,
    pub ml_features: [f64; 10],
}

/// Runs gates 1 through 5 (circuit breaker, direction, trend, execution quality, ML) against a
/// fresh `TradeTag`. Returns the tag whether or not every gate passed; the caller decides whether
/// to still invoke the LLM policy gate via [`run_llm_gate`].
#[must_use]
pub fn run_sync_gates(
    mut tag: TradeTag,
    signal: &AggregatedSignal,
    indicators: &IndicatorSnapshot,
    breaker_tripped: bool,
    ctx: &PipelineContext<'_>,
    settings: &PipelineSettings,
    ml_scorer: Option<&dyn QualityScorer>,
) -> TradeTag {
    if signal.side.is_hold() {
        return tag;
    }

    if breaker_tripped {
        tag.gates.push(GateRecord::fail(GateName::CircuitBreaker, "circuit breaker tripped"));
        return tag;
    }
    tag.gates.push(GateRecord::pass(GateName::CircuitBreaker));

    let direction_thresholds = settings.direction.adapt_to_win_rate(ctx.win_rate);
    match direction::evaluate(signal.side, signal.strength, signal.agreement, ctx.candles, indicators, &direction_thresholds) {
        Ok(()) => tag.gates.push(GateRecord::pass(GateName::Direction)),
        Err(reason) => {
            tag.gates.push(GateRecord::fail(GateName::Direction, reason));
            return tag;
        }
    }

    match trend::evaluate(signal.side, indicators) {
        Ok(()) => tag.gates.push(GateRecord::pass(GateName::Trend)),
        Err(reason) => {
            tag.gates.push(GateRecord::fail(GateName::Trend, reason));
            return tag;
        }
    }

    match execution_quality::evaluate(&ctx.execution_inputs, &settings.execution) {
        Ok(()) => tag.gates.push(GateRecord::pass(GateName::ExecutionQuality)),
        Err(reason) => {
            tag.gates.push(GateRecord::fail(GateName::ExecutionQuality, reason));
            return tag;
        }
    }

    if settings.ml_mode != MlMode::Off {
        let Some(scorer) = ml_scorer else {
            tag.gates.push(GateRecord::fail(GateName::MlQuality, "ml mode enabled but no scorer wired"));
            return tag;
        };
        match apply_ml_filter(settings.ml_mode, scorer, &ctx.ml_features, settings.ml_quality_threshold) {
            Some(outcome) if outcome.passed => tag.gates.push(GateRecord::pass(GateName::MlQuality)),
            Some(outcome) => {
                tag.gates.push(GateRecord::fail(GateName::MlQuality, format!("ml score {:.3} below threshold {:.3}", outcome.score, settings.ml_quality_threshold)));
                return tag;
            }
            None => tag.gates.push(GateRecord::pass(GateName::MlQuality)),
        }
    }

    tag
}

/// Gate 6. Only called when every prior gate passed; a `Reject` decision is recorded the same way
/// as any other gate failure.
pub async fn run_llm_gate<A: PolicyAnalyzer>(mut tag: TradeTag, llm_policy: &mut LlmPolicy<A>, ctx: PolicyContext, now: DateTime<Utc>) -> TradeTag {
    if !tag.all_gates_passed() {
        return tag;
    }
    let decision = llm_policy.analyze(ctx, now).await;
    if decision.accept {
        tag.gates.push(GateRecord::pass(GateName::LlmPolicy));
    } else {
        tag.gates.push(GateRecord::fail(GateName::LlmPolicy, "llm policy rejected the signal"));
    }
    tag
}

#[must_use]
pub fn final_action(tag: &TradeTag, signal_side: Side) -> Side {
    if tag.all_gates_passed() {
        signal_side
    } else {
        Side::Hold
    }
}

#[cfg(test)]
mod tests {
    use gateway_core::types::{Candle, OrderBook, OrderSide, Ticker};
    use stats::indicators::{AdxOutput, BollingerOutput, KdjOutput, MacdOutput};
    use strategy::prelude::AggregatedSignal;

    use super::*;

    fn candles() -> Vec<Candle> {
        let mut v = vec![Candle { open_ts: 0, open: 99.0, high: 99.5, low: 98.5, close: 98.8, volume: 50.0, is_final: true }; 20];
        v.extend(vec![Candle { open_ts: 0, open: 99.0, high: 101.5, low: 98.9, close: 101.0, volume: 130.0, is_final: true }; 3]);
        v
    }

    fn indicators() -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 101.0,
            ema_fast: 12.0,
            ema_mid: 11.0,
            ema_slow: 10.0,
            macd: MacdOutput { macd: 0.0, signal: 0.0, histogram: 0.3 },
            rsi: 55.0,
            bollinger: BollingerOutput { upper: 110.0, middle: 100.0, lower: 90.0, bandwidth_pct: 0.2, percent_b: 0.6 },
            atr: 1.0,
            atr_pct: 0.01,
            adx: AdxOutput { adx: 20.0, plus_di: 25.0, minus_di: 10.0 },
            kdj: KdjOutput { k: 60.0, d: 55.0, j: 65.0 },
            volume_ratio: 1.3,
        }
    }

    fn signal() -> AggregatedSignal {
        AggregatedSignal { side: Side::Long, strength: 0.9, confidence: 0.9, agreement: 0.9, contributing_strategies: vec!["macd_cross"] }
    }

    #[test]
    fn breaker_trip_rejects_before_any_other_gate_runs() {
        let tag = TradeTag::new(Utc::now(), "BTCUSDT", indicators(), signal());
        let ticker = Ticker { last: 100.0, bid: 99.99, ask: 100.0, volume_24h: 0.0, ts: 0 };
        let book = OrderBook { ts: 0, bids: vec![], asks: vec![] };
        let ctx = PipelineContext {
            candles: &candles(),
            win_rate: 0.5,
            execution_inputs: ExecutionQualityInputs { ticker: &ticker, order_book: &book, order_side: OrderSide::Buy, order_size_usdt: 100.0, recent_tick_prices: &[], current_atr: 0.0, rolling_atr_mean: 0.0 },
            ml_features: [0.0; 10],
        };
        let settings = PipelineSettings { direction: DirectionThresholds::default(), execution: ExecutionQualitySettings::default(), ml_mode: MlMode::Off, ml_quality_threshold: 0.5 };
        let tag = run_sync_gates(tag, &signal(), &indicators(), true, &ctx, &settings, None);
        assert_eq!(tag.gates.len(), 1);
        assert_eq!(tag.rejection_reason(), Some("circuit breaker tripped"));
    }

    #[test]
    fn full_pass_runs_every_sync_gate_in_order() {
        let tag = TradeTag::new(Utc::now(), "BTCUSDT", indicators(), signal());
        let ticker = Ticker { last: 100.0, bid: 99.99, ask: 100.0, volume_24h: 0.0, ts: 0 };
        let book = OrderBook {
            ts: 0,
            bids: vec![gateway_core::types::OrderBookLevel { price: 100.0, qty: 500.0 }],
            asks: vec![gateway_core::types::OrderBookLevel { price: 100.0, qty: 500.0 }],
        };
        let ctx = PipelineContext {
            candles: &candles(),
            win_rate: 0.5,
            execution_inputs: ExecutionQualityInputs { ticker: &ticker, order_book: &book, order_side: OrderSide::Buy, order_size_usdt: 100.0, recent_tick_prices: &[100.0, 100.01], current_atr: 1.0, rolling_atr_mean: 1.0 },
            ml_features: [0.0; 10],
        };
        let settings = PipelineSettings { direction: DirectionThresholds::default(), execution: ExecutionQualitySettings::default(), ml_mode: MlMode::Off, ml_quality_threshold: 0.5 };
        let tag = run_sync_gates(tag, &signal(), &indicators(), false, &ctx, &settings, None);
        assert_eq!(tag.gates.len(), 4);
        assert!(tag.all_gates_passed());
    }
}
