//! The main control loop (spec §4.7): one `tick` per interval advances the state machine,
//! evaluates the strategy ensemble, runs the filter pipeline, and drives the risk manager.
//! `main.rs` owns the `tokio` scheduling; this module owns everything that happens inside a tick.
use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use filters::prelude::{final_action, run_llm_gate, run_sync_gates, PipelineContext, PipelineSettings, TradeTag};
use gateway::health::{self, OrderHealthConfig, TrackedOrder};
use gateway::maker::{self, MakerConfig as GatewayMakerConfig};
use gateway::prelude::ExchangeGateway;
use gateway::types::{OrderSide, PositionSide, Ticker};
use plugins::prelude::{LlmPolicy, PolicyAnalyzer, PolicyContext, QualityScorer};
use risk::prelude::RiskManager;
use strategies::band_limited_hedging::{BandLimitedHedging, HedgeSettings};
use strategy::prelude::{aggregate, allowed_strategies, classify, Regime, Side, Strategy};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::indicators::IndicatorEngine;
use crate::market::MarketState;
use crate::state::{BotState, PauseReason};

const MIN_WARMUP_CANDLES: usize = 60;
const ROLLING_WINDOW: usize = 10;

fn position_side_to_side(side: PositionSide) -> Side {
    match side {
        PositionSide::Long => Side::Long,
        PositionSide::Short => Side::Short,
    }
}

/// Everything the loop needs between ticks, beyond the pure settings in [`Config`].
pub struct ControlLoop<A: PolicyAnalyzer> {
    gateway: Arc<dyn ExchangeGateway>,
    config: Config,
    state: BotState,
    pause_reason: Option<PauseReason>,
    market: MarketState,
    indicators: IndicatorEngine,
    risk: RiskManager,
    position: Option<risk::prelude::Position>,
    regime: Option<Regime>,
    backoff: gateway::backoff::ExchangeBackoffState,
    consecutive_errors: u32,
    tracked_orders: Vec<TrackedOrder>,
    last_health_sweep: DateTime<Utc>,
    recent_tick_prices: VecDeque<f64>,
    atr_history: VecDeque<f64>,
    hedge: Option<BandLimitedHedging>,
    ml_scorer: Option<Box<dyn QualityScorer>>,
    llm_policy: Option<LlmPolicy<A>>,
}

impl<A: PolicyAnalyzer> ControlLoop<A> {
    pub fn new(
        gateway: Arc<dyn ExchangeGateway>,
        config: Config,
        ml_scorer: Option<Box<dyn QualityScorer>>,
        llm_policy: Option<LlmPolicy<A>>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Self> {
        let indicators = IndicatorEngine::new(&config.strategy_settings)?;
        let risk = RiskManager::new(config.starting_balance, config.sizing, config.stops, config.breakers, config.intervals);
        let backoff = gateway::backoff::ExchangeBackoffState::new(config.gateway_backoff);
        Ok(Self {
            gateway,
            config,
            state: BotState::Starting,
            pause_reason: None,
            market: MarketState::new(),
            indicators,
            risk,
            position: None,
            regime: None,
            backoff,
            consecutive_errors: 0,
            tracked_orders: Vec::new(),
            last_health_sweep: now,
            recent_tick_prices: VecDeque::with_capacity(ROLLING_WINDOW),
            atr_history: VecDeque::with_capacity(ROLLING_WINDOW),
            hedge: None,
            ml_scorer,
            llm_policy,
        })
    }

    #[must_use]
    pub fn state(&self) -> BotState { self.state }

    #[must_use]
    pub fn has_open_position(&self) -> bool { self.position.is_some() || self.hedge.is_some() }

    #[must_use]
    pub fn next_interval(&self) -> std::time::Duration { self.risk.check_interval(self.has_open_position()) }

    /// Runs one tick. Errors are never propagated past this call in the real loop (spec §4.10);
    /// `main.rs` logs them and relies on [`Self::record_error`]/[`Self::record_success`] to
    /// drive the retry backoff and the `Paused(GatewayBackoff)` transition.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.state == BotState::Stopping {
            return Ok(());
        }

        if self.backoff.is_paused(now.timestamp_millis()) {
            self.enter_pause(PauseReason::GatewayBackoff);
            return Ok(());
        }
        self.risk.maybe_clear_breaker(now);
        if self.risk.breaker.tripped {
            self.enter_pause(PauseReason::CircuitBreaker);
            return Ok(());
        }
        if self.pause_reason.is_some() {
            self.leave_pause();
        }

        let result = self.run_tick_body(now).await;
        match &result {
            Ok(()) => self.record_success(now),
            Err(err) => self.record_error(err, now),
        }
        result
    }

    fn enter_pause(&mut self, reason: PauseReason) {
        if self.state.can_pause() && self.state != BotState::Paused {
            warn!(?reason, "pausing control loop");
            self.state = BotState::Paused;
        }
        self.pause_reason = Some(reason);
    }

    fn leave_pause(&mut self) {
        if self.state == BotState::Paused {
            info!("resuming control loop");
            self.state = if self.has_open_position() { BotState::InPosition } else { BotState::Flat };
        }
        self.pause_reason = None;
    }

    fn record_success(&mut self, now: DateTime<Utc>) {
        self.backoff.record_success(now.timestamp_millis());
        self.consecutive_errors = 0;
    }

    fn record_error(&mut self, err: &Error, now: DateTime<Utc>) {
        self.consecutive_errors += 1;
        let kind = match err {
            Error::Gateway(e) => e.kind(),
            _ => gateway::error::ErrorKind::Other,
        };
        self.backoff.record_error(kind, now.timestamp_millis());
        metrics::record_gateway_backoff(self.gateway.exchange().as_ref(), kind.as_ref());
        error!(error = %err, consecutive = self.consecutive_errors, "control loop tick failed");
        if self.consecutive_errors >= self.config.max_consecutive_errors {
            error!("max consecutive errors reached, stopping");
            self.state = BotState::Stopping;
        }
    }

    async fn run_tick_body(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.maybe_recover_position(now).await?;

        let symbol = self.config.exchange.symbol.clone();
        let candles = self.gateway.get_candles(&symbol, &self.config.exchange.timeframe, 250).await?;
        let snapshot = self.market.ingest(candles, &mut self.indicators);

        if self.state == BotState::Starting {
            if self.market.is_warmed_up(MIN_WARMUP_CANDLES) {
                self.state = if self.has_open_position() { BotState::InPosition } else { BotState::Flat };
            }
            return Ok(());
        }

        let Some(snapshot) = snapshot else {
            return self.maybe_sweep_orders(now).await;
        };

        let regime_out = classify(snapshot.adx.adx, snapshot.bollinger.bandwidth_pct, self.regime, &self.config.strategy_settings.regime);
        self.regime = Some(regime_out.regime);

        let ticker = self.gateway.get_ticker(&symbol).await?;
        self.track_rolling_windows(&snapshot, ticker.last);

        if self.config.hedge.enabled {
            self.tick_hedge(&symbol, ticker, now).await?;
        } else if self.position.is_some() {
            self.tick_manage_position(&symbol, ticker, now).await?;
        } else {
            self.tick_seek_entry(&symbol, &ticker, &snapshot, regime_out.regime, now).await?;
        }

        self.maybe_sweep_orders(now).await
    }

    fn track_rolling_windows(&mut self, snapshot: &strategy::prelude::IndicatorSnapshot, last_price: f64) {
        if self.recent_tick_prices.len() == ROLLING_WINDOW {
            self.recent_tick_prices.pop_front();
        }
        self.recent_tick_prices.push_back(last_price);
        if self.atr_history.len() == ROLLING_WINDOW {
            self.atr_history.pop_front();
        }
        self.atr_history.push_back(snapshot.atr);
    }

    fn rolling_atr_mean(&self) -> f64 {
        if self.atr_history.is_empty() {
            0.0
        } else {
            self.atr_history.iter().sum::<f64>() / self.atr_history.len() as f64
        }
    }

    fn price_change_and_volatility(&self) -> (f64, f64) {
        let candles = self.market.candles();
        if candles.len() < ROLLING_WINDOW + 1 {
            return (0.0, 0.0);
        }
        let window = &candles[candles.len() - ROLLING_WINDOW - 1..];
        let start = window.first().unwrap().close;
        let end = window.last().unwrap().close;
        let price_change = if start != 0.0 { (end - start) / start } else { 0.0 };
        let returns: Vec<f64> = window.windows(2).map(|w| if w[0].close != 0.0 { (w[1].close - w[0].close) / w[0].close } else { 0.0 }).collect();
        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
        (price_change, variance.sqrt())
    }

    /// Spec §4.8: on startup, if the exchange already reports an open position for the
    /// configured symbol, reconstruct it conservatively rather than opening a second one.
    async fn maybe_recover_position(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.position.is_some() || self.state != BotState::Starting {
            return Ok(());
        }
        let snapshots = self.gateway.get_positions(&self.config.exchange.symbol).await?;
        if let Some(snap) = snapshots.into_iter().find(|p| p.amount > 0.0) {
            let ticker = self.gateway.get_ticker(&self.config.exchange.symbol).await?;
            let side = position_side_to_side(snap.side);
            warn!(?side, amount = snap.amount, "recovered open position on startup");
            self.position = Some(risk::prelude::Position::reconstruct(side, snap.amount, snap.entry_price, ticker.last, now));
        }
        Ok(())
    }

    async fn tick_seek_entry(&mut self, symbol: &str, ticker: &Ticker, snapshot: &strategy::prelude::IndicatorSnapshot, regime: Regime, now: DateTime<Utc>) -> Result<()> {
        if !ticker.is_fresh(now.timestamp_millis(), self.config.max_ticker_staleness_ms) {
            warn!("stale ticker, skipping entry evaluation this tick");
            return Ok(());
        }

        let candles = self.market.candles();
        let allowed = allowed_strategies(regime);
        let signals: Vec<strategy::prelude::Signal> = strategies::all_strategies()
            .into_iter()
            .filter(|s| allowed.contains(&s.name()))
            .map(|s| s.evaluate(&candles, snapshot))
            .collect();
        let aggregated = aggregate(&signals, &self.config.strategy_settings.ensemble);
        if aggregated.side.is_hold() {
            return Ok(());
        }

        let order_side = match aggregated.side {
            Side::Long => OrderSide::Buy,
            _ => OrderSide::Sell,
        };
        let order_book = self.gateway.get_orderbook(symbol, self.config.execution_quality.depth_levels).await?;
        let balance = self.gateway.get_balance().await?;
        let (price_change_10, volatility_10) = self.price_change_and_volatility();
        let provisional_notional = self.risk.sizing.min_order_usdt.max(self.config.sizing.base_ratio * balance.available * self.config.exchange.leverage);
        let rolling_atr_mean = self.rolling_atr_mean();
        let recent_prices: Vec<f64> = self.recent_tick_prices.iter().copied().collect();
        let win_rate = self.risk.metrics.win_rate();

        let tag = TradeTag::new(now, symbol.to_string(), *snapshot, aggregated.clone());
        let ctx = PipelineContext {
            candles: &candles,
            win_rate,
            execution_inputs: filters::prelude::ExecutionQualityInputs {
                ticker,
                order_book: &order_book,
                order_side,
                order_size_usdt: provisional_notional,
                recent_tick_prices: &recent_prices,
                current_atr: snapshot.atr,
                rolling_atr_mean,
            },
            ml_features: snapshot.ml_features(aggregated.strength, aggregated.agreement, price_change_10, volatility_10, regime),
        };
        let settings = PipelineSettings {
            direction: self.config.direction,
            execution: self.config.execution_quality,
            ml_mode: self.config.plugins.ml_mode,
            ml_quality_threshold: self.config.plugins.ml_quality_threshold,
        };
        let mut tag = run_sync_gates(tag, &aggregated, snapshot, self.risk.breaker.tripped, &ctx, &settings, self.ml_scorer.as_deref());
        if let Some(llm_policy) = self.llm_policy.as_mut() {
            let policy_ctx = PolicyContext { candle_hash: snapshot_hash(snapshot), signal_fingerprint: signal_fingerprint(&aggregated), prompt: String::new() };
            tag = run_llm_gate(tag, llm_policy, policy_ctx, now).await;
        }

        let action = final_action(&tag, aggregated.side);
        if action.is_hold() {
            metrics::record_signal_rejection(tag.rejection_reason().unwrap_or("unknown"));
            return Ok(());
        }

        self.state = BotState::Opening;
        let notional = self.risk.size_order_usdt(balance.available, self.config.exchange.leverage, ticker.last, volatility_10, aggregated.strength, self.config.strategy_settings.ensemble.long_min_strength, None);
        if notional <= 0.0 {
            info!("loss-streak kill switch engaged, skipping entry");
            self.state = BotState::Flat;
            return Ok(());
        }
        let amount = notional / ticker.last;

        let maker_config = GatewayMakerConfig {
            enabled: self.config.maker.use_maker_order,
            offset_pct: self.config.maker.maker_offset_pct,
            timeout: self.config.maker.maker_timeout,
            poll_interval: std::time::Duration::from_millis(500),
            auto_fallback: self.config.maker.maker_auto_fallback,
        };
        let order = maker::place_smart_order(self.gateway.as_ref(), symbol, order_side, amount, false, *ticker, maker_config).await?;
        self.tracked_orders.push(TrackedOrder { id: order.id.clone(), symbol: symbol.to_string(), placed_at: now });

        if !order.status.is_filled() {
            warn!(order_id = %order.id, "entry order did not fill");
            self.state = BotState::Flat;
            return Ok(());
        }

        let position = self.risk.open_position(aggregated.side, order.filled_qty, order.avg_fill_price, self.config.exchange.leverage, snapshot.atr, order.fee, now, aggregated.contributing_strategies.first().copied().unwrap_or("ensemble"), tag.rejection_reason().unwrap_or("ensemble consensus").to_string());
        metrics::record_trade_opened(symbol, aggregated.side.as_ref());
        self.position = Some(position);
        self.state = BotState::InPosition;
        Ok(())
    }

    async fn tick_manage_position(&mut self, symbol: &str, ticker: Ticker, now: DateTime<Utc>) -> Result<()> {
        let Some(mut position) = self.position.take() else { return Ok(()) };
        let exit_reason = self.risk.evaluate_exit(&mut position, ticker.last, false);
        if let Some(reason) = exit_reason {
            self.state = BotState::Closing;
            let close_side = match position.side {
                Side::Long => OrderSide::Sell,
                _ => OrderSide::Buy,
            };
            let order = self.gateway.create_market_order(symbol, close_side, position.amount, true).await?;
            let pnl = position.unrealized_pnl(order.avg_fill_price) - position.entry_fee - order.fee;
            metrics::record_trade_closed(symbol, reason.as_ref(), pnl);
            let drawdown_pct = (position.max_profit_usdt - pnl).max(0.0) / self.risk.starting_balance.max(1.0);
            let next_midnight = (now + chrono::Duration::days(1)).date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc();
            let just_tripped = self.risk.close_position(pnl, drawdown_pct, now, next_midnight);
            if just_tripped {
                metrics::record_circuit_breaker_trip(self.risk.breaker.tripped_reason.map(|r| r.as_ref()).unwrap_or("unknown"));
            }
            self.state = BotState::Flat;
        } else {
            self.position = Some(position);
        }
        Ok(())
    }

    async fn tick_hedge(&mut self, symbol: &str, ticker: Ticker, now: DateTime<Utc>) -> Result<()> {
        if self.hedge.is_none() {
            let balance = self.gateway.get_balance().await?;
            let settings = HedgeSettings {
                mes_fee_multiplier: self.config.hedge.mes_fee_multiplier,
                alpha: self.config.hedge.alpha,
                base_position_ratio: self.config.hedge.base_position_ratio,
                min_rebalance_profit_multiplier: self.config.hedge.min_rebalance_profit_multiplier,
                exit_eta: self.config.hedge.exit_eta,
                exit_mes_ratio: self.config.hedge.exit_mes_ratio,
                fee_rate: self.config.exchange.taker_fee,
            };
            self.hedge = Some(BandLimitedHedging::open(balance.available, ticker.last, settings));
            self.state = BotState::InPosition;
            info!(price = ticker.last, "opened band-limited hedge");
            return Ok(());
        }
        let hedge = self.hedge.as_mut().unwrap();
        if let Some(action) = hedge.maybe_rebalance(ticker.last) {
            info!(?action, "band-limited hedge rebalanced");
        }
        let (_, volatility_10) = self.price_change_and_volatility();
        hedge.maybe_exit(volatility_10, self.risk.starting_balance * self.config.hedge.base_position_ratio, self.risk.starting_balance);
        if hedge.state == strategies::band_limited_hedging::HedgeState::Exit {
            info!(symbol, "closing band-limited hedge");
            self.hedge = None;
            self.state = BotState::Flat;
        }
        Ok(())
    }

    async fn maybe_sweep_orders(&mut self, now: DateTime<Utc>) -> Result<()> {
        if now.signed_duration_since(self.last_health_sweep).to_std().unwrap_or_default() < self.config.health.order_health_interval {
            return Ok(());
        }
        self.last_health_sweep = now;
        let config = OrderHealthConfig { check_interval: self.config.health.order_health_interval, stale_threshold: self.config.health.stale_order_threshold, max_age: self.config.health.max_order_age };
        let results = health::sweep(self.gateway.as_ref(), &self.tracked_orders, config, now).await;
        self.tracked_orders.retain(|order| {
            results.iter().find(|(tracked, action, _)| tracked.id == order.id && *action == health::SweepAction::Canceled).is_none()
        });
        for (order, action, outcome) in results {
            if action == health::SweepAction::LoggedStale {
                warn!(order_id = %order.id, "stale order still open");
            }
            if let Err(err) = outcome {
                warn!(order_id = %order.id, error = %err, "order health sweep call failed");
            }
        }
        Ok(())
    }
}

fn snapshot_hash(snapshot: &strategy::prelude::IndicatorSnapshot) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    snapshot.close.to_bits().hash(&mut hasher);
    snapshot.rsi.to_bits().hash(&mut hasher);
    snapshot.adx.adx.to_bits().hash(&mut hasher);
    hasher.finish()
}

fn signal_fingerprint(signal: &strategy::prelude::AggregatedSignal) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    signal.side.hash(&mut hasher);
    signal.strength.to_bits().hash(&mut hasher);
    hasher.finish()
}
