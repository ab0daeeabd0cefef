//! Typed configuration (spec §6): one structure covering every recognized group, validated once
//! at startup before the control loop starts.
use std::time::Duration;

use filters::prelude::{DirectionThresholds, ExecutionQualitySettings};
use gateway::prelude::{BackoffConfig, ExchangeConfig};
use plugins::ml::MlMode;
use plugins::prelude::{LlmPolicySettings, ParamBounds};
use risk::prelude::{CircuitBreakerSettings, IntervalSettings, SizingSettings, StopSettings};
use strategy::prelude::StrategySettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakerConfig {
    pub use_maker_order: bool,
    pub maker_offset_pct: f64,
    pub maker_timeout: Duration,
    pub maker_auto_fallback: bool,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self { use_maker_order: false, maker_offset_pct: 0.0002, maker_timeout: Duration::from_secs(10), maker_auto_fallback: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    pub order_health_interval: Duration,
    pub stale_order_threshold: Duration,
    pub max_order_age: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { order_health_interval: Duration::from_secs(30), stale_order_threshold: Duration::from_secs(60), max_order_age: Duration::from_secs(300) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    pub ml_mode: MlMode,
    pub ml_quality_threshold: f64,
    pub llm: LlmPolicySettings,
}

impl Default for PluginConfig {
    fn default() -> Self { Self { ml_mode: MlMode::Off, ml_quality_threshold: 0.5, llm: LlmPolicySettings::default() } }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HedgeConfig {
    pub enabled: bool,
    pub mes_fee_multiplier: f64,
    pub alpha: f64,
    pub base_position_ratio: f64,
    pub min_rebalance_profit_multiplier: f64,
    pub exit_eta: f64,
    pub exit_mes_ratio: f64,
}

impl Default for HedgeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mes_fee_multiplier: 9.0,
            alpha: 0.5,
            base_position_ratio: 0.95,
            min_rebalance_profit_multiplier: 1.5,
            exit_eta: 0.0005,
            exit_mes_ratio: 0.5,
        }
    }
}

/// The single configuration structure the core consumes (spec §6). `error_backoff_seconds` and
/// `max_consecutive_errors` govern the loop's own retry counter, distinct from the gateway's
/// per-call `BackoffConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub gateway_backoff: BackoffConfig,
    pub sizing: SizingSettings,
    pub stops: StopSettings,
    pub strategy_settings: StrategySettings,
    pub direction: DirectionThresholds,
    pub execution_quality: ExecutionQualitySettings,
    pub max_ticker_staleness_ms: i64,
    pub intervals: IntervalSettings,
    pub health: HealthConfig,
    pub breakers: CircuitBreakerSettings,
    pub max_consecutive_errors: u32,
    pub error_backoff_seconds: u64,
    pub plugins: PluginConfig,
    pub maker: MakerConfig,
    pub hedge: HedgeConfig,
    pub starting_balance: f64,
    pub llm_param_bounds: ParamBounds,
}

impl Config {
    /// Startup-fatal validation (spec §9 design note): every nested group gets a chance to reject
    /// obviously broken input before the loop ever issues a gateway call.
    pub fn validate(&self) -> Result<(), String> {
        self.exchange.validate()?;
        self.strategy_settings.validate()?;
        if self.starting_balance <= 0.0 {
            return Err("starting_balance must be positive".to_string());
        }
        if self.max_consecutive_errors == 0 {
            return Err("max_consecutive_errors must be at least 1".to_string());
        }
        if self.sizing.min_order_usdt > self.sizing.max_order_usdt {
            return Err("sizing.min_order_usdt must not exceed sizing.max_order_usdt".to_string());
        }
        if self.hedge.enabled && self.exchange.position_mode != gateway::exchange::PositionMode::Hedge {
            return Err("hedge.enabled requires exchange.position_mode = hedge".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gateway::exchange::{Exchange, MarginMode, PositionMode};

    use super::*;

    fn exchange_config() -> ExchangeConfig {
        ExchangeConfig {
            exchange: Exchange::Binance,
            symbol: "BTCUSDT".to_string(),
            timeframe: "5m".to_string(),
            leverage: 5.0,
            margin_mode: MarginMode::Cross,
            position_mode: PositionMode::OneWay,
            maker_fee: 0.0002,
            taker_fee: 0.0004,
        }
    }

    fn config() -> Config {
        Config {
            exchange: exchange_config(),
            gateway_backoff: BackoffConfig::default(),
            sizing: SizingSettings::default(),
            stops: StopSettings::default(),
            strategy_settings: StrategySettings::default(),
            direction: DirectionThresholds::default(),
            execution_quality: ExecutionQualitySettings::default(),
            max_ticker_staleness_ms: 5_000,
            intervals: IntervalSettings::default(),
            health: HealthConfig::default(),
            breakers: CircuitBreakerSettings::default(),
            max_consecutive_errors: 5,
            error_backoff_seconds: 2,
            plugins: PluginConfig::default(),
            maker: MakerConfig::default(),
            hedge: HedgeConfig::default(),
            starting_balance: 10_000.0,
            llm_param_bounds: ParamBounds::default(),
        }
    }

    #[test]
    fn default_config_validates() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn hedge_requires_hedge_position_mode() {
        let mut c = config();
        c.hedge.enabled = true;
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_max_consecutive_errors_is_rejected() {
        let mut c = config();
        c.max_consecutive_errors = 0;
        assert!(c.validate().is_err());
    }
}
