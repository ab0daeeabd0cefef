//! Process entry point: parse CLI flags, load and validate config, build the exchange gateway
//! and optional plugins, then drive [`bot::control_loop::ControlLoop`] on a fixed-interval tokio
//! loop (spec §4.7). Everything reusable lives in the library crate; this stays thin on purpose.
use std::env;
use std::sync::Arc;

use clap::Parser;
use gateway::exchange::Exchange;
use gateway::prelude::{BasicCredentials, Credentials, ExchangeGateway};
use tracing::{error, info};

use bot::analyzer::NoopAnalyzer;
use bot::config::Config;
use bot::control_loop::ControlLoop;

#[derive(Parser, Debug)]
#[command(name = "trading-core", about = "Automated crypto-derivatives trading core")]
struct Cli {
    /// Path to a YAML/JSON/TOML config file (format inferred from extension).
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Use the exchange's testnet/sandbox endpoint where supported (currently Binance only).
    #[arg(long)]
    testnet: bool,
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("TRADING_CORE").separator("__"))
        .build()?;
    let cfg: Config = settings.try_deserialize()?;
    cfg.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(cfg)
}

fn load_credentials(exchange: Exchange) -> anyhow::Result<BasicCredentials> {
    let api_key = env::var("TRADING_CORE_API_KEY").map_err(|_| anyhow::anyhow!("TRADING_CORE_API_KEY not set"))?;
    let api_secret = env::var("TRADING_CORE_API_SECRET").map_err(|_| anyhow::anyhow!("TRADING_CORE_API_SECRET not set"))?;
    let api_password = env::var("TRADING_CORE_API_PASSWORD").ok();
    Ok(BasicCredentials::new(exchange, &api_key, &api_secret, api_password.as_deref()))
}

fn build_gateway(exchange: Exchange, creds: &dyn Credentials, testnet: bool) -> anyhow::Result<Arc<dyn ExchangeGateway>> {
    match exchange {
        #[cfg(feature = "binance")]
        Exchange::Binance => Ok(Arc::new(gateway::gateway_binance::BinanceGateway::new(creds, testnet)?)),
        #[cfg(feature = "bitget")]
        Exchange::Bitget => Ok(Arc::new(gateway::gateway_bitget::BitgetGateway::new(creds)?)),
        #[cfg(feature = "okx")]
        Exchange::Okx => Ok(Arc::new(gateway::gateway_okx::OkxGateway::new(creds)?)),
        #[allow(unreachable_patterns)]
        other => Err(anyhow::anyhow!("no adapter compiled in for exchange {other:?}")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    util::logging::init();
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let creds = load_credentials(config.exchange.exchange)?;
    let gateway = build_gateway(config.exchange.exchange, &creds, cli.testnet)?;
    gateway.connect().await?;

    let now = util::time::now();
    let mut control_loop = ControlLoop::<NoopAnalyzer>::new(gateway, config, None, None, now)?;

    info!("trading core starting");
    loop {
        let now = util::time::now();
        if let Err(err) = control_loop.tick(now).await {
            error!(%err, "tick returned an error after internal retry handling");
        }
        if control_loop.state() == bot::state::BotState::Stopping {
            error!("control loop stopped itself, exiting");
            break;
        }
        tokio::time::sleep(control_loop.next_interval()).await;
    }

    Ok(())
}
