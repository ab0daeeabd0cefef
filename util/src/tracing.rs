//! Ambient logging setup (§ambient stack). The bot binary calls [`init`] once at startup; every
//! other crate just uses the `tracing` macros and lets events flow to whatever subscriber is live.
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs a formatted subscriber filtered by `RUST_LOG`, defaulting to `info` when unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).finish().try_init().ok();
}
