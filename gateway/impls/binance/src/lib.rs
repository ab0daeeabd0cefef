//! `ExchangeGateway` implementation talking to Binance USDT-M perpetual futures over REST.
#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate serde;

pub mod adapters;
pub mod client;

pub use client::BinanceGateway;
