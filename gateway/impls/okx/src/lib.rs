//! `ExchangeGateway` implementation talking to OKX USDT-margined perpetual swaps over REST.
#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate serde;

pub mod adapters;
pub mod client;

pub use client::OkxGateway;
