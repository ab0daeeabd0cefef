//! `ExchangeGateway` implementation talking to Bitget USDT-M mix contracts over REST.
#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate serde;

pub mod adapters;
pub mod client;

pub use client::BitgetGateway;
