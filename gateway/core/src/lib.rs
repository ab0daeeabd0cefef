//! Exchange-abstraction contract for the trading core: canonical wire types, the
//! [`gateway::ExchangeGateway`] trait every exchange adapter implements, and the ambient
//! behaviours (backoff, maker-order placement, order-health sweeps) that sit on top of it.
#![deny(unused_must_use, unused_mut)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate serde;
#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate tracing;

pub mod backoff;
pub mod credential;
pub mod error;
pub mod exchange;
pub mod gateway;
pub mod health;
pub mod maker;
pub mod settings;
pub mod types;

pub mod prelude {
    #[doc(no_inline)]
    pub use crate::backoff::{BackoffConfig, ExchangeBackoffState};
    #[doc(no_inline)]
    pub use crate::credential::{BasicCredentials, Credentials};
    #[doc(no_inline)]
    pub use crate::error::{Error, ErrorKind, Result};
    #[doc(no_inline)]
    pub use crate::exchange::{Exchange, MarginMode, PositionMode};
    #[doc(no_inline)]
    pub use crate::gateway::ExchangeGateway;
    #[doc(no_inline)]
    pub use crate::settings::ExchangeConfig;
    #[doc(no_inline)]
    pub use crate::types::*;
}
