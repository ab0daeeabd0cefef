//! Facade re-exporting the exchange-abstraction contract plus whichever adapters are enabled.
#[cfg(feature = "binance")]
pub use gateway_binance;
#[cfg(feature = "bitget")]
pub use gateway_bitget;
#[cfg(feature = "okx")]
pub use gateway_okx;

pub use gateway_core::*;

pub mod prelude {
    pub use gateway_core::prelude::*;
}
