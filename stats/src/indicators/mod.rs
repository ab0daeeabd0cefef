pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cross;
pub mod ema;
pub mod kdj;
pub mod macd;
pub mod rsi;
pub mod volume_ratio;

pub use adx::{Adx, AdxOutput};
pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerOutput};
pub use cross::{CrossAbove, CrossUnder};
pub use ema::ExponentialMovingAverage;
pub use kdj::{Kdj, KdjOutput};
pub use macd::{Macd, MacdOutput};
pub use rsi::Rsi;
pub use volume_ratio::VolumeRatio;
