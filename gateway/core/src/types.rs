//! Canonical wire types the core trades in. Exchange adapters translate vendor JSON into these
//! at the boundary and nowhere else — this is the single place a `Position`-like value exists,
//! rather than the dict/struct ambiguity the source platform suffered from.
use chrono::{DateTime, Utc};

pub type Symbol = String;

/// OHLCV bar for `(symbol, timeframe)`. The most recent element of a candle series may be
/// partial (`is_final == false`); strategies must treat it as such.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Candle {
    pub open_ts: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub is_final: bool,
}

impl Candle {
    #[must_use]
    pub fn is_bullish(&self) -> bool { self.close > self.open }

    #[must_use]
    pub fn is_bearish(&self) -> bool { self.close < self.open }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Ticker {
    pub last: f64,
    pub bid: f64,
    pub ask: f64,
    pub volume_24h: f64,
    pub ts: i64,
}

impl Ticker {
    #[must_use]
    pub fn spread_pct(&self) -> f64 {
        if self.bid <= 0.0 {
            return f64::NAN;
        }
        (self.ask - self.bid) / self.bid
    }

    /// Rejects ticks older than `max_staleness_ms`, per the freshness invariant in §3.
    #[must_use]
    pub fn is_fresh(&self, now_ms: i64, max_staleness_ms: i64) -> bool { now_ms - self.ts <= max_staleness_ms }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderBookLevel {
    pub price: f64,
    pub qty: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderBook {
    pub ts: i64,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

impl OrderBook {
    /// Sum of quantity in the top `n` levels on the given side.
    #[must_use]
    pub fn top_depth(&self, side: OrderSide, n: usize) -> f64 {
        let levels = match side {
            OrderSide::Buy => &self.bids,
            OrderSide::Sell => &self.asks,
        };
        levels.iter().take(n).map(|l| l.qty * l.price).sum()
    }
}

/// Not `Deserialize`: `asset` is `&'static str`, always an internal literal (e.g. `"USDT"`);
/// adapters parse the exchange's own wire shape and build this from it, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Balance {
    pub asset: &'static str,
    pub total: f64,
    pub available: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PositionSnapshot {
    pub side: PositionSide,
    pub amount: f64,
    pub entry_price: f64,
    pub leverage: f64,
    pub unrealized_pnl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    Rejected,
    Expired,
}

impl OrderStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool { matches!(self, Self::Filled | Self::Canceled | Self::Rejected | Self::Expired) }

    #[must_use]
    pub fn is_filled(&self) -> bool { matches!(self, Self::Filled) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Liquidity {
    Maker,
    Taker,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderResult {
    pub id: String,
    pub status: OrderStatus,
    pub filled_qty: f64,
    pub avg_fill_price: f64,
    pub fee: f64,
    pub liquidity: Liquidity,
    pub created_at: DateTime<Utc>,
}

impl OrderResult {
    #[must_use]
    pub fn is_open(&self) -> bool { !self.status.is_terminal() }
}
