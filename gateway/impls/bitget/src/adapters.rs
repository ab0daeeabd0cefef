//! Vendor JSON <-> canonical type translation for Bitget's USDT-M mix contracts. Bitget wraps
//! every response in a `{code, msg, data}` envelope regardless of endpoint.
use gateway_core::error::Error;
use gateway_core::types::{
    Balance, Candle, OrderBookLevel, OrderResult, OrderSide, OrderStatus, PositionSide, PositionSnapshot, Ticker,
};

#[derive(Debug, Deserialize)]
pub struct BitgetEnvelope<T> {
    pub code: String,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> BitgetEnvelope<T> {
    pub fn into_data(self) -> Result<T, Error> {
        if self.code != "00000" {
            return Err(Error::ExchangeError(format!("bitget {}: {}", self.code, self.msg)));
        }
        self.data.ok_or_else(|| Error::MissingField("data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct BitgetTicker {
    pub last: String,
    #[serde(rename = "bestBid")]
    pub best_bid: String,
    #[serde(rename = "bestAsk")]
    pub best_ask: String,
    #[serde(rename = "baseVolume")]
    pub base_volume: String,
    pub ts: String,
}

#[derive(Debug, Deserialize)]
pub struct BitgetDepthLevel(pub String, pub String);

#[derive(Debug, Deserialize)]
pub struct BitgetDepth {
    pub bids: Vec<BitgetDepthLevel>,
    pub asks: Vec<BitgetDepthLevel>,
    pub ts: String,
}

#[derive(Debug, Deserialize)]
pub struct BitgetAccount {
    #[serde(rename = "marginCoin")]
    pub margin_coin: String,
    pub available: String,
    pub equity: String,
}

#[derive(Debug, Deserialize)]
pub struct BitgetPosition {
    pub total: String,
    #[serde(rename = "holdSide")]
    pub hold_side: String,
    #[serde(rename = "averageOpenPrice")]
    pub average_open_price: String,
    pub leverage: String,
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: String,
}

#[derive(Debug, Deserialize)]
pub struct BitgetOrder {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub state: String,
    #[serde(rename = "fillPrice")]
    pub fill_price: String,
    #[serde(rename = "baseVolume")]
    pub base_volume: String,
    #[serde(rename = "uTime")]
    pub u_time: String,
}

fn parse_f64(field: &str, value: &str) -> Result<f64, Error> {
    value.parse::<f64>().map_err(|_| Error::MissingField(field.to_string()))
}

pub fn from_bitget_ticker(t: BitgetTicker) -> Result<Ticker, Error> {
    Ok(Ticker {
        last: parse_f64("last", &t.last)?,
        bid: parse_f64("bestBid", &t.best_bid)?,
        ask: parse_f64("bestAsk", &t.best_ask)?,
        volume_24h: parse_f64("baseVolume", &t.base_volume)?,
        ts: t.ts.parse().unwrap_or(0),
    })
}

pub fn from_bitget_depth(d: BitgetDepth) -> Result<gateway_core::types::OrderBook, Error> {
    let level = |l: &BitgetDepthLevel| -> Result<OrderBookLevel, Error> {
        Ok(OrderBookLevel {
            price: parse_f64("price", &l.0)?,
            qty: parse_f64("qty", &l.1)?,
        })
    };
    Ok(gateway_core::types::OrderBook {
        ts: d.ts.parse().unwrap_or(0),
        bids: d.bids.iter().map(level).collect::<Result<_, _>>()?,
        asks: d.asks.iter().map(level).collect::<Result<_, _>>()?,
    })
}

/// Bitget candlesticks come back as `[ts, open, high, low, close, volume, quoteVolume]`.
pub fn from_bitget_candle(row: &[String], is_final: bool) -> Result<Candle, Error> {
    let get = |i: usize| -> Result<f64, Error> {
        row.get(i).ok_or_else(|| Error::MissingField(format!("candle[{i}]")))?.parse().map_err(|_| Error::MissingField(format!("candle[{i}]")))
    };
    Ok(Candle {
        open_ts: row.first().and_then(|s| s.parse().ok()).unwrap_or(0),
        open: get(1)?,
        high: get(2)?,
        low: get(3)?,
        close: get(4)?,
        volume: get(5)?,
        is_final,
    })
}

pub fn from_bitget_account(a: &BitgetAccount) -> Result<Balance, Error> {
    Ok(Balance {
        asset: "USDT",
        total: parse_f64("equity", &a.equity)?,
        available: parse_f64("available", &a.available)?,
    })
}

pub fn from_bitget_position(p: BitgetPosition) -> Result<Option<PositionSnapshot>, Error> {
    let amount = parse_f64("total", &p.total)?;
    if amount == 0.0 {
        return Ok(None);
    }
    Ok(Some(PositionSnapshot {
        side: if p.hold_side == "long" { PositionSide::Long } else { PositionSide::Short },
        amount,
        entry_price: parse_f64("averageOpenPrice", &p.average_open_price)?,
        leverage: parse_f64("leverage", &p.leverage)?,
        unrealized_pnl: parse_f64("unrealizedPL", &p.unrealized_pl)?,
    }))
}

pub fn from_bitget_order_state(s: &str) -> OrderStatus {
    match s {
        "new" => OrderStatus::New,
        "partially_filled" => OrderStatus::PartiallyFilled,
        "filled" => OrderStatus::Filled,
        "canceled" => OrderStatus::Canceled,
        _ => OrderStatus::New,
    }
}

pub fn from_bitget_order(o: BitgetOrder, fee: f64, liquidity: gateway_core::types::Liquidity) -> Result<OrderResult, Error> {
    use chrono::TimeZone;
    Ok(OrderResult {
        id: o.order_id,
        status: from_bitget_order_state(&o.state),
        filled_qty: parse_f64("baseVolume", &o.base_volume)?,
        avg_fill_price: o.fill_price.parse().unwrap_or(0.0),
        fee,
        liquidity,
        created_at: chrono::Utc
            .timestamp_millis_opt(o.u_time.parse().unwrap_or(0))
            .single()
            .unwrap_or_default(),
    })
}

pub fn to_bitget_side(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "buy",
        OrderSide::Sell => "sell",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_error_code_surfaces_message() {
        let env: BitgetEnvelope<BitgetTicker> = BitgetEnvelope {
            code: "40001".to_string(),
            msg: "bad symbol".to_string(),
            data: None,
        };
        let err = env.into_data().unwrap_err();
        assert!(matches!(err, Error::ExchangeError(_)));
    }

    #[test]
    fn zero_total_position_flattens_to_none() {
        let p = BitgetPosition {
            total: "0".to_string(),
            hold_side: "long".to_string(),
            average_open_price: "0".to_string(),
            leverage: "10".to_string(),
            unrealized_pl: "0".to_string(),
        };
        assert!(from_bitget_position(p).unwrap().is_none());
    }
}
