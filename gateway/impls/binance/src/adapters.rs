//! Vendor JSON <-> canonical type translation. Nothing outside this file should ever see a
//! Binance response shape directly — the boundary-translation discipline from §9.
use gateway_core::error::Error;
use gateway_core::types::{
    Balance, Candle, Liquidity, OrderBook, OrderBookLevel, OrderResult, OrderSide, OrderStatus, PositionSide,
    PositionSnapshot, Ticker,
};

#[derive(Debug, Deserialize)]
pub struct BinanceTicker {
    #[serde(rename = "lastPrice")]
    pub last_price: String,
    #[serde(rename = "bidPrice")]
    pub bid_price: String,
    #[serde(rename = "askPrice")]
    pub ask_price: String,
    pub volume: String,
    #[serde(rename = "closeTime")]
    pub close_time: i64,
}

#[derive(Debug, Deserialize)]
pub struct BinanceDepth {
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
    #[serde(rename = "E")]
    pub event_time: i64,
}

#[derive(Debug, Deserialize)]
pub struct BinanceBalanceEntry {
    pub asset: String,
    pub balance: String,
    #[serde(rename = "availableBalance")]
    pub available_balance: String,
}

#[derive(Debug, Deserialize)]
pub struct BinancePositionRisk {
    pub symbol: String,
    #[serde(rename = "positionAmt")]
    pub position_amt: String,
    #[serde(rename = "entryPrice")]
    pub entry_price: String,
    pub leverage: String,
    #[serde(rename = "unRealizedProfit")]
    pub unrealized_profit: String,
}

#[derive(Debug, Deserialize)]
pub struct BinanceOrder {
    #[serde(rename = "orderId")]
    pub order_id: i64,
    pub status: String,
    #[serde(rename = "executedQty")]
    pub executed_qty: String,
    #[serde(rename = "avgPrice")]
    pub avg_price: String,
    #[serde(rename = "updateTime")]
    pub update_time: i64,
}

fn parse_f64(field: &str, value: &str) -> Result<f64, Error> {
    value.parse::<f64>().map_err(|_| Error::MissingField(field.to_string()))
}

pub fn from_binance_ticker(t: BinanceTicker) -> Result<Ticker, Error> {
    Ok(Ticker {
        last: parse_f64("lastPrice", &t.last_price)?,
        bid: parse_f64("bidPrice", &t.bid_price)?,
        ask: parse_f64("askPrice", &t.ask_price)?,
        volume_24h: parse_f64("volume", &t.volume)?,
        ts: t.close_time,
    })
}

pub fn from_binance_depth(d: BinanceDepth) -> Result<OrderBook, Error> {
    let level = |raw: &[String; 2]| -> Result<OrderBookLevel, Error> {
        Ok(OrderBookLevel {
            price: parse_f64("price", &raw[0])?,
            qty: parse_f64("qty", &raw[1])?,
        })
    };
    Ok(OrderBook {
        ts: d.event_time,
        bids: d.bids.iter().map(level).collect::<Result<_, _>>()?,
        asks: d.asks.iter().map(level).collect::<Result<_, _>>()?,
    })
}

/// Binance reports USDT-M futures candles as `[open_time, open, high, low, close, volume, close_time, ...]`.
pub fn from_binance_kline(row: &[serde_json::Value], is_final: bool) -> Result<Candle, Error> {
    let get_str = |i: usize| -> Result<f64, Error> {
        row.get(i)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Error::MissingField(format!("kline[{i}]")))
            .and_then(|s| parse_f64("kline", s))
    };
    let open_ts = row
        .first()
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| Error::MissingField("kline[0]".to_string()))?;
    Ok(Candle {
        open_ts,
        open: get_str(1)?,
        high: get_str(2)?,
        low: get_str(3)?,
        close: get_str(4)?,
        volume: get_str(5)?,
        is_final,
    })
}

pub fn from_binance_balance(b: &BinanceBalanceEntry) -> Result<Balance, Error> {
    Ok(Balance {
        asset: "USDT",
        total: parse_f64("balance", &b.balance)?,
        available: parse_f64("availableBalance", &b.available_balance)?,
    })
}

pub fn from_binance_position(p: BinancePositionRisk) -> Result<Option<PositionSnapshot>, Error> {
    let amount = parse_f64("positionAmt", &p.position_amt)?;
    if amount == 0.0 {
        return Ok(None);
    }
    Ok(Some(PositionSnapshot {
        side: if amount > 0.0 { PositionSide::Long } else { PositionSide::Short },
        amount: amount.abs(),
        entry_price: parse_f64("entryPrice", &p.entry_price)?,
        leverage: parse_f64("leverage", &p.leverage)?,
        unrealized_pnl: parse_f64("unRealizedProfit", &p.unrealized_profit)?,
    }))
}

pub fn from_binance_order_status(s: &str) -> OrderStatus {
    match s {
        "NEW" => OrderStatus::New,
        "PARTIALLY_FILLED" => OrderStatus::PartiallyFilled,
        "FILLED" => OrderStatus::Filled,
        "CANCELED" | "PENDING_CANCEL" => OrderStatus::Canceled,
        "REJECTED" => OrderStatus::Rejected,
        "EXPIRED" => OrderStatus::Expired,
        _ => OrderStatus::New,
    }
}

pub fn from_binance_order(o: BinanceOrder, fee: f64, liquidity: Liquidity) -> Result<OrderResult, Error> {
    use chrono::TimeZone;
    Ok(OrderResult {
        id: o.order_id.to_string(),
        status: from_binance_order_status(&o.status),
        filled_qty: parse_f64("executedQty", &o.executed_qty)?,
        avg_fill_price: parse_f64("avgPrice", &o.avg_price).unwrap_or(0.0),
        fee,
        liquidity,
        created_at: chrono::Utc.timestamp_millis_opt(o.update_time).single().unwrap_or_default(),
    })
}

pub fn to_binance_side(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "BUY",
        OrderSide::Sell => "SELL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_position_is_flattened_to_none() {
        let p = BinancePositionRisk {
            symbol: "BTCUSDT".to_string(),
            position_amt: "0".to_string(),
            entry_price: "0".to_string(),
            leverage: "10".to_string(),
            unrealized_profit: "0".to_string(),
        };
        assert!(from_binance_position(p).unwrap().is_none());
    }

    #[test]
    fn negative_amount_maps_to_short() {
        let p = BinancePositionRisk {
            symbol: "BTCUSDT".to_string(),
            position_amt: "-1.5".to_string(),
            entry_price: "100".to_string(),
            leverage: "10".to_string(),
            unrealized_profit: "-2.0".to_string(),
        };
        let snap = from_binance_position(p).unwrap().unwrap();
        assert_eq!(snap.side, PositionSide::Short);
        assert_eq!(snap.amount, 1.5);
    }
}
