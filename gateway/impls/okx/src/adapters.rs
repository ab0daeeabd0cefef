//! Vendor JSON <-> canonical type translation for OKX's USDT-margined swap (`SWAP`) contracts.
//! OKX wraps every response in a `{code, msg, data}` envelope just like Bitget.
use gateway_core::error::Error;
use gateway_core::types::{
    Balance, Candle, OrderBookLevel, OrderResult, OrderSide, OrderStatus, PositionSide, PositionSnapshot, Ticker,
};

#[derive(Debug, Deserialize)]
pub struct OkxEnvelope<T> {
    pub code: String,
    pub msg: String,
    pub data: Vec<T>,
}

impl<T> OkxEnvelope<T> {
    pub fn into_first(self) -> Result<T, Error> {
        if self.code != "0" {
            return Err(Error::ExchangeError(format!("okx {}: {}", self.code, self.msg)));
        }
        self.data.into_iter().next().ok_or_else(|| Error::MissingField("data".to_string()))
    }

    pub fn into_vec(self) -> Result<Vec<T>, Error> {
        if self.code != "0" {
            return Err(Error::ExchangeError(format!("okx {}: {}", self.code, self.msg)));
        }
        Ok(self.data)
    }
}

#[derive(Debug, Deserialize)]
pub struct OkxTicker {
    pub last: String,
    #[serde(rename = "bidPx")]
    pub bid_px: String,
    #[serde(rename = "askPx")]
    pub ask_px: String,
    #[serde(rename = "vol24h")]
    pub vol_24h: String,
    pub ts: String,
}

#[derive(Debug, Deserialize)]
pub struct OkxDepthLevel(pub String, pub String, pub String, pub String);

#[derive(Debug, Deserialize)]
pub struct OkxDepth {
    pub bids: Vec<OkxDepthLevel>,
    pub asks: Vec<OkxDepthLevel>,
    pub ts: String,
}

#[derive(Debug, Deserialize)]
pub struct OkxBalanceDetail {
    pub ccy: String,
    #[serde(rename = "eq")]
    pub eq: String,
    #[serde(rename = "availEq")]
    pub avail_eq: String,
}

#[derive(Debug, Deserialize)]
pub struct OkxBalance {
    pub details: Vec<OkxBalanceDetail>,
}

#[derive(Debug, Deserialize)]
pub struct OkxPosition {
    pub pos: String,
    #[serde(rename = "posSide")]
    pub pos_side: String,
    #[serde(rename = "avgPx")]
    pub avg_px: String,
    pub lever: String,
    pub upl: String,
}

#[derive(Debug, Deserialize)]
pub struct OkxOrder {
    #[serde(rename = "ordId")]
    pub ord_id: String,
    pub state: String,
    #[serde(rename = "avgPx")]
    pub avg_px: String,
    #[serde(rename = "accFillSz")]
    pub acc_fill_sz: String,
    #[serde(rename = "uTime")]
    pub u_time: String,
}

fn parse_f64(field: &str, value: &str) -> Result<f64, Error> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value.parse::<f64>().map_err(|_| Error::MissingField(field.to_string()))
}

pub fn from_okx_ticker(t: OkxTicker) -> Result<Ticker, Error> {
    Ok(Ticker {
        last: parse_f64("last", &t.last)?,
        bid: parse_f64("bidPx", &t.bid_px)?,
        ask: parse_f64("askPx", &t.ask_px)?,
        volume_24h: parse_f64("vol24h", &t.vol_24h)?,
        ts: t.ts.parse().unwrap_or(0),
    })
}

pub fn from_okx_depth(d: OkxDepth) -> Result<gateway_core::types::OrderBook, Error> {
    let level = |l: &OkxDepthLevel| -> Result<OrderBookLevel, Error> {
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

/// OKX candlesticks: `[ts, open, high, low, close, vol, volCcy, volCcyQuote, confirm]`.
pub fn from_okx_candle(row: &[String]) -> Result<Candle, Error> {
    let get = |i: usize| -> Result<f64, Error> {
        row.get(i).ok_or_else(|| Error::MissingField(format!("candle[{i}]")))?.parse().map_err(|_| Error::MissingField(format!("candle[{i}]")))
    };
    let is_final = row.get(8).map(|c| c == "1").unwrap_or(true);
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

pub fn from_okx_balance(b: OkxBalance) -> Result<Balance, Error> {
    let usdt = b
        .details
        .iter()
        .find(|d| d.ccy == "USDT")
        .ok_or_else(|| Error::MissingField("USDT balance".to_string()))?;
    Ok(Balance {
        asset: "USDT",
        total: parse_f64("eq", &usdt.eq)?,
        available: parse_f64("availEq", &usdt.avail_eq)?,
    })
}

pub fn from_okx_position(p: OkxPosition) -> Result<Option<PositionSnapshot>, Error> {
    let amount = parse_f64("pos", &p.pos)?;
    if amount == 0.0 {
        return Ok(None);
    }
    let side = match p.pos_side.as_str() {
        "long" => PositionSide::Long,
        "short" => PositionSide::Short,
        _ => {
            if amount > 0.0 {
                PositionSide::Long
            } else {
                PositionSide::Short
            }
        }
    };
    Ok(Some(PositionSnapshot {
        side,
        amount: amount.abs(),
        entry_price: parse_f64("avgPx", &p.avg_px)?,
        leverage: parse_f64("lever", &p.lever)?,
        unrealized_pnl: parse_f64("upl", &p.upl)?,
    }))
}

pub fn from_okx_order_state(s: &str) -> OrderStatus {
    match s {
        "live" => OrderStatus::New,
        "partially_filled" => OrderStatus::PartiallyFilled,
        "filled" => OrderStatus::Filled,
        "canceled" => OrderStatus::Canceled,
        _ => OrderStatus::New,
    }
}

pub fn from_okx_order(o: OkxOrder, fee: f64, liquidity: gateway_core::types::Liquidity) -> Result<OrderResult, Error> {
    use chrono::TimeZone;
    Ok(OrderResult {
        id: o.ord_id,
        status: from_okx_order_state(&o.state),
        filled_qty: parse_f64("accFillSz", &o.acc_fill_sz)?,
        avg_fill_price: parse_f64("avgPx", &o.avg_px)?,
        fee,
        liquidity,
        created_at: chrono::Utc
            .timestamp_millis_opt(o.u_time.parse().unwrap_or(0))
            .single()
            .unwrap_or_default(),
    })
}

pub fn to_okx_side(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "buy",
        OrderSide::Sell => "sell",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_nonzero_code_is_an_error() {
        let env: OkxEnvelope<OkxTicker> = OkxEnvelope {
            code: "51000".to_string(),
            msg: "parameter error".to_string(),
            data: vec![],
        };
        assert!(env.into_first().is_err());
    }

    #[test]
    fn unknown_pos_side_falls_back_to_sign_of_pos() {
        let p = OkxPosition {
            pos: "-2".to_string(),
            pos_side: "net".to_string(),
            avg_px: "100".to_string(),
            lever: "5".to_string(),
            upl: "0".to_string(),
        };
        let snap = from_okx_position(p).unwrap().unwrap();
        assert_eq!(snap.side, PositionSide::Short);
    }
}
