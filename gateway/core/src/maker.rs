//! Smart order placement (§4.6): try to earn the maker fee rebate with a limit order offset
//! inside the spread, falling back to a market order if it doesn't fill in time.
use std::time::Duration;

use tokio::time::sleep;

use crate::error::Result;
use crate::gateway::ExchangeGateway;
use crate::types::{Liquidity, OrderResult, OrderSide, Ticker};

#[derive(Debug, Clone, Copy)]
pub struct MakerConfig {
    pub enabled: bool,
    pub offset_pct: f64,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub auto_fallback: bool,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            offset_pct: 0.0001,
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
            auto_fallback: true,
        }
    }
}

/// Places a limit order offset below the ask (buys) or above the bid (sells), polls until it
/// fills or `maker_timeout` elapses, then cancels and falls back to a market order. Halves the
/// effective fee rate fed into position sizing when the maker leg actually fills.
pub async fn place_smart_order(
    gateway: &dyn ExchangeGateway,
    symbol: &str,
    side: OrderSide,
    amount: f64,
    reduce_only: bool,
    ticker: Ticker,
    config: MakerConfig,
) -> Result<OrderResult> {
    if !config.enabled {
        return gateway.create_market_order(symbol, side, amount, reduce_only).await;
    }

    let price = maker_price(side, ticker, config.offset_pct);
    let order = gateway
        .create_limit_order(symbol, side, amount, price, reduce_only, true)
        .await?;
    if order.status.is_filled() {
        return Ok(order);
    }

    let deadline = tokio::time::Instant::now() + config.timeout;
    let mut current = order;
    loop {
        if current.status.is_filled() || current.status.is_terminal() {
            return Ok(current);
        }
        if tokio::time::Instant::now() >= deadline {
            break;
        }
        sleep(config.poll_interval).await;
        current = gateway.get_order(&current.id, symbol).await?;
    }

    if !config.auto_fallback {
        return Ok(current);
    }
    gateway.cancel_order(&current.id, symbol).await?;
    gateway.create_market_order(symbol, side, amount, reduce_only).await
}

/// Offsets the quoted touch by `offset_pct`, rounding toward the opposite best touch when the
/// spread is tighter than the configured offset (the boundary behaviour in §8).
fn maker_price(side: OrderSide, ticker: Ticker, offset_pct: f64) -> f64 {
    match side {
        OrderSide::Buy => (ticker.ask * (1.0 - offset_pct)).max(ticker.bid),
        OrderSide::Sell => (ticker.bid * (1.0 + offset_pct)).min(ticker.ask),
    }
}

#[must_use]
pub fn effective_liquidity(result: &OrderResult) -> Liquidity { result.liquidity }

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(bid: f64, ask: f64) -> Ticker {
        Ticker {
            last: (bid + ask) / 2.0,
            bid,
            ask,
            volume_24h: 0.0,
            ts: 0,
        }
    }

    #[test]
    fn buy_offset_stays_below_ask_above_bid() {
        let price = maker_price(OrderSide::Buy, ticker(100.0, 100.2), 0.0001);
        assert!(price < 100.2);
        assert!(price >= 100.0);
    }

    #[test]
    fn tight_spread_rounds_to_best_opposite_touch() {
        // spread smaller than the offset: buy price would undercut the bid, so it clamps to it.
        let price = maker_price(OrderSide::Buy, ticker(100.0, 100.001), 0.01);
        assert_eq!(price, 100.0);
    }
}
