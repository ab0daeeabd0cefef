use std::fmt::Debug;

use crate::error::Result;
use crate::exchange::{Exchange, MarginMode, PositionMode};
use crate::types::*;

/// Uniform contract the trading core consumes over any exchange backend (§4.6). Differences in
/// position-mode keywords, reduce/close flags and symbol formats are hidden inside adapters —
/// nothing upstream of this trait should know which exchange it is talking to.
#[async_trait]
pub trait ExchangeGateway: Debug + Send + Sync {
    async fn connect(&self) -> Result<()>;
    async fn disconnect(&self) -> Result<()>;
    fn is_connected(&self) -> bool;

    async fn get_ticker(&self, symbol: &str) -> Result<Ticker>;
    async fn get_candles(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<Candle>>;
    async fn get_orderbook(&self, symbol: &str, depth: usize) -> Result<OrderBook>;
    async fn get_balance(&self) -> Result<Balance>;
    async fn get_positions(&self, symbol: &str) -> Result<Vec<PositionSnapshot>>;

    async fn create_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: f64,
        reduce_only: bool,
    ) -> Result<OrderResult>;

    async fn create_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: f64,
        price: f64,
        reduce_only: bool,
        post_only: bool,
    ) -> Result<OrderResult>;

    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<bool>;
    async fn get_order(&self, id: &str, symbol: &str) -> Result<OrderResult>;

    async fn set_leverage(&self, symbol: &str, leverage: f64) -> Result<()>;
    async fn set_margin_mode(&self, symbol: &str, mode: MarginMode) -> Result<()>;
    async fn set_position_mode(&self, mode: PositionMode) -> Result<()>;

    fn exchange(&self) -> Exchange;
}

pub mod mock {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    /// In-memory gateway used by tests and by the strategy/risk crates' own test suites. Mirrors
    /// the shape of the teacher's `MockExchangeApi`: canned responses, no network I/O.
    #[derive(Debug)]
    pub struct MockGateway {
        pub exchange: Exchange,
        connected: AtomicBool,
        pub ticker: Mutex<Ticker>,
        pub candles: Mutex<Vec<Candle>>,
        pub balance: Mutex<Balance>,
        pub positions: Mutex<Vec<PositionSnapshot>>,
        pub next_order_status: Mutex<OrderStatus>,
        pub orderbook: Mutex<OrderBook>,
    }

    impl MockGateway {
        #[must_use]
        pub fn new(exchange: Exchange) -> Self {
            Self {
                exchange,
                connected: AtomicBool::new(false),
                ticker: Mutex::new(Ticker {
                    last: 100.0,
                    bid: 99.9,
                    ask: 100.1,
                    volume_24h: 1_000_000.0,
                    ts: Utc::now().timestamp_millis(),
                }),
                candles: Mutex::new(Vec::new()),
                balance: Mutex::new(Balance {
                    asset: "USDT",
                    total: 10_000.0,
                    available: 10_000.0,
                }),
                positions: Mutex::new(Vec::new()),
                next_order_status: Mutex::new(OrderStatus::Filled),
                orderbook: Mutex::new(OrderBook {
                    ts: Utc::now().timestamp_millis(),
                    bids: vec![],
                    asks: vec![],
                }),
            }
        }
    }

    #[async_trait]
    impl ExchangeGateway for MockGateway {
        async fn connect(&self) -> Result<()> {
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn disconnect(&self) -> Result<()> {
            self.connected.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn is_connected(&self) -> bool { self.connected.load(Ordering::SeqCst) }

        async fn get_ticker(&self, _symbol: &str) -> Result<Ticker> { Ok(*self.ticker.lock().unwrap()) }

        async fn get_candles(&self, _symbol: &str, _timeframe: &str, limit: usize) -> Result<Vec<Candle>> {
            let candles = self.candles.lock().unwrap();
            Ok(candles.iter().rev().take(limit).rev().copied().collect())
        }

        async fn get_orderbook(&self, _symbol: &str, depth: usize) -> Result<OrderBook> {
            let book = self.orderbook.lock().unwrap();
            Ok(OrderBook {
                ts: book.ts,
                bids: book.bids.iter().take(depth).cloned().collect(),
                asks: book.asks.iter().take(depth).cloned().collect(),
            })
        }

        async fn get_balance(&self) -> Result<Balance> { Ok(*self.balance.lock().unwrap()) }

        async fn get_positions(&self, _symbol: &str) -> Result<Vec<PositionSnapshot>> {
            Ok(self.positions.lock().unwrap().clone())
        }

        async fn create_market_order(
            &self,
            _symbol: &str,
            _side: OrderSide,
            amount: f64,
            _reduce_only: bool,
        ) -> Result<OrderResult> {
            let status = *self.next_order_status.lock().unwrap();
            let price = self.ticker.lock().unwrap().last;
            Ok(OrderResult {
                id: uuid::Uuid::new_v4().to_string(),
                status,
                filled_qty: if status.is_filled() { amount } else { 0.0 },
                avg_fill_price: price,
                fee: amount * price * self.exchange.default_taker_fee(),
                liquidity: Liquidity::Taker,
                created_at: Utc::now(),
            })
        }

        async fn create_limit_order(
            &self,
            _symbol: &str,
            _side: OrderSide,
            amount: f64,
            price: f64,
            _reduce_only: bool,
            _post_only: bool,
        ) -> Result<OrderResult> {
            let status = *self.next_order_status.lock().unwrap();
            Ok(OrderResult {
                id: uuid::Uuid::new_v4().to_string(),
                status,
                filled_qty: if status.is_filled() { amount } else { 0.0 },
                avg_fill_price: price,
                fee: amount * price * self.exchange.default_taker_fee() / 2.0,
                liquidity: Liquidity::Maker,
                created_at: Utc::now(),
            })
        }

        async fn cancel_order(&self, _id: &str, _symbol: &str) -> Result<bool> { Ok(true) }

        async fn get_order(&self, id: &str, _symbol: &str) -> Result<OrderResult> {
            Ok(OrderResult {
                id: id.to_string(),
                status: *self.next_order_status.lock().unwrap(),
                filled_qty: 0.0,
                avg_fill_price: 0.0,
                fee: 0.0,
                liquidity: Liquidity::Taker,
                created_at: Utc::now(),
            })
        }

        async fn set_leverage(&self, _symbol: &str, _leverage: f64) -> Result<()> { Ok(()) }

        async fn set_margin_mode(&self, _symbol: &str, _mode: MarginMode) -> Result<()> { Ok(()) }

        async fn set_position_mode(&self, _mode: PositionMode) -> Result<()> { Ok(()) }

        fn exchange(&self) -> Exchange { self.exchange }
    }
}
