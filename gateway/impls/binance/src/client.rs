//! REST client for Binance USDT-M perpetual futures, signing requests the way the exchange
//! expects: HMAC-SHA256 over the sorted query string, hex-encoded into the `signature` param.
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use data_encoding::HEXLOWER;
use gateway_core::credential::Credentials;
use gateway_core::error::{Error, Result};
use gateway_core::exchange::{Exchange, MarginMode, PositionMode};
use gateway_core::gateway::ExchangeGateway;
use gateway_core::types::{Balance, Candle, OrderBook, OrderResult, OrderSide, PositionSnapshot, Ticker};
use hmac::{Hmac, Mac};
use reqwest::{Client, Method};
use sha2::Sha256;

use crate::adapters::{
    from_binance_balance, from_binance_depth, from_binance_kline, from_binance_order, from_binance_position,
    from_binance_ticker, to_binance_side, BinanceBalanceEntry, BinanceDepth, BinanceOrder, BinancePositionRisk,
    BinanceTicker,
};

const LIVE_BASE_URL: &str = "https://fapi.binance.com";
const TEST_BASE_URL: &str = "https://testnet.binancefuture.com";

#[derive(Debug)]
pub struct BinanceGateway {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    connected: AtomicBool,
}

impl BinanceGateway {
    pub fn new(creds: &dyn Credentials, use_testnet: bool) -> Result<Self> {
        if creds.exchange() != Exchange::Binance {
            return Err(Error::InvalidConfigType {
                expected: Exchange::Binance,
                find: creds.exchange(),
            });
        }
        let api_key = creds.get("api_key").ok_or_else(|| Error::MissingField("api_key".to_string()))?;
        let api_secret = creds.get("api_secret").ok_or_else(|| Error::MissingField("api_secret".to_string()))?;
        Ok(Self {
            client: Client::new(),
            base_url: if use_testnet { TEST_BASE_URL } else { LIVE_BASE_URL }.to_string(),
            api_key,
            api_secret,
            connected: AtomicBool::new(false),
        })
    }

    fn timestamp_ms() -> i64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as i64
    }

    fn sign(&self, query: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.api_secret.as_bytes()).expect("hmac accepts any key length");
        mac.update(query.as_bytes());
        HEXLOWER.encode(&mac.finalize().into_bytes())
    }

    async fn signed_request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<T> {
        params.push(("timestamp".to_string(), Self::timestamp_ms().to_string()));
        let query = params.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");
        let signature = self.sign(&query);
        let url = format!("{}{}?{}&signature={}", self.base_url, path, query, signature);
        let response = self
            .client
            .request(method, &url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn public_request<T: serde::de::DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(params).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimit(Exchange::Binance));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::AuthFailure(Exchange::Binance, body));
        }
        if !status.is_success() {
            return Err(Error::ExchangeError(body));
        }
        serde_json::from_str(&body).map_err(Error::from)
    }
}

#[async_trait]
impl ExchangeGateway for BinanceGateway {
    async fn connect(&self) -> Result<()> {
        let _: serde_json::Value = self.public_request("/fapi/v1/ping", &[]).await?;
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool { self.connected.load(Ordering::SeqCst) }

    async fn get_ticker(&self, symbol: &str) -> Result<Ticker> {
        let raw: BinanceTicker = self
            .public_request("/fapi/v1/ticker/24hr", &[("symbol", symbol.to_string())])
            .await?;
        from_binance_ticker(raw)
    }

    async fn get_candles(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<Candle>> {
        let rows: Vec<Vec<serde_json::Value>> = self
            .public_request(
                "/fapi/v1/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", timeframe.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        let last_idx = rows.len().saturating_sub(1);
        rows.iter()
            .enumerate()
            .map(|(i, row)| from_binance_kline(row, i != last_idx))
            .collect()
    }

    async fn get_orderbook(&self, symbol: &str, depth: usize) -> Result<OrderBook> {
        let raw: BinanceDepth = self
            .public_request(
                "/fapi/v1/depth",
                &[("symbol", symbol.to_string()), ("limit", depth.to_string())],
            )
            .await?;
        from_binance_depth(raw)
    }

    async fn get_balance(&self) -> Result<Balance> {
        let entries: Vec<BinanceBalanceEntry> = self.signed_request(Method::GET, "/fapi/v2/balance", vec![]).await?;
        let usdt = entries
            .iter()
            .find(|b| b.asset == "USDT")
            .ok_or_else(|| Error::MissingField("USDT balance".to_string()))?;
        from_binance_balance(usdt)
    }

    async fn get_positions(&self, symbol: &str) -> Result<Vec<PositionSnapshot>> {
        let params = vec![("symbol".to_string(), symbol.to_string())];
        let raw: Vec<BinancePositionRisk> = self.signed_request(Method::GET, "/fapi/v2/positionRisk", params).await?;
        raw.into_iter().filter_map(|p| from_binance_position(p).transpose()).collect()
    }

    async fn create_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: f64,
        reduce_only: bool,
    ) -> Result<OrderResult> {
        let params = vec![
            ("symbol".to_string(), symbol.to_string()),
            ("side".to_string(), to_binance_side(side).to_string()),
            ("type".to_string(), "MARKET".to_string()),
            ("quantity".to_string(), amount.to_string()),
            ("reduceOnly".to_string(), reduce_only.to_string()),
        ];
        let raw: BinanceOrder = self.signed_request(Method::POST, "/fapi/v1/order", params).await?;
        from_binance_order(raw, amount * self.get_ticker(symbol).await?.last * Exchange::Binance.default_taker_fee(), gateway_core::types::Liquidity::Taker)
    }

    async fn create_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: f64,
        price: f64,
        reduce_only: bool,
        post_only: bool,
    ) -> Result<OrderResult> {
        let params = vec![
            ("symbol".to_string(), symbol.to_string()),
            ("side".to_string(), to_binance_side(side).to_string()),
            ("type".to_string(), "LIMIT".to_string()),
            ("quantity".to_string(), amount.to_string()),
            ("price".to_string(), price.to_string()),
            ("timeInForce".to_string(), if post_only { "GTX".to_string() } else { "GTC".to_string() }),
            ("reduceOnly".to_string(), reduce_only.to_string()),
        ];
        let raw: BinanceOrder = self.signed_request(Method::POST, "/fapi/v1/order", params).await?;
        from_binance_order(raw, amount * price * Exchange::Binance.default_taker_fee() / 2.0, gateway_core::types::Liquidity::Maker)
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<bool> {
        let params = vec![("symbol".to_string(), symbol.to_string()), ("orderId".to_string(), id.to_string())];
        let _: BinanceOrder = self.signed_request(Method::DELETE, "/fapi/v1/order", params).await?;
        Ok(true)
    }

    async fn get_order(&self, id: &str, symbol: &str) -> Result<OrderResult> {
        let params = vec![("symbol".to_string(), symbol.to_string()), ("orderId".to_string(), id.to_string())];
        let raw: BinanceOrder = self.signed_request(Method::GET, "/fapi/v1/order", params).await?;
        from_binance_order(raw, 0.0, gateway_core::types::Liquidity::Taker)
    }

    async fn set_leverage(&self, symbol: &str, leverage: f64) -> Result<()> {
        let params = vec![
            ("symbol".to_string(), symbol.to_string()),
            ("leverage".to_string(), format!("{}", leverage as i64)),
        ];
        let _: serde_json::Value = self.signed_request(Method::POST, "/fapi/v1/leverage", params).await?;
        Ok(())
    }

    async fn set_margin_mode(&self, symbol: &str, mode: MarginMode) -> Result<()> {
        let margin_type = match mode {
            MarginMode::Cross => "CROSSED",
            MarginMode::Isolated => "ISOLATED",
        };
        let params = vec![("symbol".to_string(), symbol.to_string()), ("marginType".to_string(), margin_type.to_string())];
        let _: serde_json::Value = self.signed_request(Method::POST, "/fapi/v1/marginType", params).await?;
        Ok(())
    }

    async fn set_position_mode(&self, mode: PositionMode) -> Result<()> {
        let dual = matches!(mode, PositionMode::Hedge);
        let params = vec![("dualSidePosition".to_string(), dual.to_string())];
        let _: serde_json::Value = self.signed_request(Method::POST, "/fapi/v1/positionSide/dual", params).await?;
        Ok(())
    }

    fn exchange(&self) -> Exchange { Exchange::Binance }
}
