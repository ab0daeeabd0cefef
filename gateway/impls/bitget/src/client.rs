//! REST client for Bitget USDT-M mix contracts. Requests are signed per Bitget's scheme:
//! base64(HMAC-SHA256(timestamp + method + requestPath + body)), sent as the `ACCESS-SIGN` header
//! alongside the API passphrase — unlike Binance, the signature rides in headers, not the query.
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use data_encoding::BASE64;
use gateway_core::credential::Credentials;
use gateway_core::error::{Error, Result};
use gateway_core::exchange::{Exchange, MarginMode, PositionMode};
use gateway_core::gateway::ExchangeGateway;
use gateway_core::types::{Balance, Candle, Liquidity, OrderBook, OrderResult, OrderSide, PositionSnapshot, Ticker};
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;

use crate::adapters::{
    from_bitget_account, from_bitget_candle, from_bitget_depth, from_bitget_order, from_bitget_position,
    from_bitget_ticker, to_bitget_side, BitgetAccount, BitgetDepth, BitgetEnvelope, BitgetOrder, BitgetPosition,
    BitgetTicker,
};

const LIVE_BASE_URL: &str = "https://api.bitget.com";
const PRODUCT_TYPE: &str = "umcbl";

#[derive(Debug)]
pub struct BitgetGateway {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    api_passphrase: String,
    connected: AtomicBool,
}

impl BitgetGateway {
    pub fn new(creds: &dyn Credentials) -> Result<Self> {
        if creds.exchange() != Exchange::Bitget {
            return Err(Error::InvalidConfigType {
                expected: Exchange::Bitget,
                find: creds.exchange(),
            });
        }
        Ok(Self {
            client: Client::new(),
            base_url: LIVE_BASE_URL.to_string(),
            api_key: creds.get("api_key").ok_or_else(|| Error::MissingField("api_key".to_string()))?,
            api_secret: creds.get("api_secret").ok_or_else(|| Error::MissingField("api_secret".to_string()))?,
            api_passphrase: creds.get("api_password").ok_or_else(|| Error::MissingField("api_password".to_string()))?,
            connected: AtomicBool::new(false),
        })
    }

    fn timestamp_ms() -> String {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis().to_string()
    }

    fn sign(&self, prehash: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.api_secret.as_bytes()).expect("hmac accepts any key length");
        mac.update(prehash.as_bytes());
        BASE64.encode(&mac.finalize().into_bytes())
    }

    async fn get_public<T: serde::de::DeserializeOwned>(&self, path: &str, query: &str) -> Result<T> {
        let url = if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        };
        let response = self.client.get(&url).send().await?;
        self.handle_envelope(response).await
    }

    async fn signed_request<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &str,
        body: &str,
    ) -> Result<T> {
        let timestamp = Self::timestamp_ms();
        let request_path = if query.is_empty() { path.to_string() } else { format!("{path}?{query}") };
        let prehash = format!("{}{}{}{}", timestamp, method.as_str(), request_path, body);
        let signature = self.sign(&prehash);
        let url = format!("{}{}", self.base_url, request_path);
        let mut req = self
            .client
            .request(method, &url)
            .header("ACCESS-KEY", &self.api_key)
            .header("ACCESS-SIGN", signature)
            .header("ACCESS-TIMESTAMP", timestamp)
            .header("ACCESS-PASSPHRASE", &self.api_passphrase)
            .header("Content-Type", "application/json");
        if !body.is_empty() {
            req = req.body(body.to_string());
        }
        let response = req.send().await?;
        self.handle_envelope(response).await
    }

    async fn handle_envelope<T: serde::de::DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimit(Exchange::Bitget));
        }
        let envelope: BitgetEnvelope<T> = serde_json::from_str(&body).map_err(Error::from)?;
        envelope.into_data()
    }
}

#[async_trait]
impl ExchangeGateway for BitgetGateway {
    async fn connect(&self) -> Result<()> {
        let _: serde_json::Value = self.get_public("/api/spot/v1/public/time", "").await?;
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool { self.connected.load(Ordering::SeqCst) }

    async fn get_ticker(&self, symbol: &str) -> Result<Ticker> {
        let raw: BitgetTicker = self.get_public("/api/mix/v1/market/ticker", &format!("symbol={symbol}")).await?;
        from_bitget_ticker(raw)
    }

    async fn get_candles(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<Candle>> {
        let query = format!("symbol={symbol}&granularity={timeframe}&limit={limit}");
        let rows: Vec<Vec<String>> = self.get_public("/api/mix/v1/market/candles", &query).await?;
        let last_idx = rows.len().saturating_sub(1);
        rows.iter().enumerate().map(|(i, row)| from_bitget_candle(row, i != last_idx)).collect()
    }

    async fn get_orderbook(&self, symbol: &str, depth: usize) -> Result<OrderBook> {
        let query = format!("symbol={symbol}&limit={depth}");
        let raw: BitgetDepth = self.get_public("/api/mix/v1/market/depth", &query).await?;
        from_bitget_depth(raw)
    }

    async fn get_balance(&self) -> Result<Balance> {
        let query = format!("productType={PRODUCT_TYPE}");
        let accounts: Vec<BitgetAccount> =
            self.signed_request(reqwest::Method::GET, "/api/mix/v1/account/accounts", &query, "").await?;
        let usdt = accounts
            .iter()
            .find(|a| a.margin_coin == "USDT")
            .ok_or_else(|| Error::MissingField("USDT account".to_string()))?;
        from_bitget_account(usdt)
    }

    async fn get_positions(&self, symbol: &str) -> Result<Vec<PositionSnapshot>> {
        let query = format!("symbol={symbol}&marginCoin=USDT");
        let raw: Vec<BitgetPosition> =
            self.signed_request(reqwest::Method::GET, "/api/mix/v1/position/singlePosition", &query, "").await?;
        raw.into_iter().filter_map(|p| from_bitget_position(p).transpose()).collect()
    }

    async fn create_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: f64,
        reduce_only: bool,
    ) -> Result<OrderResult> {
        let body = serde_json::json!({
            "symbol": symbol,
            "marginCoin": "USDT",
            "side": to_bitget_side(side),
            "orderType": "market",
            "size": amount.to_string(),
            "reduceOnly": reduce_only,
        })
        .to_string();
        let raw: BitgetOrder = self.signed_request(reqwest::Method::POST, "/api/mix/v1/order/placeOrder", "", &body).await?;
        let ticker = self.get_ticker(symbol).await?;
        from_bitget_order(raw, amount * ticker.last * Exchange::Bitget.default_taker_fee(), Liquidity::Taker)
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
        let body = serde_json::json!({
            "symbol": symbol,
            "marginCoin": "USDT",
            "side": to_bitget_side(side),
            "orderType": "limit",
            "price": price.to_string(),
            "size": amount.to_string(),
            "timeInForceValue": if post_only { "post_only" } else { "normal" },
            "reduceOnly": reduce_only,
        })
        .to_string();
        let raw: BitgetOrder = self.signed_request(reqwest::Method::POST, "/api/mix/v1/order/placeOrder", "", &body).await?;
        from_bitget_order(raw, amount * price * Exchange::Bitget.default_taker_fee() / 2.0, Liquidity::Maker)
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<bool> {
        let body = serde_json::json!({ "symbol": symbol, "marginCoin": "USDT", "orderId": id }).to_string();
        let _: serde_json::Value =
            self.signed_request(reqwest::Method::POST, "/api/mix/v1/order/cancel-order", "", &body).await?;
        Ok(true)
    }

    async fn get_order(&self, id: &str, symbol: &str) -> Result<OrderResult> {
        let query = format!("symbol={symbol}&orderId={id}");
        let raw: BitgetOrder = self.signed_request(reqwest::Method::GET, "/api/mix/v1/order/detail", &query, "").await?;
        from_bitget_order(raw, 0.0, Liquidity::Taker)
    }

    async fn set_leverage(&self, symbol: &str, leverage: f64) -> Result<()> {
        let body =
            serde_json::json!({ "symbol": symbol, "marginCoin": "USDT", "leverage": format!("{}", leverage as i64) })
                .to_string();
        let _: serde_json::Value =
            self.signed_request(reqwest::Method::POST, "/api/mix/v1/account/setLeverage", "", &body).await?;
        Ok(())
    }

    async fn set_margin_mode(&self, symbol: &str, mode: MarginMode) -> Result<()> {
        let margin_mode = match mode {
            MarginMode::Cross => "crossed",
            MarginMode::Isolated => "fixed",
        };
        let body = serde_json::json!({ "symbol": symbol, "marginCoin": "USDT", "marginMode": margin_mode }).to_string();
        let _: serde_json::Value =
            self.signed_request(reqwest::Method::POST, "/api/mix/v1/account/setMarginMode", "", &body).await?;
        Ok(())
    }

    async fn set_position_mode(&self, mode: PositionMode) -> Result<()> {
        let hold_mode = match mode {
            PositionMode::OneWay => "single_hold",
            PositionMode::Hedge => "double_hold",
        };
        let body = serde_json::json!({ "productType": PRODUCT_TYPE, "holdMode": hold_mode }).to_string();
        let _: serde_json::Value =
            self.signed_request(reqwest::Method::POST, "/api/mix/v1/account/setPositionMode", "", &body).await?;
        Ok(())
    }

    fn exchange(&self) -> Exchange { Exchange::Bitget }
}
