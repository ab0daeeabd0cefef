//! REST client for OKX USDT-margined perpetual swaps. Signing mirrors Bitget's scheme with one
//! difference OKX insists on: the timestamp must be an ISO-8601 string with millisecond
//! precision, not a raw epoch integer.
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
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
    from_okx_balance, from_okx_candle, from_okx_depth, from_okx_order, from_okx_position, from_okx_ticker,
    to_okx_side, OkxBalance, OkxDepth, OkxEnvelope, OkxOrder, OkxPosition, OkxTicker,
};

const LIVE_BASE_URL: &str = "https://www.okx.com";

#[derive(Debug)]
pub struct OkxGateway {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    api_passphrase: String,
    connected: AtomicBool,
}

impl OkxGateway {
    pub fn new(creds: &dyn Credentials) -> Result<Self> {
        if creds.exchange() != Exchange::Okx {
            return Err(Error::InvalidConfigType {
                expected: Exchange::Okx,
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

    fn iso_timestamp() -> String { Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string() }

    fn sign(&self, prehash: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.api_secret.as_bytes()).expect("hmac accepts any key length");
        mac.update(prehash.as_bytes());
        BASE64.encode(&mac.finalize().into_bytes())
    }

    async fn get_public<T: serde::de::DeserializeOwned>(&self, path: &str, query: &str) -> Result<OkxEnvelope<T>> {
        let url = if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        };
        let response = self.client.get(&url).send().await?;
        self.parse_envelope(response).await
    }

    async fn signed_request<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &str,
        body: &str,
    ) -> Result<OkxEnvelope<T>> {
        let timestamp = Self::iso_timestamp();
        let request_path = if query.is_empty() { path.to_string() } else { format!("{path}?{query}") };
        let prehash = format!("{}{}{}{}", timestamp, method.as_str(), request_path, body);
        let signature = self.sign(&prehash);
        let url = format!("{}{}", self.base_url, request_path);
        let mut req = self
            .client
            .request(method, &url)
            .header("OK-ACCESS-KEY", &self.api_key)
            .header("OK-ACCESS-SIGN", signature)
            .header("OK-ACCESS-TIMESTAMP", timestamp)
            .header("OK-ACCESS-PASSPHRASE", &self.api_passphrase)
            .header("Content-Type", "application/json");
        if !body.is_empty() {
            req = req.body(body.to_string());
        }
        let response = req.send().await?;
        self.parse_envelope(response).await
    }

    async fn parse_envelope<T: serde::de::DeserializeOwned>(&self, response: reqwest::Response) -> Result<OkxEnvelope<T>> {
        let status = response.status();
        let body = response.text().await?;
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimit(Exchange::Okx));
        }
        serde_json::from_str(&body).map_err(Error::from)
    }
}

#[async_trait]
impl ExchangeGateway for OkxGateway {
    async fn connect(&self) -> Result<()> {
        let _: OkxEnvelope<serde_json::Value> = self.get_public("/api/v5/public/time", "").await?;
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool { self.connected.load(Ordering::SeqCst) }

    async fn get_ticker(&self, symbol: &str) -> Result<Ticker> {
        let env: OkxEnvelope<OkxTicker> = self.get_public("/api/v5/market/ticker", &format!("instId={symbol}")).await?;
        from_okx_ticker(env.into_first()?)
    }

    async fn get_candles(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<Candle>> {
        let query = format!("instId={symbol}&bar={timeframe}&limit={limit}");
        let env: OkxEnvelope<Vec<String>> = self.get_public("/api/v5/market/candles", &query).await?;
        let mut candles: Vec<Candle> = env.into_vec()?.iter().map(|row| from_okx_candle(row)).collect::<Result<_>>()?;
        // OKX returns newest-first; the core expects oldest-first like the other adapters.
        candles.reverse();
        Ok(candles)
    }

    async fn get_orderbook(&self, symbol: &str, depth: usize) -> Result<OrderBook> {
        let query = format!("instId={symbol}&sz={depth}");
        let env: OkxEnvelope<OkxDepth> = self.get_public("/api/v5/market/books", &query).await?;
        from_okx_depth(env.into_first()?)
    }

    async fn get_balance(&self) -> Result<Balance> {
        let env: OkxEnvelope<OkxBalance> =
            self.signed_request(reqwest::Method::GET, "/api/v5/account/balance", "ccy=USDT", "").await?;
        from_okx_balance(env.into_first()?)
    }

    async fn get_positions(&self, symbol: &str) -> Result<Vec<PositionSnapshot>> {
        let query = format!("instId={symbol}");
        let env: OkxEnvelope<OkxPosition> =
            self.signed_request(reqwest::Method::GET, "/api/v5/account/positions", &query, "").await?;
        env.into_vec()?.into_iter().filter_map(|p| from_okx_position(p).transpose()).collect()
    }

    async fn create_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: f64,
        reduce_only: bool,
    ) -> Result<OrderResult> {
        let body = serde_json::json!({
            "instId": symbol,
            "tdMode": "cross",
            "side": to_okx_side(side),
            "ordType": "market",
            "sz": amount.to_string(),
            "reduceOnly": reduce_only,
        })
        .to_string();
        let env: OkxEnvelope<OkxOrder> = self.signed_request(reqwest::Method::POST, "/api/v5/trade/order", "", &body).await?;
        let ticker = self.get_ticker(symbol).await?;
        from_okx_order(env.into_first()?, amount * ticker.last * Exchange::Okx.default_taker_fee(), Liquidity::Taker)
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
            "instId": symbol,
            "tdMode": "cross",
            "side": to_okx_side(side),
            "ordType": if post_only { "post_only" } else { "limit" },
            "px": price.to_string(),
            "sz": amount.to_string(),
            "reduceOnly": reduce_only,
        })
        .to_string();
        let env: OkxEnvelope<OkxOrder> = self.signed_request(reqwest::Method::POST, "/api/v5/trade/order", "", &body).await?;
        from_okx_order(env.into_first()?, amount * price * Exchange::Okx.default_taker_fee() / 2.0, Liquidity::Maker)
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<bool> {
        let body = serde_json::json!({ "instId": symbol, "ordId": id }).to_string();
        let _: OkxEnvelope<serde_json::Value> =
            self.signed_request(reqwest::Method::POST, "/api/v5/trade/cancel-order", "", &body).await?;
        Ok(true)
    }

    async fn get_order(&self, id: &str, symbol: &str) -> Result<OrderResult> {
        let query = format!("instId={symbol}&ordId={id}");
        let env: OkxEnvelope<OkxOrder> =
            self.signed_request(reqwest::Method::GET, "/api/v5/trade/order", &query, "").await?;
        from_okx_order(env.into_first()?, 0.0, Liquidity::Taker)
    }

    async fn set_leverage(&self, symbol: &str, leverage: f64) -> Result<()> {
        let body = serde_json::json!({
            "instId": symbol,
            "lever": format!("{}", leverage as i64),
            "mgnMode": "cross",
        })
        .to_string();
        let _: OkxEnvelope<serde_json::Value> =
            self.signed_request(reqwest::Method::POST, "/api/v5/account/set-leverage", "", &body).await?;
        Ok(())
    }

    async fn set_margin_mode(&self, symbol: &str, mode: MarginMode) -> Result<()> {
        let margin_mode = match mode {
            MarginMode::Cross => "cross",
            MarginMode::Isolated => "isolated",
        };
        let body = serde_json::json!({ "instId": symbol, "lever": "1", "mgnMode": margin_mode }).to_string();
        let _: OkxEnvelope<serde_json::Value> =
            self.signed_request(reqwest::Method::POST, "/api/v5/account/set-leverage", "", &body).await?;
        Ok(())
    }

    async fn set_position_mode(&self, mode: PositionMode) -> Result<()> {
        let pos_mode = match mode {
            PositionMode::OneWay => "net_mode",
            PositionMode::Hedge => "long_short_mode",
        };
        let body = serde_json::json!({ "posMode": pos_mode }).to_string();
        let _: OkxEnvelope<serde_json::Value> =
            self.signed_request(reqwest::Method::POST, "/api/v5/account/set-position-mode", "", &body).await?;
        Ok(())
    }

    fn exchange(&self) -> Exchange { Exchange::Okx }
}
