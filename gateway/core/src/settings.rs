use crate::exchange::{Exchange, MarginMode, PositionMode};

/// Per-exchange configuration group (§6). Credentials are loaded by the embedding application;
/// this struct only carries what the gateway needs to behave correctly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub exchange: Exchange,
    pub symbol: String,
    pub timeframe: String,
    pub leverage: f64,
    pub margin_mode: MarginMode,
    pub position_mode: PositionMode,
    pub maker_fee: f64,
    pub taker_fee: f64,
}

impl ExchangeConfig {
    /// Validation failures here are fatal at startup (§9 design note on config validation).
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.is_empty() {
            return Err("exchange.symbol must not be empty".to_string());
        }
        if self.leverage <= 0.0 || self.leverage > 125.0 {
            return Err(format!("exchange.leverage {} out of range (0, 125]", self.leverage));
        }
        if self.maker_fee < 0.0 || self.taker_fee < 0.0 {
            return Err("exchange fees must not be negative".to_string());
        }
        Ok(())
    }
}
