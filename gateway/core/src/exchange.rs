#[derive(
    Debug, Display, PartialEq, Clone, Copy, Eq, Hash, Deserialize, Serialize, PartialOrd, Ord, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Exchange {
    #[strum(serialize = "binance")]
    Binance,
    #[strum(serialize = "bitget")]
    Bitget,
    #[strum(serialize = "okx")]
    Okx,
}

impl Exchange {
    #[must_use]
    pub fn default_taker_fee(&self) -> f64 {
        match self {
            Self::Binance => 0.0004,
            Self::Bitget => 0.0006,
            Self::Okx => 0.0005,
        }
    }

    #[must_use]
    pub fn capitalized(&self) -> String {
        let mut c = self.as_ref().chars();
        match c.next() {
            None => String::new(),
            Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
        }
    }
}

impl Default for Exchange {
    fn default() -> Self { Self::Binance }
}

/// Cross margin shares collateral across all positions, isolated margin walls it off per position.
#[derive(Debug, Display, PartialEq, Clone, Copy, Eq, Hash, Deserialize, Serialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum MarginMode {
    #[strum(serialize = "cross")]
    Cross,
    #[strum(serialize = "isolated")]
    Isolated,
}

/// One-way mode allows a single net position per symbol; hedge mode allows independent long and
/// short positions to coexist, required by `band_limited_hedging`.
#[derive(Debug, Display, PartialEq, Clone, Copy, Eq, Hash, Deserialize, Serialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    #[strum(serialize = "one_way")]
    OneWay,
    #[strum(serialize = "hedge")]
    Hedge,
}
