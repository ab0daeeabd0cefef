//! Execution-quality filter (spec §4.4 gate 4): spread, liquidity, price-stability and
//! volatility-spike checks. Any single failure rejects; the caller picks the first failing reason.
use gateway_core::types::{OrderBook, OrderSide, Ticker};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExecutionQualitySettings {
    pub max_spread_pct: f64,
    pub min_depth_usdt: f64,
    pub depth_multiplier: f64,
    pub stability_threshold_pct: f64,
    pub atr_spike_multiplier: f64,
    pub depth_levels: usize,
}

impl Default for ExecutionQualitySettings {
    fn default() -> Self {
        Self {
            max_spread_pct: 0.001,
            min_depth_usdt: 5_000.0,
            depth_multiplier: 3.0,
            stability_threshold_pct: 0.003,
            atr_spike_multiplier: 2.0,
            depth_levels: 5,
        }
    }
}

pub struct ExecutionQualityInputs<'a> {
    pub ticker: &'a Ticker,
    pub order_book: &'a OrderBook,
    pub order_side: OrderSide,
    pub order_size_usdt: f64,
    /// Tick prices already windowed to the configured `stability_window_s` by the caller.
    pub recent_tick_prices: &'a [f64],
    pub current_atr: f64,
    pub rolling_atr_mean: f64,
}

#[must_use]
pub fn evaluate(inputs: &ExecutionQualityInputs<'_>, settings: &ExecutionQualitySettings) -> Result<(), String> {
    let spread = inputs.ticker.spread_pct();
    if !(spread <= settings.max_spread_pct) {
        return Err(format!("spread {spread:.5} exceeds {:.5}", settings.max_spread_pct));
    }

    let opposite_side = inputs.order_side.opposite();
    let depth = inputs.order_book.top_depth(opposite_side, settings.depth_levels);
    let required = (inputs.order_size_usdt * settings.depth_multiplier).max(settings.min_depth_usdt);
    if depth < required {
        return Err(format!("opposite-side depth {depth:.2} below required {required:.2}"));
    }

    if inputs.recent_tick_prices.len() >= 2 {
        let max = inputs.recent_tick_prices.iter().copied().fold(f64::MIN, f64::max);
        let min = inputs.recent_tick_prices.iter().copied().fold(f64::MAX, f64::min);
        if min > 0.0 {
            let range_pct = (max - min) / min;
            if range_pct > settings.stability_threshold_pct {
                return Err(format!("price range {range_pct:.5} over the window exceeds {:.5}", settings.stability_threshold_pct));
            }
        }
    }

    if inputs.rolling_atr_mean > 0.0 {
        let spike_ratio = inputs.current_atr / inputs.rolling_atr_mean;
        if spike_ratio > settings.atr_spike_multiplier {
            return Err(format!("atr spike {spike_ratio:.2}x exceeds {:.2}x", settings.atr_spike_multiplier));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use gateway_core::types::OrderBookLevel;

    use super::*;

    fn ticker(bid: f64, ask: f64) -> Ticker { Ticker { last: (bid + ask) / 2.0, bid, ask, volume_24h: 0.0, ts: 0 } }

    fn book(bid_depth: f64, ask_depth: f64) -> OrderBook {
        OrderBook {
            ts: 0,
            bids: vec![OrderBookLevel { price: 100.0, qty: bid_depth / 100.0 }],
            asks: vec![OrderBookLevel { price: 100.0, qty: ask_depth / 100.0 }],
        }
    }

    #[test]
    fn wide_spread_rejects() {
        let t = ticker(99.0, 101.0);
        let b = book(10_000.0, 10_000.0);
        let inputs = ExecutionQualityInputs { ticker: &t, order_book: &b, order_side: OrderSide::Buy, order_size_usdt: 100.0, recent_tick_prices: &[], current_atr: 0.0, rolling_atr_mean: 0.0 };
        assert!(evaluate(&inputs, &ExecutionQualitySettings::default()).is_err());
    }

    #[test]
    fn thin_opposite_side_depth_rejects_a_buy() {
        let t = ticker(99.99, 100.0);
        let b = book(10_000.0, 10.0);
        let inputs = ExecutionQualityInputs { ticker: &t, order_book: &b, order_side: OrderSide::Buy, order_size_usdt: 1_000.0, recent_tick_prices: &[], current_atr: 0.0, rolling_atr_mean: 0.0 };
        assert!(evaluate(&inputs, &ExecutionQualitySettings::default()).is_err());
    }

    #[test]
    fn volatility_spike_rejects() {
        let t = ticker(99.99, 100.0);
        let b = book(50_000.0, 50_000.0);
        let inputs = ExecutionQualityInputs { ticker: &t, order_book: &b, order_side: OrderSide::Buy, order_size_usdt: 100.0, recent_tick_prices: &[100.0, 100.1], current_atr: 5.0, rolling_atr_mean: 1.0 };
        assert!(evaluate(&inputs, &ExecutionQualitySettings::default()).is_err());
    }

    #[test]
    fn healthy_market_passes() {
        let t = ticker(99.99, 100.0);
        let b = book(50_000.0, 50_000.0);
        let inputs = ExecutionQualityInputs { ticker: &t, order_book: &b, order_side: OrderSide::Buy, order_size_usdt: 100.0, recent_tick_prices: &[100.0, 100.05, 100.02], current_atr: 1.0, rolling_atr_mean: 1.0 };
        assert!(evaluate(&inputs, &ExecutionQualitySettings::default()).is_ok());
    }
}
