//! Prometheus series for the trading core: counters register once at process start via
//! `lazy_static!`, the same idiom the teacher's push actor used for its own bookkeeping counters.
use prometheus::{Gauge, GaugeVec, IntCounterVec, Opts};

lazy_static! {
    static ref TRADES_OPENED_TOTAL: IntCounterVec = register_int_counter_vec!(
        Opts::new("trading_trades_opened_total", "Total number of positions opened"),
        &["symbol", "side"]
    )
    .unwrap();
    static ref TRADES_CLOSED_TOTAL: IntCounterVec = register_int_counter_vec!(
        Opts::new("trading_trades_closed_total", "Total number of positions closed"),
        &["symbol", "exit_reason"]
    )
    .unwrap();
    static ref PNL_TOTAL_USDT: Gauge = register_gauge!("trading_pnl_total_usdt", "Cumulative realised pnl in USDT").unwrap();
    static ref CIRCUIT_BREAKER_TRIPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        Opts::new("trading_circuit_breaker_trips_total", "Total number of circuit breaker trips"),
        &["reason"]
    )
    .unwrap();
    static ref GATEWAY_BACKOFF_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        Opts::new("trading_gateway_backoff_events_total", "Total number of gateway backoff escalations"),
        &["exchange", "error_kind"]
    )
    .unwrap();
    static ref SIGNAL_REJECTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        Opts::new("trading_signal_rejections_total", "Total number of signals rejected by a filter gate"),
        &["gate"]
    )
    .unwrap();
    static ref ENSEMBLE_AGREEMENT: GaugeVec = register_gauge_vec!(
        Opts::new("trading_ensemble_agreement", "Most recent ensemble agreement fraction by symbol"),
        &["symbol"]
    )
    .unwrap();
}

pub fn record_trade_opened(symbol: &str, side: &str) { TRADES_OPENED_TOTAL.with_label_values(&[symbol, side]).inc(); }

pub fn record_trade_closed(symbol: &str, exit_reason: &str, pnl: f64) {
    TRADES_CLOSED_TOTAL.with_label_values(&[symbol, exit_reason]).inc();
    PNL_TOTAL_USDT.add(pnl);
}

pub fn record_circuit_breaker_trip(reason: &str) { CIRCUIT_BREAKER_TRIPS_TOTAL.with_label_values(&[reason]).inc(); }

pub fn record_gateway_backoff(exchange: &str, error_kind: &str) { GATEWAY_BACKOFF_EVENTS_TOTAL.with_label_values(&[exchange, error_kind]).inc(); }

pub fn record_signal_rejection(gate: &str) { SIGNAL_REJECTIONS_TOTAL.with_label_values(&[gate]).inc(); }

pub fn set_ensemble_agreement(symbol: &str, agreement: f64) { ENSEMBLE_AGREEMENT.with_label_values(&[symbol]).set(agreement); }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_label_scoped() {
        record_trade_opened("BTCUSDT", "long");
        record_trade_opened("ETHUSDT", "short");
        assert_eq!(TRADES_OPENED_TOTAL.with_label_values(&["BTCUSDT", "long"]).get(), 1);
        assert_eq!(TRADES_OPENED_TOTAL.with_label_values(&["ETHUSDT", "short"]).get(), 1);
    }

    #[test]
    fn pnl_gauge_accumulates() {
        record_trade_closed("BTCUSDT", "stop_loss", -5.0);
        record_trade_closed("BTCUSDT", "fixed_take_profit", 12.0);
        assert!(PNL_TOTAL_USDT.get() >= 7.0 - 1e-9);
    }
}
