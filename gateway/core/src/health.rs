//! Order health monitor (§4.6): a periodic sweep over locally-tracked open orders that logs
//! stale ones and cancels ones past their max age. Partial fills are reported, never auto-cancelled.
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::gateway::ExchangeGateway;
use crate::types::OrderResult;

#[derive(Debug, Clone, Copy)]
pub struct OrderHealthConfig {
    pub check_interval: Duration,
    pub stale_threshold: Duration,
    pub max_age: Duration,
}

impl Default for OrderHealthConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30),
            stale_threshold: Duration::from_secs(60),
            max_age: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    Ignored,
    LoggedStale,
    Canceled,
}

#[derive(Debug, Clone)]
pub struct TrackedOrder {
    pub id: String,
    pub symbol: String,
    pub placed_at: DateTime<Utc>,
}

/// Sweeps `orders`, returning the action taken for each. Orders older than `max_age` are
/// cancelled on the gateway; orders past `stale_threshold` but under `max_age` are only flagged.
pub async fn sweep(
    gateway: &dyn ExchangeGateway,
    orders: &[TrackedOrder],
    config: OrderHealthConfig,
    now: DateTime<Utc>,
) -> Vec<(TrackedOrder, SweepAction, Result<Option<OrderResult>>)> {
    let mut results = Vec::with_capacity(orders.len());
    for order in orders {
        let age = now.signed_duration_since(order.placed_at);
        let age = age.to_std().unwrap_or_default();
        if age >= config.max_age {
            let outcome = gateway.cancel_order(&order.id, &order.symbol).await;
            let outcome = outcome.map(|_| None);
            results.push((order.clone(), SweepAction::Canceled, outcome));
        } else if age >= config.stale_threshold {
            let outcome = gateway.get_order(&order.id, &order.symbol).await.map(Some);
            results.push((order.clone(), SweepAction::LoggedStale, outcome));
        } else {
            results.push((order.clone(), SweepAction::Ignored, Ok(None)));
        }
    }
    results
}
