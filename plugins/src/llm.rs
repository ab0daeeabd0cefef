//! Optional LLM "Policy Layer" (spec §4.4 gate 6, §9): a parameter-adjustment port with
//! hard-bounded outputs and a TTL, never a command port — the risk manager owns the final
//! numbers. Guardrails (call/cost caps, caching, timeout, failure mode) live here so every
//! analyzer implementation gets them for free.
use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    Pass,
    Reject,
}

/// Context the policy layer reasons over for one signal attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyContext {
    pub candle_hash: u64,
    pub signal_fingerprint: u64,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParamBounds {
    pub stop_loss_pct: (f64, f64),
    pub take_profit_pct: (f64, f64),
    pub position_multiplier: (f64, f64),
}

impl Default for ParamBounds {
    fn default() -> Self {
        Self {
            stop_loss_pct: (0.002, 0.02),
            take_profit_pct: (0.004, 0.05),
            position_multiplier: (0.3, 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum RiskMode {
    Normal,
    Defensive,
    Halted,
}

/// The decision returned by an analyzer, before clamping/TTL are applied by [`LlmPolicy::analyze`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawPolicyDecision {
    pub accept: bool,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
    pub position_multiplier: Option<f64>,
    pub risk_mode: Option<RiskMode>,
}

/// The final, bounded decision consumers act on. `expires_at` governs how long the parameter
/// adjustments remain in force.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub accept: bool,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
    pub position_multiplier: Option<f64>,
    pub risk_mode: Option<RiskMode>,
    pub expires_at: DateTime<Utc>,
}

impl PolicyDecision {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool { now >= self.expires_at }
}

#[async_trait]
pub trait PolicyAnalyzer: Send + Sync {
    async fn analyze(&self, ctx: &PolicyContext) -> Result<RawPolicyDecision>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmPolicySettings {
    pub enabled: bool,
    pub cache_ttl: Duration,
    pub param_ttl: Duration,
    pub max_daily_calls: u32,
    pub max_daily_cost_usd: f64,
    pub cost_per_call_usd: f64,
    pub timeout: Duration,
    pub failure_mode: FailureMode,
    pub bounds: ParamBounds,
}

impl Default for LlmPolicySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            cache_ttl: Duration::from_secs(300),
            param_ttl: Duration::from_secs(900),
            max_daily_calls: 200,
            max_daily_cost_usd: 5.0,
            cost_per_call_usd: 0.01,
            timeout: Duration::from_secs(5),
            failure_mode: FailureMode::Pass,
            bounds: ParamBounds::default(),
        }
    }
}

struct CacheEntry {
    decision: PolicyDecision,
    cached_at: DateTime<Utc>,
}

/// Owns the daily quota counters and the `(candle_hash, signal_fingerprint)` cache; the embedding
/// bot loop calls `analyze` once per eligible signal and never talks to the analyzer directly.
pub struct LlmPolicy<A: PolicyAnalyzer> {
    analyzer: A,
    settings: LlmPolicySettings,
    cache: HashMap<(u64, u64), CacheEntry>,
    calls_today: u32,
    cost_today_usd: f64,
    day_started: DateTime<Utc>,
}

impl<A: PolicyAnalyzer> LlmPolicy<A> {
    #[must_use]
    pub fn new(analyzer: A, settings: LlmPolicySettings, now: DateTime<Utc>) -> Self {
        Self { analyzer, settings, cache: HashMap::new(), calls_today: 0, cost_today_usd: 0.0, day_started: now }
    }

    fn roll_day_if_needed(&mut self, now: DateTime<Utc>) {
        if now.date_naive() != self.day_started.date_naive() {
            self.calls_today = 0;
            self.cost_today_usd = 0.0;
            self.day_started = now;
        }
    }

    fn clamp(&self, raw: RawPolicyDecision, now: DateTime<Utc>) -> PolicyDecision {
        let b = self.settings.bounds;
        PolicyDecision {
            accept: raw.accept,
            stop_loss_pct: raw.stop_loss_pct.map(|v| v.clamp(b.stop_loss_pct.0, b.stop_loss_pct.1)),
            take_profit_pct: raw.take_profit_pct.map(|v| v.clamp(b.take_profit_pct.0, b.take_profit_pct.1)),
            position_multiplier: raw.position_multiplier.map(|v| v.clamp(b.position_multiplier.0, b.position_multiplier.1)),
            risk_mode: raw.risk_mode,
            expires_at: now + chrono::Duration::from_std(self.settings.param_ttl).unwrap_or(chrono::Duration::zero()),
        }
    }

    fn failure_decision(&self, now: DateTime<Utc>) -> PolicyDecision {
        PolicyDecision {
            accept: self.settings.failure_mode == FailureMode::Pass,
            stop_loss_pct: None,
            take_profit_pct: None,
            position_multiplier: None,
            risk_mode: None,
            expires_at: now,
        }
    }

    /// Returns the cached decision if present and not past `cache_ttl`; otherwise calls the
    /// analyzer under `timeout`, enforcing the daily call/cost caps first. On any failure
    /// (timeout, cap reached, analyzer error) applies `failure_mode`.
    pub async fn analyze(&mut self, ctx: PolicyContext, now: DateTime<Utc>) -> PolicyDecision {
        if !self.settings.enabled {
            return self.failure_decision(now);
        }
        self.roll_day_if_needed(now);

        let key = (ctx.candle_hash, ctx.signal_fingerprint);
        if let Some(entry) = self.cache.get(&key) {
            if now.signed_duration_since(entry.cached_at).to_std().unwrap_or(Duration::MAX) < self.settings.cache_ttl {
                return entry.decision;
            }
        }

        if self.calls_today >= self.settings.max_daily_calls {
            warn!(cap = self.settings.max_daily_calls, "llm daily call cap reached");
            return self.failure_decision(now);
        }
        if self.cost_today_usd + self.settings.cost_per_call_usd > self.settings.max_daily_cost_usd {
            warn!(cap = self.settings.max_daily_cost_usd, "llm daily cost cap reached");
            return self.failure_decision(now);
        }

        let call = tokio::time::timeout(self.settings.timeout, self.analyzer.analyze(&ctx)).await;
        let raw = match call {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                warn!(%err, "llm policy analyzer call failed");
                return self.failure_decision(now);
            }
            Err(_) => {
                warn!(timeout_s = self.settings.timeout.as_secs(), "llm policy analyzer call timed out");
                return self.failure_decision(now);
            }
        };

        self.calls_today += 1;
        self.cost_today_usd += self.settings.cost_per_call_usd;

        let decision = self.clamp(raw, now);
        self.cache.insert(key, CacheEntry { decision, cached_at: now });
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticAnalyzer;
    #[async_trait]
    impl PolicyAnalyzer for StaticAnalyzer {
        async fn analyze(&self, _ctx: &PolicyContext) -> Result<RawPolicyDecision> {
            Ok(RawPolicyDecision { accept: true, stop_loss_pct: Some(0.1), take_profit_pct: None, position_multiplier: Some(10.0), risk_mode: None })
        }
    }

    struct FailingAnalyzer;
    #[async_trait]
    impl PolicyAnalyzer for FailingAnalyzer {
        async fn analyze(&self, _ctx: &PolicyContext) -> Result<RawPolicyDecision> { Err(Error::CallFailed("boom".into())) }
    }

    fn ctx() -> PolicyContext { PolicyContext { candle_hash: 1, signal_fingerprint: 2, prompt: String::new() } }

    #[tokio::test]
    async fn disabled_policy_passes_through_unchanged() {
        let mut policy = LlmPolicy::new(StaticAnalyzer, LlmPolicySettings { enabled: false, ..LlmPolicySettings::default() }, Utc::now());
        let decision = policy.analyze(ctx(), Utc::now()).await;
        assert!(decision.accept);
        assert!(decision.stop_loss_pct.is_none());
    }

    #[tokio::test]
    async fn out_of_bounds_multiplier_is_clamped() {
        let mut policy = LlmPolicy::new(StaticAnalyzer, LlmPolicySettings { enabled: true, ..LlmPolicySettings::default() }, Utc::now());
        let decision = policy.analyze(ctx(), Utc::now()).await;
        assert_eq!(decision.position_multiplier, Some(2.0));
    }

    #[tokio::test]
    async fn repeated_key_hits_cache_without_a_second_call() {
        let mut policy = LlmPolicy::new(StaticAnalyzer, LlmPolicySettings { enabled: true, ..LlmPolicySettings::default() }, Utc::now());
        let now = Utc::now();
        let d1 = policy.analyze(ctx(), now).await;
        let calls_after_first = policy.calls_today;
        let d2 = policy.analyze(ctx(), now).await;
        assert_eq!(policy.calls_today, calls_after_first);
        assert_eq!(d1.stop_loss_pct, d2.stop_loss_pct);
    }

    #[tokio::test]
    async fn failure_mode_pass_accepts_on_analyzer_error() {
        let mut policy = LlmPolicy::new(FailingAnalyzer, LlmPolicySettings { enabled: true, failure_mode: FailureMode::Pass, ..LlmPolicySettings::default() }, Utc::now());
        let decision = policy.analyze(ctx(), Utc::now()).await;
        assert!(decision.accept);
    }

    #[tokio::test]
    async fn failure_mode_reject_rejects_on_analyzer_error() {
        let mut policy = LlmPolicy::new(FailingAnalyzer, LlmPolicySettings { enabled: true, failure_mode: FailureMode::Reject, ..LlmPolicySettings::default() }, Utc::now());
        let decision = policy.analyze(ctx(), Utc::now()).await;
        assert!(!decision.accept);
    }
}
