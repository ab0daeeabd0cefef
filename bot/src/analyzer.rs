//! Placeholder [`PolicyAnalyzer`] wired in when `plugins.llm.enabled` is off. `LlmPolicy` never
//! calls the analyzer while disabled (it short-circuits in [`plugins::llm::LlmPolicy::analyze`]),
//! so this only needs to exist to satisfy the generic parameter.
use plugins::prelude::{PolicyAnalyzer, PolicyContext, RawPolicyDecision};

#[derive(Debug)]
pub struct NoopAnalyzer;

#[async_trait]
impl PolicyAnalyzer for NoopAnalyzer {
    async fn analyze(&self, _ctx: &PolicyContext) -> plugins::prelude::Result<RawPolicyDecision> {
        Err(plugins::prelude::Error::CallFailed("no llm policy analyzer configured".to_string()))
    }
}
