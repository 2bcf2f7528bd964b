use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-query budgets and limits used by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Global budget for one query. Exhaustion fails the request.
    pub query_timeout_ms: u64,
    /// Timeout for a single embedding call.
    pub embed_timeout_ms: u64,
    /// Timeout for the index-version check that opens every query. An overrun
    /// counts as an unreachable store.
    pub store_timeout_ms: u64,
    /// Timeout for the external answer generator.
    pub generator_timeout_ms: u64,
    /// Evidence items returned when the caller does not ask for a specific count.
    pub evidence_top_k: usize,
    /// Thematic candidates requested from the community provider.
    pub community_seed_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: defaults::DEFAULT_QUERY_TIMEOUT_MS,
            embed_timeout_ms: defaults::DEFAULT_EMBED_TIMEOUT_MS,
            store_timeout_ms: defaults::DEFAULT_STORE_TIMEOUT_MS,
            generator_timeout_ms: defaults::DEFAULT_GENERATOR_TIMEOUT_MS,
            evidence_top_k: defaults::DEFAULT_EVIDENCE_TOP_K,
            community_seed_limit: defaults::DEFAULT_COMMUNITY_SEED_LIMIT,
        }
    }
}
