use serde::{Deserialize, Serialize};

use super::defaults;

/// Query router configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Ask the LLM service for a classification alongside the heuristics.
    pub llm_enabled: bool,
    /// Below this confidence the router falls back to multi-hop.
    pub min_confidence: f64,
    /// How far apart two disagreeing signals must be before the stronger one wins.
    pub disagreement_margin: f64,
    /// Timeout for the classification call.
    pub llm_timeout_ms: u64,
    /// Queries at or under this word count are fast-lookup candidates.
    pub fast_lookup_max_words: usize,
    /// Queries at or over this word count lean towards multi-hop.
    pub long_query_words: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            llm_enabled: defaults::DEFAULT_ROUTER_LLM_ENABLED,
            min_confidence: defaults::DEFAULT_ROUTER_MIN_CONFIDENCE,
            disagreement_margin: defaults::DEFAULT_ROUTER_DISAGREEMENT_MARGIN,
            llm_timeout_ms: defaults::DEFAULT_ROUTER_LLM_TIMEOUT_MS,
            fast_lookup_max_words: defaults::DEFAULT_FAST_LOOKUP_MAX_WORDS,
            long_query_words: defaults::DEFAULT_LONG_QUERY_WORDS,
        }
    }
}
