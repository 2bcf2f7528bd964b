use serde::{Deserialize, Serialize};

use super::defaults;

/// Rank fusion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// RRF k-value for rank fusion.
    pub rrf_k: u32,
    /// Number of fused results kept.
    pub top_k: usize,
    /// Each side fetches `top_k * overfetch` candidates.
    pub overfetch: usize,
    /// Post-fusion multiplier per unit of node importance.
    pub authority_boost: f64,
    /// Post-fusion multiplier for summary-level passages.
    pub summary_boost: f64,
    /// Timeout for each search side.
    pub search_timeout_ms: u64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            top_k: defaults::DEFAULT_FUSION_TOP_K,
            overfetch: defaults::DEFAULT_FUSION_OVERFETCH,
            authority_boost: defaults::DEFAULT_AUTHORITY_BOOST,
            summary_boost: defaults::DEFAULT_SUMMARY_BOOST,
            search_timeout_ms: defaults::DEFAULT_SEARCH_TIMEOUT_MS,
        }
    }
}
