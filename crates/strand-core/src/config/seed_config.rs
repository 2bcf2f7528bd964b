use serde::{Deserialize, Serialize};

use super::defaults;

/// How the resolver probes tiers 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// One tier at a time, each on the residual of the previous.
    Sequential,
    /// All lexical tiers at once, applied in tier order afterwards.
    Speculative,
}

/// Seed resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub exact_weight: f64,
    pub alias_weight: f64,
    pub fuzzy_weight: f64,
    pub full_text_weight: f64,
    pub structural_weight: f64,
    /// Scale applied to normalized cosine scores in the vector fallback tier.
    pub vector_weight: f64,
    /// Weight given to externally supplied thematic seeds.
    pub community_weight: f64,
    /// Cosine floor for the vector fallback tier.
    pub vector_min_similarity: f64,
    /// Minimum backend score for a fuzzy name match.
    pub fuzzy_min_score: f64,
    /// Candidates kept per term per tier.
    pub candidates_per_term: usize,
    /// Maximum merged seeds handed to the walk.
    pub max_seeds: usize,
    /// Timeout applied to each tier.
    pub tier_timeout_ms: u64,
    pub probe_mode: ProbeMode,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            exact_weight: defaults::DEFAULT_EXACT_WEIGHT,
            alias_weight: defaults::DEFAULT_ALIAS_WEIGHT,
            fuzzy_weight: defaults::DEFAULT_FUZZY_WEIGHT,
            full_text_weight: defaults::DEFAULT_FULL_TEXT_WEIGHT,
            structural_weight: defaults::DEFAULT_STRUCTURAL_WEIGHT,
            vector_weight: defaults::DEFAULT_VECTOR_WEIGHT,
            community_weight: defaults::DEFAULT_COMMUNITY_WEIGHT,
            vector_min_similarity: defaults::DEFAULT_VECTOR_MIN_SIMILARITY,
            fuzzy_min_score: defaults::DEFAULT_FUZZY_MIN_SCORE,
            candidates_per_term: defaults::DEFAULT_CANDIDATES_PER_TERM,
            max_seeds: defaults::DEFAULT_MAX_SEEDS,
            tier_timeout_ms: defaults::DEFAULT_TIER_TIMEOUT_MS,
            probe_mode: ProbeMode::Sequential,
        }
    }
}
