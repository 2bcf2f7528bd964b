//! Seed candidates: weighted restart targets for the graph walk.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::diagnostics::PartialFailure;
use super::tenant::TenantId;

/// Resolution tiers in the order the chain tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedTier {
    ExactName,
    Alias,
    Fuzzy,
    FullText,
    Structural,
    Vector,
    /// Externally supplied thematic/community candidates.
    Community,
}

impl SeedTier {
    /// 1-based position in the resolution chain.
    pub fn rank(self) -> u8 {
        match self {
            SeedTier::ExactName => 1,
            SeedTier::Alias => 2,
            SeedTier::Fuzzy => 3,
            SeedTier::FullText => 4,
            SeedTier::Structural => 5,
            SeedTier::Vector => 6,
            SeedTier::Community => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeedTier::ExactName => "exact_name",
            SeedTier::Alias => "alias",
            SeedTier::Fuzzy => "fuzzy",
            SeedTier::FullText => "full_text",
            SeedTier::Structural => "structural",
            SeedTier::Vector => "vector",
            SeedTier::Community => "community",
        }
    }
}

impl fmt::Display for SeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A graph node chosen as a restart target, with its normalized weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCandidate {
    pub node_id: String,
    pub tenant_id: TenantId,
    /// Weight in (0, 1] after within-tier normalization.
    pub weight: f64,
    pub tier: SeedTier,
    /// Name of the strategy that produced the candidate.
    pub strategy: String,
    /// Query term the candidate was resolved from.
    pub term: String,
}

/// Whether resolution produced anything to walk from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStatus {
    Resolved,
    /// Nothing resolved. Callers short-circuit without retrieval or generation.
    NoSeeds,
}

/// Output of the seed resolver for one query or sub-question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResolution {
    pub status: SeedStatus,
    /// Merged seeds, sorted by weight descending then node id.
    pub seeds: Vec<SeedCandidate>,
    /// Terms that no tier matched.
    pub unmatched_terms: Vec<String>,
    /// All terms that were extracted and attempted.
    pub terms: Vec<String>,
    /// Candidate counts per tier, before merging.
    pub per_tier: BTreeMap<SeedTier, usize>,
    /// Tiers that failed or timed out.
    pub failures: Vec<PartialFailure>,
}

impl SeedResolution {
    pub fn empty(terms: Vec<String>) -> Self {
        Self {
            status: SeedStatus::NoSeeds,
            seeds: Vec::new(),
            unmatched_terms: terms.clone(),
            terms,
            per_tier: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_no_seeds(&self) -> bool {
        self.status == SeedStatus::NoSeeds
    }

    /// The tier a term was matched at, if any.
    pub fn tier_for_term(&self, term: &str) -> Option<SeedTier> {
        self.seeds
            .iter()
            .filter(|s| s.term.eq_ignore_ascii_case(term))
            .map(|s| s.tier)
            .min()
    }
}
