//! Seed resolution strategies, one per tier.

pub mod alias;
pub mod exact_name;
pub mod full_text;
pub mod fuzzy;
pub mod structural;
pub mod vector;

use std::collections::HashSet;

use async_trait::async_trait;
use strand_core::config::SeedConfig;
use strand_core::errors::StrandResult;
use strand_core::models::{Node, SeedTier, TenantId};

use super::merge::RawMatch;
use crate::context::QueryContext;

pub use alias::AliasStrategy;
pub use exact_name::ExactNameStrategy;
pub use full_text::FullTextStrategy;
pub use fuzzy::FuzzyStrategy;
pub use structural::StructuralStrategy;
pub use vector::VectorStrategy;

/// Matches produced by one tier, and the terms it could not resolve.
#[derive(Debug, Clone, Default)]
pub struct TierMatch {
    pub matched: Vec<RawMatch>,
    pub unmatched: Vec<String>,
}

impl TierMatch {
    /// Build from matches, deriving the unmatched terms.
    pub fn new(terms: &[String], matched: Vec<RawMatch>) -> Self {
        let mut result = Self {
            matched,
            unmatched: Vec::new(),
        };
        result.recompute_unmatched(terms);
        result
    }

    /// Drop matches owned by another tenant. Returns the dropped matches.
    pub fn retain_tenant(&mut self, tenant: &TenantId, terms: &[String]) -> Vec<RawMatch> {
        let (kept, dropped): (Vec<RawMatch>, Vec<RawMatch>) = std::mem::take(&mut self.matched)
            .into_iter()
            .partition(|m| &m.tenant_id == tenant);
        self.matched = kept;
        self.recompute_unmatched(terms);
        dropped
    }

    /// Lowercased terms with at least one match.
    pub fn matched_terms(&self) -> HashSet<String> {
        self.matched.iter().map(|m| m.term.to_lowercase()).collect()
    }

    fn recompute_unmatched(&mut self, terms: &[String]) {
        let matched = self.matched_terms();
        self.unmatched = terms
            .iter()
            .filter(|t| !matched.contains(&t.to_lowercase()))
            .cloned()
            .collect();
    }
}

/// One tier of the resolution chain.
#[async_trait]
pub trait SeedStrategy: Send + Sync {
    fn tier(&self) -> SeedTier;

    fn name(&self) -> &'static str;

    /// Resolve `terms` within the context's tenant.
    async fn resolve(
        &self,
        ctx: &QueryContext<'_>,
        config: &SeedConfig,
        terms: &[String],
    ) -> StrandResult<TierMatch>;
}

pub(crate) fn raw_match(node: &Node, score: f64, term: &str) -> RawMatch {
    RawMatch {
        node_id: node.id.clone(),
        tenant_id: node.tenant_id.clone(),
        score,
        term: term.to_string(),
    }
}

/// The default lexical chain, tiers 1-5 in order.
pub fn default_chain() -> Vec<Box<dyn SeedStrategy>> {
    vec![
        Box::new(ExactNameStrategy),
        Box::new(AliasStrategy),
        Box::new(FuzzyStrategy),
        Box::new(FullTextStrategy),
        Box::new(StructuralStrategy),
    ]
}
