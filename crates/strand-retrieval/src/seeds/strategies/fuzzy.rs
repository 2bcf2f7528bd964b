use async_trait::async_trait;
use strand_core::config::SeedConfig;
use strand_core::errors::StrandResult;
use strand_core::models::{NodeClass, SeedTier};

use super::{raw_match, SeedStrategy, TierMatch};
use crate::context::QueryContext;

/// Tier 3: partial entity-name match above `fuzzy_min_score`.
pub struct FuzzyStrategy;

#[async_trait]
impl SeedStrategy for FuzzyStrategy {
    fn tier(&self) -> SeedTier {
        SeedTier::Fuzzy
    }

    fn name(&self) -> &'static str {
        "fuzzy"
    }

    async fn resolve(
        &self,
        ctx: &QueryContext<'_>,
        config: &SeedConfig,
        terms: &[String],
    ) -> StrandResult<TierMatch> {
        let mut matched = Vec::new();
        for term in terms {
            let hits = ctx
                .store
                .find_by_partial_name(
                    ctx.tenant,
                    term,
                    Some(NodeClass::Entity),
                    config.candidates_per_term,
                )
                .await?;
            matched.extend(
                hits.iter()
                    .filter(|h| h.score >= config.fuzzy_min_score)
                    .map(|h| raw_match(&h.node, h.score, term)),
            );
        }
        Ok(TierMatch::new(terms, matched))
    }
}
