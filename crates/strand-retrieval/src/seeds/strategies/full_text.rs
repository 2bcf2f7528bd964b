use async_trait::async_trait;
use strand_core::config::SeedConfig;
use strand_core::errors::StrandResult;
use strand_core::models::{NodeClass, SeedTier};

use super::{raw_match, SeedStrategy, TierMatch};
use crate::context::QueryContext;

/// Tier 4: full-text search over entity names and descriptions.
pub struct FullTextStrategy;

#[async_trait]
impl SeedStrategy for FullTextStrategy {
    fn tier(&self) -> SeedTier {
        SeedTier::FullText
    }

    fn name(&self) -> &'static str {
        "full_text"
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
                .search_full_text(
                    ctx.tenant,
                    term,
                    Some(NodeClass::Entity),
                    config.candidates_per_term,
                )
                .await?;
            matched.extend(
                hits.iter()
                    .filter(|h| h.score > 0.0)
                    .map(|h| raw_match(&h.node, h.score, term)),
            );
        }
        Ok(TierMatch::new(terms, matched))
    }
}
