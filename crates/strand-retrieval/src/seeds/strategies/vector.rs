use std::time::Duration;

use async_trait::async_trait;
use strand_core::config::SeedConfig;
use strand_core::errors::{StrandError, StrandResult};
use strand_core::models::{NodeClass, SeedTier};

use super::{raw_match, SeedStrategy, TierMatch};
use crate::context::QueryContext;

/// Tier 6: embedding similarity. Only ever sees terms tiers 1-5 left unmatched.
pub struct VectorStrategy;

#[async_trait]
impl SeedStrategy for VectorStrategy {
    fn tier(&self) -> SeedTier {
        SeedTier::Vector
    }

    fn name(&self) -> &'static str {
        "vector"
    }

    async fn resolve(
        &self,
        ctx: &QueryContext<'_>,
        config: &SeedConfig,
        terms: &[String],
    ) -> StrandResult<TierMatch> {
        let mut matched = Vec::new();
        for term in terms {
            let embedding = tokio::time::timeout(
                Duration::from_millis(ctx.embed_timeout_ms),
                ctx.embedder.embed(term),
            )
            .await
            .map_err(|_| StrandError::Timeout {
                operation: "embed".to_string(),
                timeout_ms: ctx.embed_timeout_ms,
            })??;

            let hits = ctx
                .store
                .search_vector(
                    ctx.tenant,
                    &embedding,
                    Some(NodeClass::Entity),
                    config.candidates_per_term,
                )
                .await?;
            matched.extend(
                hits.iter()
                    .filter(|h| h.score >= config.vector_min_similarity)
                    .map(|h| raw_match(&h.node, h.score, term)),
            );
        }
        Ok(TierMatch::new(terms, matched))
    }
}
