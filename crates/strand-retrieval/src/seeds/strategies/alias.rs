use async_trait::async_trait;
use strand_core::config::SeedConfig;
use strand_core::errors::StrandResult;
use strand_core::models::{NodeClass, SeedTier};

use super::{raw_match, SeedStrategy, TierMatch};
use crate::context::QueryContext;

/// Tier 2: alias or synonym of an entity.
pub struct AliasStrategy;

#[async_trait]
impl SeedStrategy for AliasStrategy {
    fn tier(&self) -> SeedTier {
        SeedTier::Alias
    }

    fn name(&self) -> &'static str {
        "alias"
    }

    async fn resolve(
        &self,
        ctx: &QueryContext<'_>,
        _config: &SeedConfig,
        terms: &[String],
    ) -> StrandResult<TierMatch> {
        let mut matched = Vec::new();
        for term in terms {
            let nodes = ctx
                .store
                .find_by_alias(ctx.tenant, term, Some(NodeClass::Entity))
                .await?;
            matched.extend(nodes.iter().map(|n| raw_match(n, 1.0, term)));
        }
        Ok(TierMatch::new(terms, matched))
    }
}
