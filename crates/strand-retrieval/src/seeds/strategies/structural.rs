use std::collections::BTreeMap;

use async_trait::async_trait;
use strand_core::config::SeedConfig;
use strand_core::errors::StrandResult;
use strand_core::models::{NodeClass, SeedTier};

use super::{raw_match, SeedStrategy, TierMatch};
use crate::context::QueryContext;
use crate::seeds::merge::RawMatch;

/// Tier 5: find passages mentioning the term, then seed from the entities
/// attached to those passages. Each entity scores as its best passage.
pub struct StructuralStrategy;

#[async_trait]
impl SeedStrategy for StructuralStrategy {
    fn tier(&self) -> SeedTier {
        SeedTier::Structural
    }

    fn name(&self) -> &'static str {
        "structural"
    }

    async fn resolve(
        &self,
        ctx: &QueryContext<'_>,
        config: &SeedConfig,
        terms: &[String],
    ) -> StrandResult<TierMatch> {
        let mut matched = Vec::new();
        for term in terms {
            let passages = ctx
                .store
                .search_full_text(
                    ctx.tenant,
                    term,
                    Some(NodeClass::Passage),
                    config.candidates_per_term,
                )
                .await?;

            let mut best: BTreeMap<String, RawMatch> = BTreeMap::new();
            for passage in passages.iter().filter(|p| p.score > 0.0) {
                let entities = ctx
                    .store
                    .neighbors(
                        ctx.tenant,
                        std::slice::from_ref(&passage.node.id),
                        Some(NodeClass::Entity),
                        config.candidates_per_term,
                    )
                    .await?;
                for entity in &entities {
                    let candidate = raw_match(entity, passage.score, term);
                    match best.get(&entity.id) {
                        Some(existing) if existing.score >= candidate.score => {}
                        _ => {
                            best.insert(entity.id.clone(), candidate);
                        }
                    }
                }
            }
            matched.extend(best.into_values());
        }
        Ok(TierMatch::new(terms, matched))
    }
}
