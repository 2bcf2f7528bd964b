//! Tiered seed resolution: query terms → weighted graph nodes.
//!
//! Tiers run cheapest and most precise first. A term leaves the residual set
//! at the first tier that matches it, so the vector fallback only ever sees
//! what the lexical tiers could not resolve.

pub mod merge;
pub mod strategies;
pub mod terms;

use std::collections::{BTreeMap, HashSet};

use futures::future::join_all;
use strand_core::config::{ProbeMode, SeedConfig};
use strand_core::models::{PartialFailure, SeedCandidate, SeedResolution, SeedStatus, SeedTier};
use strand_observability::{events, seed_span};
use tracing::Instrument;

use crate::context::QueryContext;
use crate::guard::guarded;
use merge::{merge_candidates, normalize_tier, tier_weight};
use strategies::{default_chain, SeedStrategy, TierMatch, VectorStrategy};

/// Runs the strategy chain and merges the results.
pub struct SeedResolver {
    config: SeedConfig,
    chain: Vec<Box<dyn SeedStrategy>>,
    fallback: Box<dyn SeedStrategy>,
}

/// Running state of one resolution.
struct Accumulator {
    residual: Vec<String>,
    candidates: Vec<SeedCandidate>,
    per_tier: BTreeMap<SeedTier, usize>,
    failures: Vec<PartialFailure>,
}

impl SeedResolver {
    /// Default chain: exact → alias → fuzzy → full-text → structural, then vector.
    pub fn new(config: SeedConfig) -> Self {
        Self::with_chain(config, default_chain(), Box::new(VectorStrategy))
    }

    /// Custom chain. `fallback` always runs last, on the true residual.
    pub fn with_chain(
        config: SeedConfig,
        chain: Vec<Box<dyn SeedStrategy>>,
        fallback: Box<dyn SeedStrategy>,
    ) -> Self {
        Self {
            config,
            chain,
            fallback,
        }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Extract terms from `query` and resolve them.
    pub async fn resolve(&self, ctx: &QueryContext<'_>, query: &str) -> SeedResolution {
        self.resolve_terms(ctx, terms::extract_terms(query)).await
    }

    /// Resolve already-extracted terms. Never fails; failed tiers are reported
    /// in `failures` and leave their terms in the residual.
    pub async fn resolve_terms(&self, ctx: &QueryContext<'_>, terms: Vec<String>) -> SeedResolution {
        let span = seed_span!(ctx.tenant, terms.len());
        async move {
            if terms.is_empty() {
                let resolution = SeedResolution::empty(terms);
                events::seeds_resolved(&resolution);
                return resolution;
            }

            let mut acc = Accumulator {
                residual: terms.clone(),
                candidates: Vec::new(),
                per_tier: BTreeMap::new(),
                failures: Vec::new(),
            };

            match self.config.probe_mode {
                ProbeMode::Sequential => {
                    for strategy in &self.chain {
                        if acc.residual.is_empty() {
                            break;
                        }
                        let probe = self.probe(strategy.as_ref(), ctx, &acc.residual).await;
                        self.absorb(strategy.as_ref(), probe, &mut acc);
                    }
                }
                ProbeMode::Speculative => {
                    let probes = join_all(
                        self.chain
                            .iter()
                            .map(|strategy| self.probe(strategy.as_ref(), ctx, &terms)),
                    )
                    .await;
                    for (strategy, probe) in self.chain.iter().zip(probes) {
                        self.absorb(strategy.as_ref(), probe, &mut acc);
                    }
                }
            }

            if !acc.residual.is_empty() {
                let probe = self.probe(self.fallback.as_ref(), ctx, &acc.residual).await;
                self.absorb(self.fallback.as_ref(), probe, &mut acc);
            }

            let seeds = merge_candidates(acc.candidates, self.config.max_seeds);
            let resolution = SeedResolution {
                status: if seeds.is_empty() {
                    SeedStatus::NoSeeds
                } else {
                    SeedStatus::Resolved
                },
                seeds,
                unmatched_terms: acc.residual,
                terms,
                per_tier: acc.per_tier,
                failures: acc.failures,
            };
            events::seeds_resolved(&resolution);
            resolution
        }
        .instrument(span)
        .await
    }

    /// Run one strategy under the tier timeout and drop foreign-tenant matches.
    async fn probe(
        &self,
        strategy: &dyn SeedStrategy,
        ctx: &QueryContext<'_>,
        terms: &[String],
    ) -> Result<TierMatch, PartialFailure> {
        let unit = format!("seed_tier:{}", strategy.name());
        let mut tier_match = guarded(
            &unit,
            self.config.tier_timeout_ms,
            strategy.resolve(ctx, &self.config, terms),
        )
        .await?;
        for dropped in tier_match.retain_tenant(ctx.tenant, terms) {
            events::tenant_violation(ctx.tenant.as_str(), dropped.tenant_id.as_str(), &unit);
        }
        Ok(tier_match)
    }

    /// Fold a tier's matches into the accumulator. Only matches for terms still
    /// in the residual count, so speculative probing resolves exactly like
    /// sequential probing.
    fn absorb(
        &self,
        strategy: &dyn SeedStrategy,
        probe: Result<TierMatch, PartialFailure>,
        acc: &mut Accumulator,
    ) {
        let tier_match = match probe {
            Ok(m) => m,
            Err(failure) => {
                acc.failures.push(failure);
                return;
            }
        };

        let residual: HashSet<String> =
            acc.residual.iter().map(|t| t.to_lowercase()).collect();
        let matches: Vec<_> = tier_match
            .matched
            .into_iter()
            .filter(|m| residual.contains(&m.term.to_lowercase()))
            .collect();
        if matches.is_empty() {
            return;
        }

        let matched_terms: HashSet<String> =
            matches.iter().map(|m| m.term.to_lowercase()).collect();
        let tier = strategy.tier();
        let normalized = normalize_tier(
            matches,
            tier,
            tier_weight(&self.config, tier),
            strategy.name(),
            self.config.candidates_per_term,
        );
        *acc.per_tier.entry(tier).or_default() += normalized.len();
        acc.candidates.extend(normalized);
        acc.residual
            .retain(|t| !matched_terms.contains(&t.to_lowercase()));
    }
}
