//! Orchestrator: the single entry point for a query.
//!
//! preflight (index version) → route → dispatch → package evidence →
//! optional answer generation. Runs under the global query budget and the
//! caller's cancellation token.

use std::sync::Arc;
use std::time::{Duration, Instant};

use strand_core::config::StrandConfig;
use strand_core::errors::{GraphError, StrandError, StrandResult};
use strand_core::models::{
    AnswerRequest, EvidenceItem, EvidenceSource, IndexVersion, NotFoundReason, QueryDiagnostics,
    QueryOptions, QueryResult, QueryStatus, Route, SeedCandidate, SeedResolution, SeedTier,
    TenantId,
};
use strand_core::traits::{
    IAnswerGenerator, ICommunityProvider, IConfidenceScorer, IEmbeddingService, IGraphStore,
    ILlmService,
};
use strand_graph::{CacheKey, ResultCache, VersionChange, VersionTracker};
use strand_observability::{events, query_span};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::context::{QueryContext, Retrievers};
use crate::drift::DriftWorkflow;
use crate::evidence;
use crate::fusion::HybridSearcher;
use crate::guard::{contain, guarded, is_fatal};
use crate::router::{heuristics, Router};
use crate::seeds::merge::merge_candidates;
use crate::seeds::{terms, SeedResolver};
use crate::walk::{GraphWalker, WalkOutcome};

/// Builder for [`Orchestrator`]. The graph store and embedding service are
/// required; everything else is optional.
pub struct OrchestratorBuilder {
    config: StrandConfig,
    store: Option<Arc<dyn IGraphStore>>,
    embedder: Option<Arc<dyn IEmbeddingService>>,
    llm: Option<Arc<dyn ILlmService>>,
    community: Option<Arc<dyn ICommunityProvider>>,
    generator: Option<Arc<dyn IAnswerGenerator>>,
    scorer: Option<Arc<dyn IConfidenceScorer>>,
}

impl OrchestratorBuilder {
    pub fn new(config: StrandConfig) -> Self {
        Self {
            config,
            store: None,
            embedder: None,
            llm: None,
            community: None,
            generator: None,
            scorer: None,
        }
    }

    pub fn graph_store(mut self, store: Arc<dyn IGraphStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn embedding_service(mut self, embedder: Arc<dyn IEmbeddingService>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn llm(mut self, llm: Arc<dyn ILlmService>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn community_provider(mut self, community: Arc<dyn ICommunityProvider>) -> Self {
        self.community = Some(community);
        self
    }

    pub fn answer_generator(mut self, generator: Arc<dyn IAnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Replace the configured DRIFT confidence scorer.
    pub fn confidence_scorer(mut self, scorer: Arc<dyn IConfidenceScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn build(self) -> StrandResult<Orchestrator> {
        let store = self
            .store
            .ok_or_else(|| StrandError::ConfigError("graph store is required".into()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| StrandError::ConfigError("embedding service is required".into()))?;
        self.config.validate()?;

        let config = self.config;
        let drift = match self.scorer {
            Some(scorer) => DriftWorkflow::with_scorer(config.drift.clone(), scorer),
            None => DriftWorkflow::new(config.drift.clone()),
        };
        info!(
            embedder = embedder.name(),
            llm = self.llm.as_ref().map(|l| l.name().to_string()).unwrap_or_default(),
            community = self.community.is_some(),
            generator = self.generator.is_some(),
            confidence = drift.scorer_name(),
            "orchestrator ready"
        );

        Ok(Orchestrator {
            router: Router::new(config.router.clone()),
            resolver: SeedResolver::new(config.seeds.clone()),
            walker: GraphWalker::new(config.ppr.clone(), &config.cache),
            searcher: HybridSearcher::new(config.fusion.clone()),
            community_cache: ResultCache::new(&config.cache),
            versions: VersionTracker::new(),
            drift,
            store,
            embedder,
            llm: self.llm,
            community: self.community,
            generator: self.generator,
            config,
        })
    }
}

/// Evidence gathered by one route before packaging.
#[derive(Debug, Default)]
struct Retrieved {
    evidence: Vec<EvidenceItem>,
    partial_answers: Vec<String>,
    not_found: Option<NotFoundReason>,
}

impl Retrieved {
    fn not_found(reason: NotFoundReason) -> Self {
        Self {
            not_found: Some(reason),
            ..Self::default()
        }
    }
}

/// Answers one query at a time per call; safe to share across tasks.
pub struct Orchestrator {
    config: StrandConfig,
    store: Arc<dyn IGraphStore>,
    embedder: Arc<dyn IEmbeddingService>,
    llm: Option<Arc<dyn ILlmService>>,
    community: Option<Arc<dyn ICommunityProvider>>,
    generator: Option<Arc<dyn IAnswerGenerator>>,
    router: Router,
    resolver: SeedResolver,
    walker: GraphWalker,
    searcher: HybridSearcher,
    drift: DriftWorkflow,
    community_cache: ResultCache<Arc<Vec<SeedCandidate>>>,
    versions: VersionTracker,
}

impl Orchestrator {
    pub fn builder(config: StrandConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    pub fn config(&self) -> &StrandConfig {
        &self.config
    }

    pub async fn query(
        &self,
        text: &str,
        tenant: &TenantId,
        options: QueryOptions,
    ) -> StrandResult<QueryResult> {
        self.query_with_cancellation(text, tenant, options, CancellationToken::new())
            .await
    }

    /// Run a query that the caller can cancel through `cancel`.
    ///
    /// Fails only on an unreachable graph store, budget exhaustion or
    /// cancellation. Every other failure is recorded in the diagnostics.
    pub async fn query_with_cancellation(
        &self,
        text: &str,
        tenant: &TenantId,
        options: QueryOptions,
        cancel: CancellationToken,
    ) -> StrandResult<QueryResult> {
        let query_id = Uuid::new_v4().to_string();
        let token = cancel.child_token();
        // Stops any PPR still on the blocking pool once this call returns.
        let _guard = token.clone().drop_guard();
        let budget_ms = options
            .timeout_ms
            .unwrap_or(self.config.query.query_timeout_ms);
        let span = query_span!(query_id, tenant);

        async {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(StrandError::Cancelled),
                res = tokio::time::timeout(
                    Duration::from_millis(budget_ms),
                    self.execute(&query_id, text, tenant, &options, &token),
                ) => match res {
                    Ok(result) => result,
                    Err(_) => Err(StrandError::Timeout {
                        operation: "query".to_string(),
                        timeout_ms: budget_ms,
                    }),
                },
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        query_id: &str,
        text: &str,
        tenant: &TenantId,
        options: &QueryOptions,
        token: &CancellationToken,
    ) -> StrandResult<QueryResult> {
        let started = Instant::now();
        let version = self.preflight(tenant).await?;

        let ctx = QueryContext {
            tenant,
            version,
            store: self.store.as_ref(),
            embedder: self.embedder.as_ref(),
            llm: self.llm.as_deref(),
            embed_timeout_ms: self.config.query.embed_timeout_ms,
        };

        let decision = self
            .router
            .route(text, options.forced_route, &options.conversation, ctx.llm)
            .await;
        let mut diagnostics = QueryDiagnostics::new(decision.route);
        diagnostics.route_confidence = decision.confidence;
        diagnostics.route_rationale = decision.rationale.clone();
        diagnostics.route_source = decision.source;
        diagnostics.index_version = Some(version);

        // Referential follow-ups ("who runs it") resolve against the entities
        // named in the previous user turn.
        let inherited =
            heuristics::extract_signals(text, &options.conversation).inherited_mentions;
        let top_k = options
            .top_k
            .unwrap_or(self.config.query.evidence_top_k)
            .max(1);
        let retrieved = match decision.route {
            Route::FastLookup => self.fast_lookup(&ctx, text, top_k, &mut diagnostics).await,
            Route::EntityFocused => {
                self.entity_focused(&ctx, text, &inherited, top_k, token, &mut diagnostics)
                    .await?
            }
            Route::Thematic => {
                self.thematic(&ctx, text, &inherited, top_k, token, &mut diagnostics)
                    .await?
            }
            Route::MultiHop => {
                self.multi_hop(&ctx, text, top_k, token, &mut diagnostics)
                    .await?
            }
        };

        let mut found = evidence::retain_tenant(retrieved.evidence, tenant, "orchestrator");
        found.truncate(top_k);
        evidence::rerank(&mut found);
        diagnostics.evidence_count = found.len();

        let status = match retrieved.not_found {
            Some(reason) => QueryStatus::NotFound { reason },
            None if found.is_empty() => QueryStatus::NotFound {
                reason: NotFoundReason::NoEvidence,
            },
            None => QueryStatus::Found,
        };

        let answer = match status {
            QueryStatus::NotFound { reason } => {
                let reason = match reason {
                    NotFoundReason::NoSeeds => "no_seeds",
                    NotFoundReason::NoEvidence => "no_evidence",
                };
                events::not_found(decision.route.as_str(), reason);
                None
            }
            QueryStatus::Found if options.generate_answer => {
                let request = AnswerRequest {
                    query: text.to_string(),
                    tenant_id: tenant.clone(),
                    route: decision.route,
                    evidence: found.clone(),
                    partial_answers: retrieved.partial_answers,
                };
                self.generate(&request, &mut diagnostics).await
            }
            QueryStatus::Found => None,
        };

        diagnostics.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            query_id,
            route = %decision.route,
            evidence = found.len(),
            not_found = matches!(status, QueryStatus::NotFound { .. }),
            failures = diagnostics.partial_failures.len(),
            elapsed_ms = diagnostics.elapsed_ms,
            "query completed"
        );

        Ok(QueryResult {
            query_id: query_id.to_string(),
            tenant_id: tenant.clone(),
            route_used: decision.route,
            route_decision: decision,
            status,
            evidence: found,
            answer,
            diagnostics,
        })
    }

    /// Fetch the tenant's index version. Any failure or overrun here means
    /// the store is unreachable. A changed version drops the tenant's cached
    /// results.
    async fn preflight(&self, tenant: &TenantId) -> StrandResult<IndexVersion> {
        let timeout_ms = self.config.query.store_timeout_ms;
        let version = match tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.store.index_version(tenant),
        )
        .await
        {
            Ok(Ok(version)) => version,
            Ok(Err(e @ StrandError::GraphError(GraphError::Unavailable { .. }))) => return Err(e),
            Ok(Err(e)) => {
                return Err(GraphError::Unavailable {
                    reason: e.to_string(),
                }
                .into())
            }
            Err(_) => {
                return Err(GraphError::Unavailable {
                    reason: format!("index_version timed out after {timeout_ms}ms"),
                }
                .into())
            }
        };
        if let VersionChange::Changed { previous } = self.versions.observe(tenant, version) {
            info!(
                tenant = %tenant,
                previous = previous.0,
                current = version.0,
                "index version changed, invalidating caches"
            );
            self.walker.invalidate_tenant(tenant);
            self.community_cache.invalidate_tenant(tenant);
        }
        Ok(version)
    }

    async fn fast_lookup(
        &self,
        ctx: &QueryContext<'_>,
        text: &str,
        top_k: usize,
        diagnostics: &mut QueryDiagnostics,
    ) -> Retrieved {
        let outcome = self.searcher.search(ctx, text, top_k).await;
        diagnostics.partial_failures.extend(outcome.failures.iter().cloned());
        let found = outcome.to_evidence(EvidenceSource::Fusion);
        if found.is_empty() {
            return Retrieved::not_found(NotFoundReason::NoEvidence);
        }
        Retrieved {
            evidence: found,
            ..Retrieved::default()
        }
    }

    async fn entity_focused(
        &self,
        ctx: &QueryContext<'_>,
        text: &str,
        inherited: &[String],
        top_k: usize,
        token: &CancellationToken,
        diagnostics: &mut QueryDiagnostics,
    ) -> StrandResult<Retrieved> {
        let resolution = self
            .resolver
            .resolve_terms(ctx, terms::extract_terms_with_context(text, inherited))
            .await;
        record_resolution(diagnostics, &resolution);
        if resolution.is_no_seeds() {
            return Ok(Retrieved::not_found(NotFoundReason::NoSeeds));
        }
        self.walk_seeds(ctx, &resolution.seeds, top_k, token, diagnostics)
            .await
    }

    async fn thematic(
        &self,
        ctx: &QueryContext<'_>,
        text: &str,
        inherited: &[String],
        top_k: usize,
        token: &CancellationToken,
        diagnostics: &mut QueryDiagnostics,
    ) -> StrandResult<Retrieved> {
        let resolution = self
            .resolver
            .resolve_terms(ctx, terms::extract_terms_with_context(text, inherited))
            .await;
        record_resolution(diagnostics, &resolution);

        let community = self.community_seeds(ctx, text, diagnostics).await;
        if !community.is_empty() {
            *diagnostics
                .seeds_per_tier
                .entry(SeedTier::Community)
                .or_default() += community.len();
        }

        let seeds = merge_candidates(
            resolution.seeds.iter().cloned().chain(community.iter().cloned()),
            self.config.seeds.max_seeds,
        );
        diagnostics.seed_count = seeds.len();
        if seeds.is_empty() {
            return Ok(Retrieved::not_found(NotFoundReason::NoSeeds));
        }
        self.walk_seeds(ctx, &seeds, top_k, token, diagnostics).await
    }

    /// Community candidates, tenant-filtered and rescaled so the strongest
    /// carries the community tier weight. Cached per tenant, version and query.
    async fn community_seeds(
        &self,
        ctx: &QueryContext<'_>,
        text: &str,
        diagnostics: &mut QueryDiagnostics,
    ) -> Arc<Vec<SeedCandidate>> {
        let Some(provider) = self.community.as_ref() else {
            return Arc::new(Vec::new());
        };
        let key = CacheKey::new(ctx.tenant, ctx.version, &["community", text]);
        if let Some(cached) = self.community_cache.get(&key) {
            diagnostics.cache_hits += 1;
            return cached;
        }

        let limit = self.config.query.community_seed_limit;
        let raw = match guarded(
            "community",
            self.config.seeds.tier_timeout_ms,
            provider.thematic_seeds(ctx.tenant, text, limit),
        )
        .await
        {
            Ok(raw) => raw,
            Err(failure) => {
                diagnostics.partial_failures.push(failure);
                return Arc::new(Vec::new());
            }
        };

        let owned: Vec<SeedCandidate> = raw
            .into_iter()
            .filter(|c| {
                let ok = &c.tenant_id == ctx.tenant;
                if !ok {
                    events::tenant_violation(ctx.tenant.as_str(), c.tenant_id.as_str(), "community");
                }
                ok && c.weight.is_finite() && c.weight > 0.0
            })
            .take(limit)
            .collect();
        let max = owned.iter().map(|c| c.weight).fold(0.0_f64, f64::max);
        let weight = self.config.seeds.community_weight;
        let scaled: Vec<SeedCandidate> = owned
            .into_iter()
            .map(|mut c| {
                c.weight = weight * c.weight / max;
                c.tier = SeedTier::Community;
                c
            })
            .collect();

        let scaled = Arc::new(scaled);
        self.community_cache.insert(key, scaled.clone());
        scaled
    }

    async fn walk_seeds(
        &self,
        ctx: &QueryContext<'_>,
        seeds: &[SeedCandidate],
        top_k: usize,
        token: &CancellationToken,
        diagnostics: &mut QueryDiagnostics,
    ) -> StrandResult<Retrieved> {
        let walk = match self.walker.walk(ctx, seeds, top_k, token).await {
            Ok(walk) => walk,
            Err(e) if is_fatal(&e) => return Err(e),
            Err(e) => {
                diagnostics.partial_failures.push(contain("walk", &e));
                WalkOutcome::default()
            }
        };
        record_walk(diagnostics, &walk);
        if walk.evidence.is_empty() {
            return Ok(Retrieved::not_found(NotFoundReason::NoEvidence));
        }
        Ok(Retrieved {
            evidence: walk.evidence,
            ..Retrieved::default()
        })
    }

    async fn multi_hop(
        &self,
        ctx: &QueryContext<'_>,
        text: &str,
        top_k: usize,
        token: &CancellationToken,
        diagnostics: &mut QueryDiagnostics,
    ) -> StrandResult<Retrieved> {
        let retrievers = Retrievers {
            resolver: &self.resolver,
            walker: &self.walker,
            searcher: &self.searcher,
        };
        let report = self.drift.run(text, ctx, &retrievers, top_k, token).await?;

        diagnostics.drift_iterations = Some(report.iterations);
        diagnostics.drift_confidence = Some(report.confidence);
        diagnostics.drift_termination = Some(report.termination);
        diagnostics.sub_questions_total = report.outcomes.len();
        diagnostics.sub_questions_answered = report.answered();
        diagnostics.cache_hits += report.cache_hits;
        diagnostics.record_tiers(&report.seeds_per_tier);
        diagnostics.seed_count = report.outcomes.iter().map(|o| o.seed_count).sum();
        diagnostics.partial_failures.extend(report.failures);
        debug!(
            iterations = report.iterations,
            loop_transitions = report.loop_transitions,
            "drift finished"
        );

        if report.evidence.is_empty() {
            let reason = if diagnostics.seed_count == 0 {
                NotFoundReason::NoSeeds
            } else {
                NotFoundReason::NoEvidence
            };
            return Ok(Retrieved::not_found(reason));
        }
        Ok(Retrieved {
            evidence: report.evidence,
            partial_answers: report.partial_answers,
            not_found: None,
        })
    }

    /// Hand the packaged evidence to the answer generator, if one is set.
    /// A failed or late generator leaves the answer empty.
    async fn generate(
        &self,
        request: &AnswerRequest,
        diagnostics: &mut QueryDiagnostics,
    ) -> Option<String> {
        let generator = self.generator.as_ref()?;
        diagnostics.generator_invoked = true;
        match guarded(
            "answer_generator",
            self.config.query.generator_timeout_ms,
            generator.generate(request),
        )
        .await
        {
            Ok(answer) => Some(answer),
            Err(failure) => {
                diagnostics.partial_failures.push(failure);
                None
            }
        }
    }
}

fn record_resolution(diagnostics: &mut QueryDiagnostics, resolution: &SeedResolution) {
    diagnostics.record_tiers(&resolution.per_tier);
    diagnostics.seed_count = resolution.seeds.len();
    diagnostics.unmatched_terms = resolution.unmatched_terms.clone();
    diagnostics
        .partial_failures
        .extend(resolution.failures.iter().cloned());
}

fn record_walk(diagnostics: &mut QueryDiagnostics, walk: &WalkOutcome) {
    if walk.cache_hit {
        diagnostics.cache_hits += 1;
    }
    if walk.node_count > 0 {
        diagnostics.ppr_iterations = Some(walk.iterations);
        diagnostics.ppr_converged = Some(walk.converged);
        diagnostics.ppr_damping = Some(walk.damping);
    }
}
