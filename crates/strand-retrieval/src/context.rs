//! Borrowed per-query handles passed down the pipeline.

use strand_core::models::{IndexVersion, TenantId};
use strand_core::traits::{IEmbeddingService, IGraphStore, ILlmService};

use crate::fusion::HybridSearcher;
use crate::seeds::SeedResolver;
use crate::walk::GraphWalker;

/// Collaborators and identity for one query. Every lookup goes through `tenant`.
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub tenant: &'a TenantId,
    pub version: IndexVersion,
    pub store: &'a dyn IGraphStore,
    pub embedder: &'a dyn IEmbeddingService,
    pub llm: Option<&'a dyn ILlmService>,
    pub embed_timeout_ms: u64,
}

/// The retrieval engines shared by every route.
#[derive(Clone, Copy)]
pub struct Retrievers<'a> {
    pub resolver: &'a SeedResolver,
    pub walker: &'a GraphWalker,
    pub searcher: &'a HybridSearcher,
}
