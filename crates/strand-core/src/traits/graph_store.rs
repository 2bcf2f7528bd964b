use async_trait::async_trait;

use crate::errors::StrandResult;
use crate::models::{IndexVersion, Node, NodeClass, ScoredNode, Subgraph, TenantId};

/// Tenant-scoped, read-only graph query interface.
///
/// Every method takes the tenant id and must only return data owned by that tenant.
/// Callers re-check tenant ids on everything returned.
#[async_trait]
pub trait IGraphStore: Send + Sync {
    /// Current index version for the tenant. Also serves as a reachability probe.
    async fn index_version(&self, tenant: &TenantId) -> StrandResult<IndexVersion>;

    // --- Name lookup ---

    /// Nodes whose name equals `name`, case-insensitively.
    async fn find_by_name(
        &self,
        tenant: &TenantId,
        name: &str,
        class: Option<NodeClass>,
    ) -> StrandResult<Vec<Node>>;

    /// Nodes with an alias or synonym equal to `alias`, case-insensitively.
    async fn find_by_alias(
        &self,
        tenant: &TenantId,
        alias: &str,
        class: Option<NodeClass>,
    ) -> StrandResult<Vec<Node>>;

    /// Partial/fuzzy name matches, scored in [0, 1].
    async fn find_by_partial_name(
        &self,
        tenant: &TenantId,
        fragment: &str,
        class: Option<NodeClass>,
        limit: usize,
    ) -> StrandResult<Vec<ScoredNode>>;

    // --- Search ---

    /// Full-text search over node names and text, best first.
    async fn search_full_text(
        &self,
        tenant: &TenantId,
        query: &str,
        class: Option<NodeClass>,
        limit: usize,
    ) -> StrandResult<Vec<ScoredNode>>;

    /// Cosine similarity search, best first. Scores are cosine similarities.
    async fn search_vector(
        &self,
        tenant: &TenantId,
        embedding: &[f32],
        class: Option<NodeClass>,
        limit: usize,
    ) -> StrandResult<Vec<ScoredNode>>;

    // --- Expansion ---

    /// Direct neighbors of the given nodes, optionally filtered by class.
    async fn neighbors(
        &self,
        tenant: &TenantId,
        node_ids: &[String],
        class: Option<NodeClass>,
        limit: usize,
    ) -> StrandResult<Vec<Node>>;

    /// Bounded breadth-first expansion around `seed_ids`, seeds included.
    async fn expand_neighborhood(
        &self,
        tenant: &TenantId,
        seed_ids: &[String],
        max_hops: usize,
        max_nodes: usize,
    ) -> StrandResult<Subgraph>;

    /// Fetch nodes by id. Unknown ids are skipped.
    async fn get_nodes(&self, tenant: &TenantId, ids: &[String]) -> StrandResult<Vec<Node>>;
}
