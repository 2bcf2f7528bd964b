//! In-memory [`IGraphStore`] with tenant partitions and fault injection.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use strand_core::errors::{GraphError, StrandResult};
use strand_core::models::{
    Edge, IndexVersion, Node, NodeClass, ScoredNode, Subgraph, TenantId,
};
use strand_core::similarity::{cosine_similarity, token_jaccard};
use strand_core::traits::IGraphStore;

use crate::lock;
use crate::services::{hash_embedding, EMBEDDING_DIMS};
use crate::text::tokens;

/// Cosine floor below which vector search returns nothing, as a vector
/// index with a distance threshold would.
pub const DEFAULT_VECTOR_FLOOR: f64 = 0.3;

/// A tenant graph as stored under `graphs/*.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphFixture {
    pub tenant: String,
    #[serde(default = "first_version")]
    pub version: u64,
    pub nodes: Vec<NodeFixture>,
    #[serde(default)]
    pub edges: Vec<EdgeFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeFixture {
    pub id: String,
    pub class: NodeClass,
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub importance: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// An undirected edge; loaded as two directed edges.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeFixture {
    pub source: String,
    pub target: String,
    #[serde(default = "related_to")]
    pub relation: String,
    #[serde(default = "unit_weight")]
    pub weight: f64,
}

fn first_version() -> u64 {
    1
}

fn related_to() -> String {
    "related_to".to_string()
}

fn unit_weight() -> f64 {
    1.0
}

#[derive(Debug)]
struct Partition {
    version: u64,
    nodes: BTreeMap<String, Node>,
    out: BTreeMap<String, Vec<Edge>>,
}

impl Partition {
    fn new() -> Self {
        Self {
            version: first_version(),
            nodes: BTreeMap::new(),
            out: BTreeMap::new(),
        }
    }
}

fn class_ok(node: &Node, class: Option<NodeClass>) -> bool {
    class.map_or(true, |c| node.class == c)
}

fn searchable_text(node: &Node) -> String {
    format!("{} {} {}", node.name, node.text, node.aliases.join(" "))
}

fn ranked(mut hits: Vec<ScoredNode>, limit: usize) -> Vec<ScoredNode> {
    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.node.id.cmp(&b.node.id))
    });
    hits.truncate(limit);
    hits
}

/// Thread-safe in-memory graph store.
///
/// Every call is counted per method and records the tenant it was made for.
/// Calls can be slowed down, failed per method, or failed wholesale with
/// [`GraphError::Unavailable`]. Nodes registered with
/// [`leak_foreign`](Self::leak_foreign) are returned to every tenant, which
/// lets tests check that callers re-filter by tenant.
pub struct InMemoryGraphStore {
    partitions: DashMap<TenantId, Partition>,
    calls: DashMap<&'static str, usize>,
    failing: DashMap<&'static str, String>,
    unavailable: AtomicBool,
    latency_ms: AtomicU64,
    method_latency_ms: DashMap<&'static str, u64>,
    vector_floor: f64,
    leaked: Mutex<Vec<Node>>,
    tenants_seen: Mutex<Vec<TenantId>>,
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self {
            partitions: DashMap::new(),
            calls: DashMap::new(),
            failing: DashMap::new(),
            unavailable: AtomicBool::new(false),
            latency_ms: AtomicU64::new(0),
            method_latency_ms: DashMap::new(),
            vector_floor: DEFAULT_VECTOR_FLOOR,
            leaked: Mutex::new(Vec::new()),
            tenants_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_vector_floor(mut self, floor: f64) -> Self {
        self.vector_floor = floor;
        self
    }

    /// Load a fixture graph into its tenant's partition.
    pub fn load(&self, fixture: GraphFixture) {
        let tenant = TenantId::new(fixture.tenant);
        for n in fixture.nodes {
            let mut node = match n.class {
                NodeClass::Entity => Node::entity(n.id, tenant.clone(), n.name),
                NodeClass::Passage => Node::passage(n.id, tenant.clone(), n.name, n.text),
            };
            node.aliases = n.aliases;
            node.importance = n.importance;
            node.metadata = n.metadata;
            self.add_node(node);
        }
        for e in fixture.edges {
            self.add_edge(&tenant, &e.source, &e.target, &e.relation, e.weight);
        }
        self.partitions
            .entry(tenant)
            .or_insert_with(Partition::new)
            .version = fixture.version;
    }

    /// Insert a node into its tenant's partition, embedding it if needed.
    pub fn add_node(&self, mut node: Node) {
        if node.embedding.is_none() {
            node.embedding = Some(hash_embedding(&searchable_text(&node), EMBEDDING_DIMS));
        }
        self.partitions
            .entry(node.tenant_id.clone())
            .or_insert_with(Partition::new)
            .nodes
            .insert(node.id.clone(), node);
    }

    /// Add a logical edge as a pair of directed edges and update degrees.
    pub fn add_edge(&self, tenant: &TenantId, source: &str, target: &str, relation: &str, weight: f64) {
        let mut partition = self
            .partitions
            .entry(tenant.clone())
            .or_insert_with(Partition::new);
        for edge in Edge::bidirectional(source, target, relation, weight, tenant) {
            if let Some(node) = partition.nodes.get_mut(&edge.source_id) {
                node.degree += 1;
            }
            partition
                .out
                .entry(edge.source_id.clone())
                .or_default()
                .push(edge);
        }
    }

    /// Simulate a re-index. Returns the new version.
    pub fn bump_version(&self, tenant: &TenantId) -> IndexVersion {
        let mut partition = self
            .partitions
            .entry(tenant.clone())
            .or_insert_with(Partition::new);
        partition.version += 1;
        IndexVersion(partition.version)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make every call to `method` fail with `GraphError::QueryFailed`.
    pub fn fail_method(&self, method: &'static str, message: &str) {
        self.failing.insert(method, message.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.clear();
        self.set_unavailable(false);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Slow down `method` only. Overrides [`set_latency`](Self::set_latency).
    pub fn delay_method(&self, method: &'static str, latency: Duration) {
        self.method_latency_ms
            .insert(method, latency.as_millis() as u64);
    }

    /// Return `node` from every lookup regardless of the tenant asked for.
    pub fn leak_foreign(&self, node: Node) {
        lock(&self.leaked).push(node);
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.get(method).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| *c.value()).sum()
    }

    /// Tenants passed to the store, in call order.
    pub fn tenants_seen(&self) -> Vec<TenantId> {
        lock(&self.tenants_seen).clone()
    }

    pub fn node_count(&self, tenant: &TenantId) -> usize {
        self.partitions
            .get(tenant)
            .map(|p| p.nodes.len())
            .unwrap_or(0)
    }

    pub fn node(&self, tenant: &TenantId, id: &str) -> Option<Node> {
        self.partitions
            .get(tenant)
            .and_then(|p| p.nodes.get(id).cloned())
    }

    async fn preamble(&self, method: &'static str, tenant: &TenantId) -> StrandResult<()> {
        *self.calls.entry(method).or_default() += 1;
        lock(&self.tenants_seen).push(tenant.clone());

        let latency = self
            .method_latency_ms
            .get(method)
            .map(|l| *l)
            .unwrap_or_else(|| self.latency_ms.load(Ordering::SeqCst));
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GraphError::Unavailable {
                reason: "in-memory store offline".to_string(),
            }
            .into());
        }
        if let Some(message) = self.failing.get(method).map(|m| m.clone()) {
            return Err(GraphError::QueryFailed { reason: message }.into());
        }
        Ok(())
    }

    /// Own-tenant nodes plus leaked nodes, filtered by `keep`.
    fn select(&self, tenant: &TenantId, keep: impl Fn(&Node) -> bool) -> Vec<Node> {
        let mut out: Vec<Node> = self
            .partitions
            .get(tenant)
            .map(|p| p.nodes.values().filter(|n| keep(n)).cloned().collect())
            .unwrap_or_default();
        out.extend(lock(&self.leaked).iter().filter(|n| keep(n)).cloned());
        out
    }

    fn score_all(
        &self,
        tenant: &TenantId,
        class: Option<NodeClass>,
        limit: usize,
        score: impl Fn(&Node) -> f64,
    ) -> Vec<ScoredNode> {
        let hits = self
            .select(tenant, |n| class_ok(n, class))
            .into_iter()
            .filter_map(|node| {
                let s = score(&node);
                (s > 0.0).then_some(ScoredNode { node, score: s })
            })
            .collect();
        ranked(hits, limit)
    }
}

#[async_trait]
impl IGraphStore for InMemoryGraphStore {
    async fn index_version(&self, tenant: &TenantId) -> StrandResult<IndexVersion> {
        self.preamble("index_version", tenant).await?;
        Ok(IndexVersion(
            self.partitions.get(tenant).map(|p| p.version).unwrap_or(0),
        ))
    }

    async fn find_by_name(
        &self,
        tenant: &TenantId,
        name: &str,
        class: Option<NodeClass>,
    ) -> StrandResult<Vec<Node>> {
        self.preamble("find_by_name", tenant).await?;
        let wanted = name.trim().to_lowercase();
        Ok(self.select(tenant, |n| {
            class_ok(n, class) && n.name.to_lowercase() == wanted
        }))
    }

    async fn find_by_alias(
        &self,
        tenant: &TenantId,
        alias: &str,
        class: Option<NodeClass>,
    ) -> StrandResult<Vec<Node>> {
        self.preamble("find_by_alias", tenant).await?;
        let wanted = alias.trim().to_lowercase();
        Ok(self.select(tenant, |n| {
            class_ok(n, class) && n.aliases.iter().any(|a| a.to_lowercase() == wanted)
        }))
    }

    async fn find_by_partial_name(
        &self,
        tenant: &TenantId,
        fragment: &str,
        class: Option<NodeClass>,
        limit: usize,
    ) -> StrandResult<Vec<ScoredNode>> {
        self.preamble("find_by_partial_name", tenant).await?;
        let fragment = fragment.trim().to_lowercase();
        if fragment.is_empty() {
            return Ok(Vec::new());
        }
        let fragment_len = fragment.chars().count();
        Ok(self.score_all(tenant, class, limit, |node| {
            let name = node.name.to_lowercase();
            if name == fragment {
                1.0
            } else if fragment_len >= 3 && name.contains(&fragment) {
                0.5 + 0.5 * fragment_len as f64 / name.chars().count() as f64
            } else {
                token_jaccard(&fragment, &name)
            }
        }))
    }

    async fn search_full_text(
        &self,
        tenant: &TenantId,
        query: &str,
        class: Option<NodeClass>,
        limit: usize,
    ) -> StrandResult<Vec<ScoredNode>> {
        self.preamble("search_full_text", tenant).await?;
        let wanted: HashSet<String> = tokens(query).into_iter().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.score_all(tenant, class, limit, |node| {
            let have: HashSet<String> = tokens(&searchable_text(node)).into_iter().collect();
            wanted.intersection(&have).count() as f64 / wanted.len() as f64
        }))
    }

    async fn search_vector(
        &self,
        tenant: &TenantId,
        embedding: &[f32],
        class: Option<NodeClass>,
        limit: usize,
    ) -> StrandResult<Vec<ScoredNode>> {
        self.preamble("search_vector", tenant).await?;
        let floor = self.vector_floor;
        Ok(self.score_all(tenant, class, limit, |node| {
            let sim = node
                .embedding
                .as_deref()
                .map(|e| cosine_similarity(embedding, e))
                .unwrap_or(0.0);
            if sim >= floor {
                sim
            } else {
                0.0
            }
        }))
    }

    async fn neighbors(
        &self,
        tenant: &TenantId,
        node_ids: &[String],
        class: Option<NodeClass>,
        limit: usize,
    ) -> StrandResult<Vec<Node>> {
        self.preamble("neighbors", tenant).await?;
        let Some(partition) = self.partitions.get(tenant) else {
            return Ok(Vec::new());
        };
        let origin: HashSet<&str> = node_ids.iter().map(String::as_str).collect();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for id in node_ids {
            for edge in partition.out.get(id).into_iter().flatten() {
                let target = edge.target_id.as_str();
                if origin.contains(target) || !seen.insert(target) {
                    continue;
                }
                if let Some(node) = partition.nodes.get(target) {
                    if class_ok(node, class) {
                        out.push(node.clone());
                    }
                }
            }
        }
        out.truncate(limit);
        Ok(out)
    }

    async fn expand_neighborhood(
        &self,
        tenant: &TenantId,
        seed_ids: &[String],
        max_hops: usize,
        max_nodes: usize,
    ) -> StrandResult<Subgraph> {
        self.preamble("expand_neighborhood", tenant).await?;
        let mut subgraph = Subgraph::default();
        if let Some(partition) = self.partitions.get(tenant) {
            let mut visited: Vec<String> = Vec::new();
            let mut seen: HashSet<String> = HashSet::new();
            let mut queue: VecDeque<(String, usize)> = VecDeque::new();
            for id in seed_ids {
                if partition.nodes.contains_key(id) && seen.insert(id.clone()) {
                    queue.push_back((id.clone(), 0));
                }
            }
            while let Some((id, hops)) = queue.pop_front() {
                if visited.len() >= max_nodes {
                    break;
                }
                visited.push(id.clone());
                if hops >= max_hops {
                    continue;
                }
                for edge in partition.out.get(&id).into_iter().flatten() {
                    if seen.insert(edge.target_id.clone()) {
                        queue.push_back((edge.target_id.clone(), hops + 1));
                    }
                }
            }

            let kept: HashSet<&str> = visited.iter().map(String::as_str).collect();
            subgraph.nodes = visited
                .iter()
                .filter_map(|id| partition.nodes.get(id).cloned())
                .collect();
            subgraph.edges = visited
                .iter()
                .flat_map(|id| partition.out.get(id).into_iter().flatten())
                .filter(|e| kept.contains(e.target_id.as_str()))
                .cloned()
                .collect();
        }
        subgraph.nodes.extend(lock(&self.leaked).iter().cloned());
        Ok(subgraph)
    }

    async fn get_nodes(&self, tenant: &TenantId, ids: &[String]) -> StrandResult<Vec<Node>> {
        self.preamble("get_nodes", tenant).await?;
        Ok(self
            .partitions
            .get(tenant)
            .map(|p| ids.iter().filter_map(|id| p.nodes.get(id).cloned()).collect())
            .unwrap_or_default())
    }
}
