//! Graph nodes, edges, and the bounded subgraphs returned by neighbor expansion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tenant::TenantId;

/// The two node classes of the unified graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// Traversal infrastructure. Never returned as evidence.
    Entity,
    /// Retrievable evidence unit.
    Passage,
}

/// A graph node. Owned by the graph store and read-only at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub tenant_id: TenantId,
    pub class: NodeClass,
    pub name: String,
    /// Passage body, or entity description.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub degree: usize,
    /// Authority score in [0, 1].
    #[serde(default)]
    pub importance: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Node {
    pub fn entity(id: impl Into<String>, tenant_id: TenantId, name: impl Into<String>) -> Self {
        Self::new(id, tenant_id, NodeClass::Entity, name, String::new())
    }

    pub fn passage(
        id: impl Into<String>,
        tenant_id: TenantId,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(id, tenant_id, NodeClass::Passage, name, text)
    }

    fn new(
        id: impl Into<String>,
        tenant_id: TenantId,
        class: NodeClass,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tenant_id,
            class,
            name: name.into(),
            text: text.into(),
            aliases: Vec::new(),
            embedding: None,
            degree: 0,
            importance: 0.0,
            metadata: BTreeMap::new(),
        }
    }

    pub fn is_passage(&self) -> bool {
        self.class == NodeClass::Passage
    }

    pub fn belongs_to(&self, tenant: &TenantId) -> bool {
        &self.tenant_id == tenant
    }
}

/// A directed, weighted, typed edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub relation: String,
    pub weight: f64,
    pub tenant_id: TenantId,
}

impl Edge {
    /// A logical edge stored as a pair of directed edges, so walk mass flows both ways.
    pub fn bidirectional(
        source_id: &str,
        target_id: &str,
        relation: &str,
        weight: f64,
        tenant_id: &TenantId,
    ) -> [Edge; 2] {
        [
            Edge {
                source_id: source_id.to_string(),
                target_id: target_id.to_string(),
                relation: relation.to_string(),
                weight,
                tenant_id: tenant_id.clone(),
            },
            Edge {
                source_id: target_id.to_string(),
                target_id: source_id.to_string(),
                relation: relation.to_string(),
                weight,
                tenant_id: tenant_id.clone(),
            },
        ]
    }
}

/// A node with a backend-specific relevance score (full-text, fuzzy, cosine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNode {
    pub node: Node,
    pub score: f64,
}

/// Nodes and edges returned by bounded neighbor expansion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Subgraph {
    /// Drop every node and edge not owned by `tenant`. Returns how many were dropped.
    pub fn retain_tenant(&mut self, tenant: &TenantId) -> usize {
        let before = self.nodes.len() + self.edges.len();
        self.nodes.retain(|n| &n.tenant_id == tenant);
        self.edges.retain(|e| &e.tenant_id == tenant);
        before - (self.nodes.len() + self.edges.len())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
