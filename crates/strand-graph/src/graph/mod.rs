//! petgraph wrapper holding one tenant's entity and passage nodes.

pub mod transition;

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use strand_core::models::{Edge, Node, NodeClass, Subgraph, TenantId};
use tracing::warn;

pub use transition::Transition;

/// A node in the unified graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub node_id: String,
    pub class: NodeClass,
}

/// Directed weighted graph over one tenant's nodes.
///
/// Node indices are contiguous and assigned in sorted id order, so two graphs
/// built from the same subgraph are identical.
pub struct UnifiedGraph {
    /// The petgraph digraph. Edge weights are relation weights.
    pub graph: DiGraph<GraphNode, f64>,
    /// Map from node id → NodeIndex for O(1) lookup.
    pub node_index: HashMap<String, NodeIndex>,
    tenant: TenantId,
}

impl UnifiedGraph {
    /// Create an empty graph for `tenant`.
    pub fn new(tenant: TenantId) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            tenant,
        }
    }

    /// Build from an expanded neighborhood.
    ///
    /// Foreign-tenant nodes and edges, edges with unknown endpoints, and
    /// non-positive or non-finite weights are skipped.
    pub fn from_subgraph(tenant: &TenantId, subgraph: &Subgraph) -> Self {
        let mut graph = Self::new(tenant.clone());

        let mut nodes: Vec<&Node> = subgraph.nodes.iter().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        for node in nodes {
            graph.ensure_node(node);
        }

        let mut edges: Vec<&Edge> = subgraph.edges.iter().collect();
        edges.sort_by(|a, b| {
            (&a.source_id, &a.target_id, &a.relation).cmp(&(&b.source_id, &b.target_id, &b.relation))
        });
        for edge in edges {
            graph.add_edge(edge);
        }

        graph
    }

    /// Get or create the node. Returns `None` for foreign-tenant nodes.
    pub fn ensure_node(&mut self, node: &Node) -> Option<NodeIndex> {
        if node.tenant_id != self.tenant {
            warn!(
                node_id = %node.id,
                expected = %self.tenant,
                found = %node.tenant_id,
                "skipping foreign-tenant node"
            );
            return None;
        }
        if let Some(&idx) = self.node_index.get(&node.id) {
            return Some(idx);
        }
        let idx = self.graph.add_node(GraphNode {
            node_id: node.id.clone(),
            class: node.class,
        });
        self.node_index.insert(node.id.clone(), idx);
        Some(idx)
    }

    /// Add a directed edge. Returns whether it was added.
    pub fn add_edge(&mut self, edge: &Edge) -> bool {
        if edge.tenant_id != self.tenant {
            warn!(
                source = %edge.source_id,
                target = %edge.target_id,
                found = %edge.tenant_id,
                "skipping foreign-tenant edge"
            );
            return false;
        }
        if !edge.weight.is_finite() || edge.weight <= 0.0 {
            return false;
        }
        match (self.get_node(&edge.source_id), self.get_node(&edge.target_id)) {
            (Some(src), Some(dst)) => {
                self.graph.add_edge(src, dst, edge.weight);
                true
            }
            _ => false,
        }
    }

    /// Look up a node index by id.
    pub fn get_node(&self, node_id: &str) -> Option<NodeIndex> {
        self.node_index.get(node_id).copied()
    }

    /// The node stored at `idx`.
    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// Number of outgoing edges.
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantId {
        TenantId::new("t1")
    }

    #[test]
    fn builds_in_sorted_order() {
        let t = tenant();
        let sub = Subgraph {
            nodes: vec![
                Node::entity("b", t.clone(), "B"),
                Node::entity("a", t.clone(), "A"),
            ],
            edges: Edge::bidirectional("a", "b", "rel", 1.0, &t).to_vec(),
        };
        let graph = UnifiedGraph::from_subgraph(&t, &sub);
        assert_eq!(graph.get_node("a").unwrap().index(), 0);
        assert_eq!(graph.get_node("b").unwrap().index(), 1);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn skips_foreign_and_invalid_edges() {
        let t = tenant();
        let other = TenantId::new("t2");
        let mut sub = Subgraph {
            nodes: vec![
                Node::entity("a", t.clone(), "A"),
                Node::entity("b", t.clone(), "B"),
                Node::entity("x", other.clone(), "X"),
            ],
            edges: Vec::new(),
        };
        sub.edges.extend(Edge::bidirectional("a", "b", "rel", 0.0, &t));
        sub.edges.extend(Edge::bidirectional("a", "x", "rel", 1.0, &other));
        sub.edges.extend(Edge::bidirectional("a", "missing", "rel", 1.0, &t));

        let graph = UnifiedGraph::from_subgraph(&t, &sub);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }
}
