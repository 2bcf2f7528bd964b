//! Row-normalized transition structure in pull form.

use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::UnifiedGraph;

/// For every node `v`, the list of `(u, P(u → v))` over incoming edges, plus
/// which nodes have no outgoing weight.
#[derive(Debug, Clone)]
pub struct Transition {
    pub incoming: Vec<Vec<(usize, f64)>>,
    pub dangling: Vec<bool>,
}

impl Transition {
    pub fn build(graph: &UnifiedGraph) -> Self {
        let n = graph.node_count();
        let mut incoming: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let mut dangling = vec![true; n];

        for u in graph.graph.node_indices() {
            let out_sum: f64 = graph
                .graph
                .edges_directed(u, Direction::Outgoing)
                .map(|e| *e.weight())
                .sum();
            if out_sum <= 0.0 {
                continue;
            }
            dangling[u.index()] = false;
            for edge in graph.graph.edges_directed(u, Direction::Outgoing) {
                incoming[edge.target().index()].push((u.index(), *edge.weight() / out_sum));
            }
        }

        // Fixed summation order regardless of petgraph's adjacency order.
        for list in &mut incoming {
            list.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
        }

        Self { incoming, dangling }
    }

    pub fn len(&self) -> usize {
        self.dangling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dangling.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_core::models::{Edge, Node, Subgraph, TenantId};

    #[test]
    fn rows_sum_to_one() {
        let t = TenantId::new("t");
        let mut edges = Vec::new();
        edges.extend(Edge::bidirectional("a", "b", "r", 2.0, &t));
        edges.extend(Edge::bidirectional("a", "c", "r", 1.0, &t));
        let sub = Subgraph {
            nodes: vec![
                Node::entity("a", t.clone(), "A"),
                Node::entity("b", t.clone(), "B"),
                Node::entity("c", t.clone(), "C"),
                Node::entity("d", t.clone(), "D"),
            ],
            edges,
        };
        let graph = UnifiedGraph::from_subgraph(&t, &sub);
        let tr = Transition::build(&graph);

        let mut out = vec![0.0; tr.len()];
        for list in &tr.incoming {
            for (u, p) in list {
                out[*u] += p;
            }
        }
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] - 1.0).abs() < 1e-12);
        assert!(tr.dangling[3]);
        assert!(!tr.dangling[0]);
    }
}
