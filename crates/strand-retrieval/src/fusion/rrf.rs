//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines the lexical and vector rankings without normalizing their raw
//! scores against each other. Ranks are 1-based.

use std::collections::HashMap;

/// A candidate after RRF fusion.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedCandidate {
    pub node_id: String,
    /// Fused RRF score (higher = more relevant).
    pub rrf_score: f64,
    pub lexical_rank: Option<usize>,
    pub vector_rank: Option<usize>,
}

/// Fuse two ranked id lists.
///
/// An id absent from a list contributes nothing for that list; repeated ids
/// within a list count at their first position. Equal scores keep order of
/// first appearance, lexical list first. Either list may be empty.
pub fn fuse(lexical: &[String], vector: &[String], k: u32) -> Vec<FusedCandidate> {
    let mut order: Vec<FusedCandidate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (list, is_lexical) in [(lexical, true), (vector, false)] {
        for (i, id) in list.iter().enumerate() {
            let rank = i + 1;
            let slot = *index.entry(id.as_str()).or_insert_with(|| {
                order.push(FusedCandidate {
                    node_id: id.clone(),
                    rrf_score: 0.0,
                    lexical_rank: None,
                    vector_rank: None,
                });
                order.len() - 1
            });
            let candidate = &mut order[slot];
            let seen = if is_lexical {
                &mut candidate.lexical_rank
            } else {
                &mut candidate.vector_rank
            };
            if seen.is_none() {
                *seen = Some(rank);
                candidate.rrf_score += 1.0 / (k as f64 + rank as f64);
            }
        }
    }

    // Stable sort keeps first-appearance order among equal scores.
    order.sort_by(|a, b| b.rrf_score.total_cmp(&a.rrf_score));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn both_lists_contribute() {
        let fused = fuse(&ids(&["a", "b"]), &ids(&["b", "c"]), 60);
        assert_eq!(fused[0].node_id, "b");
        let expected = 1.0 / 62.0 + 1.0 / 61.0;
        assert!((fused[0].rrf_score - expected).abs() < 1e-12);
        assert_eq!(fused[0].lexical_rank, Some(2));
        assert_eq!(fused[0].vector_rank, Some(1));
    }

    #[test]
    fn ties_keep_first_appearance() {
        let fused = fuse(&ids(&["a"]), &ids(&["z"]), 60);
        let order: Vec<_> = fused.iter().map(|c| c.node_id.as_str()).collect();
        assert_eq!(order, vec!["a", "z"]);
    }

    #[test]
    fn duplicates_count_once() {
        let fused = fuse(&ids(&["a", "a"]), &[], 60);
        assert_eq!(fused.len(), 1);
        assert!((fused[0].rrf_score - 1.0 / 61.0).abs() < 1e-12);
    }

    #[test]
    fn empty_inputs() {
        assert!(fuse(&[], &[], 60).is_empty());
        let only_vector = fuse(&[], &ids(&["x", "y"]), 60);
        let order: Vec<_> = only_vector.iter().map(|c| c.node_id.as_str()).collect();
        assert_eq!(order, vec!["x", "y"]);
    }
}
