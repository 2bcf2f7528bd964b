//! Within-tier normalization and cross-tier merging of seed candidates.

use std::collections::{BTreeMap, HashMap};

use strand_core::config::SeedConfig;
use strand_core::models::{SeedCandidate, SeedTier, TenantId};

/// A backend match before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    pub node_id: String,
    pub tenant_id: TenantId,
    pub score: f64,
    pub term: String,
}

/// Configured weight of a tier.
pub fn tier_weight(config: &SeedConfig, tier: SeedTier) -> f64 {
    match tier {
        SeedTier::ExactName => config.exact_weight,
        SeedTier::Alias => config.alias_weight,
        SeedTier::Fuzzy => config.fuzzy_weight,
        SeedTier::FullText => config.full_text_weight,
        SeedTier::Structural => config.structural_weight,
        SeedTier::Vector => config.vector_weight,
        SeedTier::Community => config.community_weight,
    }
}

/// Keep the best `per_term` matches of each term, scale scores by the tier
/// maximum, and multiply by `weight`. Non-positive scaled weights are dropped.
pub fn normalize_tier(
    matches: Vec<RawMatch>,
    tier: SeedTier,
    weight: f64,
    strategy: &str,
    per_term: usize,
) -> Vec<SeedCandidate> {
    let mut by_term: BTreeMap<String, Vec<RawMatch>> = BTreeMap::new();
    for m in matches {
        if m.score.is_finite() {
            by_term.entry(m.term.to_lowercase()).or_default().push(m);
        }
    }

    let mut kept = Vec::new();
    for (_, mut group) in by_term {
        group.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.node_id.cmp(&b.node_id))
        });
        group.truncate(per_term.max(1));
        kept.extend(group);
    }

    let max = kept.iter().map(|m| m.score).fold(0.0_f64, f64::max);
    kept.into_iter()
        .filter_map(|m| {
            let scaled = if max > 0.0 { weight * (m.score / max) } else { weight };
            (scaled > 0.0).then(|| SeedCandidate {
                node_id: m.node_id,
                tenant_id: m.tenant_id,
                weight: scaled.min(weight),
                tier,
                strategy: strategy.to_string(),
                term: m.term,
            })
        })
        .collect()
}

/// Merge candidates by node id keeping the highest weight (earlier tier on
/// ties), sort by weight descending then node id, and cap at `max_seeds`.
pub fn merge_candidates(
    candidates: impl IntoIterator<Item = SeedCandidate>,
    max_seeds: usize,
) -> Vec<SeedCandidate> {
    let mut best: HashMap<String, SeedCandidate> = HashMap::new();
    for candidate in candidates {
        match best.get(&candidate.node_id) {
            Some(existing)
                if existing.weight > candidate.weight
                    || (existing.weight == candidate.weight && existing.tier <= candidate.tier) => {}
            _ => {
                best.insert(candidate.node_id.clone(), candidate);
            }
        }
    }
    let mut merged: Vec<SeedCandidate> = best.into_values().collect();
    merged.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.node_id.cmp(&b.node_id))
    });
    merged.truncate(max_seeds);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, term: &str, score: f64) -> RawMatch {
        RawMatch {
            node_id: id.to_string(),
            tenant_id: TenantId::new("t"),
            score,
            term: term.to_string(),
        }
    }

    fn cand(id: &str, weight: f64, tier: SeedTier) -> SeedCandidate {
        SeedCandidate {
            node_id: id.to_string(),
            tenant_id: TenantId::new("t"),
            weight,
            tier,
            strategy: tier.as_str().to_string(),
            term: "x".to_string(),
        }
    }

    #[test]
    fn normalizes_by_tier_max() {
        let out = normalize_tier(
            vec![raw("a", "x", 8.0), raw("b", "x", 4.0), raw("c", "y", 2.0)],
            SeedTier::FullText,
            0.6,
            "full_text",
            5,
        );
        let a = out.iter().find(|c| c.node_id == "a").unwrap();
        let b = out.iter().find(|c| c.node_id == "b").unwrap();
        let c = out.iter().find(|c| c.node_id == "c").unwrap();
        assert!((a.weight - 0.6).abs() < 1e-12);
        assert!((b.weight - 0.3).abs() < 1e-12);
        assert!((c.weight - 0.15).abs() < 1e-12);
    }

    #[test]
    fn keeps_best_per_term() {
        let out = normalize_tier(
            vec![raw("a", "x", 1.0), raw("b", "x", 3.0), raw("c", "x", 2.0)],
            SeedTier::Fuzzy,
            0.75,
            "fuzzy",
            2,
        );
        let ids: Vec<_> = out.iter().map(|c| c.node_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn merge_keeps_max_weight_and_sorts() {
        let merged = merge_candidates(
            vec![
                cand("b", 0.6, SeedTier::FullText),
                cand("a", 0.6, SeedTier::FullText),
                cand("b", 1.0, SeedTier::ExactName),
                cand("c", 0.2, SeedTier::Vector),
            ],
            2,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].node_id, "b");
        assert_eq!(merged[0].tier, SeedTier::ExactName);
        assert_eq!(merged[1].node_id, "a");
    }

    #[test]
    fn weight_ties_prefer_earlier_tier() {
        let merged = merge_candidates(
            vec![cand("a", 0.5, SeedTier::Structural), cand("a", 0.5, SeedTier::Alias)],
            10,
        );
        assert_eq!(merged[0].tier, SeedTier::Alias);
    }
}
