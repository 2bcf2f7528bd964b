//! Property tests for routing, fusion and merging.

use proptest::prelude::*;
use strand_core::config::RouterConfig;
use strand_core::models::{
    EvidenceSource, Node, Route, RouteSource, SeedCandidate, SeedTier, TenantId,
};
use strand_retrieval::drift::state::normalize_question;
use strand_retrieval::evidence::{from_node, merge_ranked};
use strand_retrieval::fusion::rrf::fuse;
use strand_retrieval::parse::parse_question_list;
use strand_retrieval::seeds::merge::merge_candidates;
use strand_retrieval::Router;

fn route_strategy() -> impl Strategy<Value = Route> {
    prop_oneof![
        Just(Route::FastLookup),
        Just(Route::EntityFocused),
        Just(Route::Thematic),
        Just(Route::MultiHop),
    ]
}

fn ids(raw: &[u8]) -> Vec<String> {
    raw.iter().map(|i| format!("p{i}")).collect()
}

fn tier(i: u8) -> SeedTier {
    match i % 6 {
        0 => SeedTier::ExactName,
        1 => SeedTier::Alias,
        2 => SeedTier::Fuzzy,
        3 => SeedTier::FullText,
        4 => SeedTier::Structural,
        _ => SeedTier::Vector,
    }
}

proptest! {
    #[test]
    fn forced_route_always_wins(query in ".{0,80}", forced in route_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let router = Router::new(RouterConfig::default());
        let decision = runtime.block_on(router.route(&query, Some(forced), &[], None));
        prop_assert_eq!(decision.route, forced);
        prop_assert_eq!(decision.source, RouteSource::Forced);
    }

    #[test]
    fn rrf_output_is_sorted_and_unique(
        lexical in prop::collection::vec(0u8..30, 0..20),
        vector in prop::collection::vec(0u8..30, 0..20),
        k in 1u32..100,
    ) {
        let fused = fuse(&ids(&lexical), &ids(&vector), k);
        for pair in fused.windows(2) {
            prop_assert!(pair[0].rrf_score >= pair[1].rrf_score);
        }
        let mut seen = std::collections::HashSet::new();
        for c in &fused {
            prop_assert!(seen.insert(c.node_id.clone()));
            prop_assert!(c.lexical_rank.is_some() || c.vector_rank.is_some());
            prop_assert!(c.rrf_score <= 2.0 / (k as f64 + 1.0) + 1e-12);
        }
        let distinct: std::collections::HashSet<_> = lexical.iter().chain(vector.iter()).collect();
        prop_assert_eq!(fused.len(), distinct.len());
    }

    #[test]
    fn rrf_with_one_empty_side_keeps_that_sides_order(
        raw in prop::collection::vec(0u8..50, 0..25),
        k in 1u32..100,
    ) {
        let mut unique = Vec::new();
        for id in ids(&raw) {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        let fused = fuse(&unique, &[], k);
        let order: Vec<String> = fused.into_iter().map(|c| c.node_id).collect();
        prop_assert_eq!(&order, &unique);
        prop_assert!(fuse(&[], &[], k).is_empty());
    }

    #[test]
    fn merged_seeds_are_unique_sorted_and_capped(
        raw in prop::collection::vec((0u8..15, 0.01f64..1.0, 0u8..6), 0..40),
        max_seeds in 1usize..20,
    ) {
        let candidates = raw.iter().map(|(id, w, t)| SeedCandidate {
            node_id: format!("n{id}"),
            tenant_id: TenantId::new("prop"),
            weight: *w,
            tier: tier(*t),
            strategy: "prop".to_string(),
            term: "t".to_string(),
        });
        let merged = merge_candidates(candidates, max_seeds);

        prop_assert!(merged.len() <= max_seeds);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].weight >= pair[1].weight);
            prop_assert_ne!(&pair[0].node_id, &pair[1].node_id);
        }
        for seed in &merged {
            let best = raw
                .iter()
                .filter(|(id, _, _)| format!("n{id}") == seed.node_id)
                .map(|(_, w, _)| *w)
                .fold(0.0_f64, f64::max);
            prop_assert_eq!(seed.weight, best);
        }
    }

    #[test]
    fn merged_evidence_is_ranked_from_one(
        raw in prop::collection::vec((0u8..20, 0.0f64..1.0), 0..40),
        top_k in 1usize..15,
    ) {
        let tenant = TenantId::new("prop");
        let items = raw.iter().map(|(id, score)| {
            let node = Node::passage(format!("p{id}"), tenant.clone(), "P", "text");
            from_node(&node, *score, EvidenceSource::Fusion, 99)
        });
        let merged = merge_ranked(items, top_k);

        prop_assert!(merged.len() <= top_k);
        for (i, item) in merged.iter().enumerate() {
            prop_assert_eq!(item.citation.rank, i + 1);
        }
        for pair in merged.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn question_normalization_is_idempotent(text in ".{0,120}") {
        let once = normalize_question(&text);
        prop_assert_eq!(normalize_question(&once), once);
    }

    #[test]
    fn question_list_parsing_never_yields_blank_items(text in ".{0,200}") {
        for question in parse_question_list(&text) {
            prop_assert!(!question.trim().is_empty());
        }
    }
}
