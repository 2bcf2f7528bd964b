//! Aggregate: merge sub-question evidence into one ranked list.

use std::collections::BTreeMap;

use strand_core::models::{EvidenceItem, SubQuestionOutcome};

use crate::evidence;

/// Citation metadata key listing the sub-questions that surfaced a passage.
pub const SUPPORTED_BY: &str = "supported_by";

#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    pub evidence: Vec<EvidenceItem>,
    /// Passage id → ids of sub-questions that surfaced it.
    pub support: BTreeMap<String, Vec<String>>,
    pub partial_answers: Vec<String>,
}

/// Merge by passage id keeping the highest score, truncated to `top_k`.
pub fn aggregate(outcomes: &[SubQuestionOutcome], top_k: usize) -> Aggregated {
    let mut support: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for outcome in outcomes {
        for item in &outcome.evidence {
            let ids = support.entry(item.passage_id.clone()).or_default();
            if !ids.contains(&outcome.sub_question.id) {
                ids.push(outcome.sub_question.id.clone());
            }
        }
    }

    let mut merged = evidence::merge_ranked(
        outcomes.iter().flat_map(|o| o.evidence.iter().cloned()),
        top_k,
    );
    for item in &mut merged {
        if let Some(ids) = support.get(&item.passage_id) {
            item.citation
                .metadata
                .insert(SUPPORTED_BY.to_string(), ids.join(","));
        }
    }

    let partial_answers = outcomes
        .iter()
        .filter_map(|o| o.partial_answer.clone())
        .collect();

    Aggregated {
        evidence: merged,
        support,
        partial_answers,
    }
}
