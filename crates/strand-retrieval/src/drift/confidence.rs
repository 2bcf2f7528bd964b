//! Confidence scorers for the DRIFT ConfidenceCheck phase.
//!
//! Every scorer is monotone: appending an outcome with non-empty evidence
//! never lowers the score.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use strand_core::config::{ConfidenceStrategy, DriftConfig};
use strand_core::models::SubQuestionOutcome;
use strand_core::traits::IConfidenceScorer;

/// Corroborated passages needed for full agreement.
const AGREEMENT_SATURATION: usize = 3;

/// Fraction of topics (first-decomposition sub-questions and their
/// refinements) with at least one answered outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoverageScorer;

impl IConfidenceScorer for CoverageScorer {
    fn score(&self, outcomes: &[SubQuestionOutcome]) -> f64 {
        let mut topics: BTreeMap<&str, bool> = BTreeMap::new();
        for outcome in outcomes {
            let covered = topics.entry(outcome.sub_question.topic.as_str()).or_default();
            *covered |= outcome.has_evidence();
        }
        if topics.is_empty() {
            return 0.0;
        }
        topics.values().filter(|c| **c).count() as f64 / topics.len() as f64
    }

    fn name(&self) -> &str {
        "coverage"
    }
}

/// Passages supported by two or more distinct sub-questions, saturating.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgreementScorer;

impl IConfidenceScorer for AgreementScorer {
    fn score(&self, outcomes: &[SubQuestionOutcome]) -> f64 {
        let mut support: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for outcome in outcomes.iter().filter(|o| o.has_evidence()) {
            for item in &outcome.evidence {
                support
                    .entry(item.passage_id.as_str())
                    .or_default()
                    .insert(outcome.sub_question.id.as_str());
            }
        }
        let corroborated = support.values().filter(|s| s.len() >= 2).count();
        (corroborated as f64 / AGREEMENT_SATURATION as f64).min(1.0)
    }

    fn name(&self) -> &str {
        "agreement"
    }
}

/// `w · coverage + (1 - w) · agreement`.
#[derive(Debug, Clone, Copy)]
pub struct BlendScorer {
    pub coverage_weight: f64,
}

impl IConfidenceScorer for BlendScorer {
    fn score(&self, outcomes: &[SubQuestionOutcome]) -> f64 {
        let w = self.coverage_weight.clamp(0.0, 1.0);
        w * CoverageScorer.score(outcomes) + (1.0 - w) * AgreementScorer.score(outcomes)
    }

    fn name(&self) -> &str {
        "blend"
    }
}

/// The scorer selected by configuration.
pub fn scorer_for(config: &DriftConfig) -> Arc<dyn IConfidenceScorer> {
    match config.confidence_strategy {
        ConfidenceStrategy::Coverage => Arc::new(CoverageScorer),
        ConfidenceStrategy::Agreement => Arc::new(AgreementScorer),
        ConfidenceStrategy::Blend => Arc::new(BlendScorer {
            coverage_weight: config.blend_coverage_weight,
        }),
    }
}
