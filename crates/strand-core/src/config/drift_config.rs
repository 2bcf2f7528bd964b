use serde::{Deserialize, Serialize};

use super::defaults;

/// Which confidence scorer the DRIFT workflow uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceStrategy {
    /// Fraction of question topics with non-empty evidence.
    Coverage,
    /// Passages corroborated by more than one sub-question.
    Agreement,
    /// Weighted blend of coverage and agreement.
    Blend,
}

/// DRIFT multi-hop workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Maximum sub-questions per decomposition.
    pub max_sub_questions: usize,
    /// Hard cap on explore rounds.
    pub max_iterations: usize,
    /// Confidence needed to stop early.
    pub confidence_threshold: f64,
    /// Maximum refinement depth below the original decomposition.
    pub max_redecompose_depth: usize,
    /// Per sub-question timeout, independent of the query budget.
    pub sub_question_timeout_ms: u64,
    /// Evidence items kept per sub-question.
    pub evidence_per_sub_question: usize,
    /// Ask the LLM for a partial answer per sub-question.
    pub answer_sub_questions: bool,
    /// Timeout for decomposition and partial-answer calls.
    pub llm_timeout_ms: u64,
    pub confidence_strategy: ConfidenceStrategy,
    /// Coverage share in the blended scorer.
    pub blend_coverage_weight: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            max_sub_questions: defaults::DEFAULT_MAX_SUB_QUESTIONS,
            max_iterations: defaults::DEFAULT_DRIFT_MAX_ITERATIONS,
            confidence_threshold: defaults::DEFAULT_CONFIDENCE_THRESHOLD,
            max_redecompose_depth: defaults::DEFAULT_MAX_REDECOMPOSE_DEPTH,
            sub_question_timeout_ms: defaults::DEFAULT_SUB_QUESTION_TIMEOUT_MS,
            evidence_per_sub_question: defaults::DEFAULT_EVIDENCE_PER_SUB_QUESTION,
            answer_sub_questions: defaults::DEFAULT_ANSWER_SUB_QUESTIONS,
            llm_timeout_ms: defaults::DEFAULT_LLM_TIMEOUT_MS,
            confidence_strategy: ConfidenceStrategy::Coverage,
            blend_coverage_weight: defaults::DEFAULT_BLEND_COVERAGE_WEIGHT,
        }
    }
}
