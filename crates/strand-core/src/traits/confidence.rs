use crate::models::SubQuestionOutcome;

/// Scores how well the accumulated DRIFT outcomes cover the query, in [0, 1].
///
/// Implementations must be monotone: adding an outcome with non-empty evidence
/// never lowers the score.
pub trait IConfidenceScorer: Send + Sync {
    fn score(&self, outcomes: &[SubQuestionOutcome]) -> f64;

    fn name(&self) -> &str;
}
