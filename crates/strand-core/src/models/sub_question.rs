//! DRIFT sub-questions and their exploration outcomes.

use serde::{Deserialize, Serialize};

use super::evidence::EvidenceItem;

/// One independent sub-question produced by decomposition or refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub id: String,
    pub text: String,
    pub parent_query: String,
    /// Iteration that produced this sub-question (1-based).
    pub iteration: usize,
    /// 0 for the first decomposition, +1 per refinement.
    pub depth: usize,
    /// Ids of sub-questions this one builds on.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Id of the gap this sub-question refines, if any.
    #[serde(default)]
    pub refines: Option<String>,
    /// Id of the first-decomposition ancestor. Refinements share their root's topic.
    pub topic: String,
}

impl SubQuestion {
    /// A first-decomposition sub-question, which is its own topic.
    pub fn root(id: impl Into<String>, text: impl Into<String>, parent_query: &str) -> Self {
        let id = id.into();
        Self {
            topic: id.clone(),
            id,
            text: text.into(),
            parent_query: parent_query.to_string(),
            iteration: 1,
            depth: 0,
            dependencies: Vec::new(),
            refines: None,
        }
    }

    /// A refinement targeting the gap left by `self`.
    pub fn refine(&self, id: impl Into<String>, text: impl Into<String>, iteration: usize) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            parent_query: self.parent_query.clone(),
            iteration,
            depth: self.depth + 1,
            dependencies: vec![self.id.clone()],
            refines: Some(self.id.clone()),
            topic: self.topic.clone(),
        }
    }
}

/// How a sub-question's exploration ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExplorationStatus {
    Answered,
    /// Ran to completion but found no evidence.
    Empty,
    Failed { reason: String },
    TimedOut,
    Cancelled,
}

/// Which retrieval path produced a sub-question's evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationMethod {
    GraphWalk,
    Fusion,
    None,
}

/// Result of exploring one sub-question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubQuestionOutcome {
    pub sub_question: SubQuestion,
    pub status: ExplorationStatus,
    pub evidence: Vec<EvidenceItem>,
    pub partial_answer: Option<String>,
    pub seed_count: usize,
    pub method: ExplorationMethod,
}

impl SubQuestionOutcome {
    /// Only answered sub-questions contribute positive evidence.
    pub fn has_evidence(&self) -> bool {
        self.status == ExplorationStatus::Answered && !self.evidence.is_empty()
    }

    pub fn unanswered(sub_question: SubQuestion, status: ExplorationStatus) -> Self {
        Self {
            sub_question,
            status,
            evidence: Vec::new(),
            partial_answer: None,
            seed_count: 0,
            method: ExplorationMethod::None,
        }
    }
}
