use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::StrandResult;

/// What a completion is for. Lets providers and test doubles dispatch per task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmTask {
    RouteClassification,
    Decomposition,
    ReDecomposition,
    SubQuestionAnswer,
}

impl fmt::Display for LlmTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmTask::RouteClassification => "route_classification",
            LlmTask::Decomposition => "decomposition",
            LlmTask::ReDecomposition => "re_decomposition",
            LlmTask::SubQuestionAnswer => "sub_question_answer",
        };
        f.write_str(name)
    }
}

/// A completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub task: LlmTask,
    pub prompt: String,
    pub max_tokens: usize,
    /// The caller will parse the output as JSON.
    pub expect_json: bool,
}

/// A completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
}

/// Text-to-completion capability used for classification, decomposition, and
/// per-sub-question answers. Callers never assume success.
#[async_trait]
pub trait ILlmService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> StrandResult<Completion>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
