/// LLM service errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("llm provider unavailable: {provider}")]
    Unavailable { provider: String },

    #[error("completion failed: {reason}")]
    CompletionFailed { reason: String },

    #[error("invalid {task} response: {reason}")]
    InvalidResponse { task: String, reason: String },
}
