use async_trait::async_trait;

use crate::errors::StrandResult;
use crate::models::AnswerRequest;

/// External natural-language answer generator. Only ever invoked with non-empty evidence.
#[async_trait]
pub trait IAnswerGenerator: Send + Sync {
    async fn generate(&self, request: &AnswerRequest) -> StrandResult<String>;
}
