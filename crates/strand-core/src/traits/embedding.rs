use async_trait::async_trait;

use crate::errors::StrandResult;

/// Text-to-vector capability. Queries and indexed content share one dimensionality.
#[async_trait]
pub trait IEmbeddingService: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> StrandResult<Vec<f32>>;

    /// The dimensionality of embeddings produced by this service.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
