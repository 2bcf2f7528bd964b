/// Retrieval pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("seed resolution failed: {reason}")]
    SeedResolutionFailed { reason: String },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("graph walk failed: {reason}")]
    WalkFailed { reason: String },

    #[error("invalid seed distribution: {reason}")]
    InvalidSeeds { reason: String },

    #[error("decomposition failed: {reason}")]
    DecompositionFailed { reason: String },
}
