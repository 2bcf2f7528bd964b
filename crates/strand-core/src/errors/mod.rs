//! Error taxonomy.
//!
//! Subsystem errors convert into [`StrandError`] via `#[from]`. Every error maps to
//! an [`ErrorKind`] and can be rendered as a structured [`QueryFailure`] for callers.

mod embedding_error;
mod graph_error;
mod llm_error;
mod retrieval_error;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use embedding_error::EmbeddingError;
pub use graph_error::GraphError;
pub use llm_error::LlmError;
pub use retrieval_error::RetrievalError;

/// Result alias used throughout the workspace.
pub type StrandResult<T> = Result<T, StrandError>;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum StrandError {
    #[error(transparent)]
    GraphError(#[from] GraphError),

    #[error(transparent)]
    LlmError(#[from] LlmError),

    #[error(transparent)]
    EmbeddingError(#[from] EmbeddingError),

    #[error(transparent)]
    RetrievalError(#[from] RetrievalError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("query cancelled")]
    Cancelled,

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Failure taxonomy shared by errors, diagnostics, and query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing collaborator or invalid settings. Fatal at startup.
    Configuration,
    /// Zero seeds or zero evidence. A result status, never raised.
    NotFound,
    /// A tier, sub-question, or fusion side failed and was contained.
    PartialFailure,
    /// A deadline passed.
    Timeout,
    /// The graph store is unreachable. Retryable.
    FatalGraph,
    /// The caller went away.
    Cancelled,
}

impl StrandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrandError::GraphError(GraphError::Unavailable { .. }) => ErrorKind::FatalGraph,
            StrandError::ConfigError(_) => ErrorKind::Configuration,
            StrandError::Timeout { .. } => ErrorKind::Timeout,
            StrandError::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::PartialFailure,
        }
    }

    /// Whether a caller can reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::FatalGraph | ErrorKind::Timeout)
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            StrandError::GraphError(GraphError::Unavailable { .. }) => "GRAPH_UNAVAILABLE",
            StrandError::GraphError(GraphError::QueryFailed { .. }) => "GRAPH_QUERY_FAILED",
            StrandError::GraphError(GraphError::TenantViolation { .. }) => "TENANT_VIOLATION",
            StrandError::GraphError(GraphError::NodeNotFound { .. }) => "NODE_NOT_FOUND",
            StrandError::LlmError(_) => "LLM_ERROR",
            StrandError::EmbeddingError(_) => "EMBEDDING_ERROR",
            StrandError::RetrievalError(_) => "RETRIEVAL_ERROR",
            StrandError::ConfigError(_) => "CONFIG_ERROR",
            StrandError::Timeout { .. } => "TIMEOUT",
            StrandError::Cancelled => "CANCELLED",
            StrandError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Render as the structured object surfaced to callers.
    pub fn to_failure(&self) -> QueryFailure {
        QueryFailure {
            kind: self.kind(),
            code: self.code().to_string(),
            message: self.to_string(),
            retryable: self.is_retryable(),
            context: BTreeMap::new(),
        }
    }
}

/// User-visible failure: taxonomy kind plus context, never a raw trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFailure {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub retryable: bool,
    pub context: BTreeMap<String, String>,
}

impl QueryFailure {
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

impl std::fmt::Display for QueryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
