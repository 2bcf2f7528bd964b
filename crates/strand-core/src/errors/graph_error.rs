/// Graph store errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("graph store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("graph query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("tenant violation: expected {expected}, found {found}")]
    TenantViolation { expected: String, found: String },

    #[error("node not found: {id}")]
    NodeNotFound { id: String },
}
