//! Span definitions per operation: query, seed resolution, graph walk, DRIFT, sub-question.
//!
//! Each span carries its identifying fields via the `tracing` crate.

/// Create a query span.
#[macro_export]
macro_rules! query_span {
    ($query_id:expr, $tenant:expr) => {
        tracing::info_span!("strand.query", query_id = %$query_id, tenant = %$tenant)
    };
}

/// Create a seed resolution span.
#[macro_export]
macro_rules! seed_span {
    ($tenant:expr, $terms:expr) => {
        tracing::debug_span!("strand.seeds", tenant = %$tenant, terms = $terms)
    };
}

/// Create a PPR span.
#[macro_export]
macro_rules! ppr_span {
    ($nodes:expr, $seeds:expr) => {
        tracing::debug_span!("strand.ppr", nodes = $nodes, seeds = $seeds)
    };
}

/// Create a DRIFT span.
#[macro_export]
macro_rules! drift_span {
    ($tenant:expr, $max_iterations:expr) => {
        tracing::info_span!("strand.drift", tenant = %$tenant, max_iterations = $max_iterations)
    };
}

/// Create a sub-question span.
#[macro_export]
macro_rules! sub_question_span {
    ($id:expr) => {
        tracing::debug_span!("strand.sub_question", sub_question_id = %$id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const QUERY: &str = "strand.query";
    pub const SEEDS: &str = "strand.seeds";
    pub const PPR: &str = "strand.ppr";
    pub const DRIFT: &str = "strand.drift";
    pub const SUB_QUESTION: &str = "strand.sub_question";
}
