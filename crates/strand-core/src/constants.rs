/// Strand system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard ceiling on DRIFT iterations regardless of configuration.
pub const MAX_DRIFT_ITERATIONS: usize = 10;

/// Hard ceiling on sub-questions produced by a single decomposition.
pub const MAX_SUB_QUESTIONS: usize = 12;

/// Hard ceiling on PPR power iterations regardless of configuration.
pub const MAX_PPR_ITERATIONS: usize = 200;

/// Tolerance used when checking that a probability vector sums to 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Maximum query terms extracted from a single query or sub-question.
pub const MAX_QUERY_TERMS: usize = 12;

/// Metadata key holding a passage's source document identifier.
pub const META_DOCUMENT_ID: &str = "document_id";

/// Metadata key holding a passage's level (e.g. "summary", "chunk").
pub const META_LEVEL: &str = "level";

/// Passage level that receives the authority boost after fusion.
pub const SUMMARY_LEVEL: &str = "summary";
