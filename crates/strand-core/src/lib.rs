//! # strand-core
//!
//! Foundation crate for the Strand query engine.
//! Defines the graph data model, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod similarity;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::StrandConfig;
pub use errors::{ErrorKind, StrandError, StrandResult};
pub use models::{
    EvidenceItem, IndexVersion, Node, NodeClass, Route, RouteDecision, SeedCandidate, SeedTier,
    SubQuestion, TenantId,
};
