//! # strand-graph
//!
//! The walk engine. Builds a deterministic in-memory digraph (`petgraph`) from a
//! tenant's expanded neighborhood and runs personalized pagerank over it.
//!
//! ## Architecture
//!
//! ```text
//! UnifiedGraph (entity + passage nodes, directed weighted edges)
//! ├── Transition (row-normalized pull lists + dangling flags)
//! PprEngine
//! ├── SeedDistribution (re-normalized restart vector)
//! ├── Damping (lowered for tiny seed sets / sparse neighborhoods)
//! └── Power iteration (L1 convergence or iteration cap, rayon for large graphs)
//! ResultCache (moka, keyed by tenant + index version + fingerprint)
//! VersionTracker (dashmap, detects index changes per tenant)
//! ```

pub mod cache;
pub mod graph;
pub mod ppr;

pub use cache::{CacheKey, ResultCache, VersionChange, VersionTracker};
pub use graph::{GraphNode, UnifiedGraph};
pub use ppr::{PprEngine, PprRanking, RankedNode};
