//! # strand-retrieval
//!
//! The query engine. Routes each question to one of four strategies, turns
//! query terms into graph seeds, walks the graph, and packages ranked passage
//! evidence for an external answer generator.
//!
//! ## Architecture
//!
//! ```text
//! Orchestrator
//! ├── Router
//! │   ├── Heuristics (entity mentions, keyword tables, follow-ups)
//! │   └── LLM classifier (optional, JSON verdict)
//! ├── SeedResolver
//! │   ├── Term extraction (quoted, capitalized spans, content words)
//! │   ├── Strategy chain (exact → alias → fuzzy → full-text → structural)
//! │   ├── Vector fallback (residual terms only)
//! │   └── Merge (tier-normalized, max per node)
//! ├── HybridSearcher
//! │   ├── Lexical + vector passage search (concurrent)
//! │   ├── RRF fusion
//! │   └── Authority boost
//! ├── GraphWalker
//! │   ├── Neighborhood expansion
//! │   └── PPR (strand-graph, blocking pool)
//! └── DriftWorkflow
//!     ├── Decompose / ReDecompose
//!     ├── Explore (fan-out + barrier)
//!     ├── Aggregate
//!     └── ConfidenceCheck (pluggable scorers)
//! ```

pub mod context;
pub mod drift;
pub mod evidence;
pub mod fusion;
pub mod guard;
pub mod orchestrator;
pub mod parse;
pub mod prompts;
pub mod router;
pub mod seeds;
pub mod walk;

pub use context::{QueryContext, Retrievers};
pub use drift::{DriftPhase, DriftReport, DriftWorkflow};
pub use fusion::HybridSearcher;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use router::Router;
pub use seeds::SeedResolver;
pub use walk::GraphWalker;
