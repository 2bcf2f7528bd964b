pub mod diagnostics;
pub mod evidence;
pub mod node;
pub mod query;
pub mod route;
pub mod seed;
pub mod sub_question;
pub mod tenant;

pub use diagnostics::{DriftTermination, FailureKind, PartialFailure, QueryDiagnostics};
pub use evidence::{Citation, EvidenceItem, EvidenceSource};
pub use node::{Edge, Node, NodeClass, ScoredNode, Subgraph};
pub use query::{
    AnswerRequest, ConversationTurn, NotFoundReason, QueryOptions, QueryResult, QueryStatus,
    Speaker,
};
pub use route::{Route, RouteDecision, RouteSource};
pub use seed::{SeedCandidate, SeedResolution, SeedStatus, SeedTier};
pub use sub_question::{ExplorationMethod, ExplorationStatus, SubQuestion, SubQuestionOutcome};
pub use tenant::{IndexVersion, TenantId};
