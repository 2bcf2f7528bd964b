//! Query options, results, and the request handed to the answer generator.

use serde::{Deserialize, Serialize};

use super::diagnostics::QueryDiagnostics;
use super::evidence::EvidenceItem;
use super::route::{Route, RouteDecision};
use super::tenant::TenantId;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One prior turn of conversation context, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// Caller-supplied response options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Always wins over router classification.
    pub forced_route: Option<Route>,
    /// Evidence items to return. Falls back to the configured default.
    pub top_k: Option<usize>,
    pub conversation: Vec<ConversationTurn>,
    /// Overrides the configured global query budget.
    pub timeout_ms: Option<u64>,
    /// Invoke the answer generator when evidence exists.
    pub generate_answer: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            forced_route: None,
            top_k: None,
            conversation: Vec::new(),
            timeout_ms: None,
            generate_answer: true,
        }
    }
}

impl QueryOptions {
    pub fn with_route(mut self, route: Route) -> Self {
        self.forced_route = Some(route);
        self
    }
}

/// Why a strategy produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    NoSeeds,
    NoEvidence,
}

/// Explicit outcome of a query. Not-found is a result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryStatus {
    Found,
    NotFound { reason: NotFoundReason },
}

/// What the orchestrator returns for every successful request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub query_id: String,
    pub tenant_id: TenantId,
    pub route_used: Route,
    pub route_decision: RouteDecision,
    pub status: QueryStatus,
    pub evidence: Vec<EvidenceItem>,
    /// Present only when the answer generator ran and succeeded.
    pub answer: Option<String>,
    pub diagnostics: QueryDiagnostics,
}

impl QueryResult {
    pub fn is_not_found(&self) -> bool {
        matches!(self.status, QueryStatus::NotFound { .. })
    }
}

/// Evidence package handed to the external answer generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub query: String,
    pub tenant_id: TenantId,
    pub route: Route,
    pub evidence: Vec<EvidenceItem>,
    /// Intermediate answers from DRIFT sub-questions.
    pub partial_answers: Vec<String>,
}
