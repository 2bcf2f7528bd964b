//! Retrieval routes and the router's decision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Retrieval strategy chosen for a query, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Fusion-only lexical + vector search.
    FastLookup,
    /// Seeds from named entities, then a graph walk.
    EntityFocused,
    /// Graph walk additionally seeded with thematic/community candidates.
    Thematic,
    /// DRIFT decomposition workflow. The safe default.
    MultiHop,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::FastLookup,
        Route::EntityFocused,
        Route::Thematic,
        Route::MultiHop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Route::FastLookup => "fast_lookup",
            Route::EntityFocused => "entity_focused",
            Route::Thematic => "thematic",
            Route::MultiHop => "multi_hop",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "fast_lookup" | "lookup" | "fast" => Ok(Route::FastLookup),
            "entity_focused" | "entity" | "local" => Ok(Route::EntityFocused),
            "thematic" | "global" | "theme" => Ok(Route::Thematic),
            "multi_hop" | "multihop" | "drift" => Ok(Route::MultiHop),
            other => Err(format!("unknown route: {other}")),
        }
    }
}

/// Where a routing decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Forced,
    Heuristic,
    Llm,
    /// Heuristics and LLM agreed.
    Combined,
    /// Signals conflicted or were too weak; defaulted to multi-hop.
    Fallback,
}

/// The router's output, attached to the query's diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub route: Route,
    pub confidence: f64,
    pub rationale: String,
    pub source: RouteSource,
}

impl RouteDecision {
    pub fn forced(route: Route) -> Self {
        Self {
            route,
            confidence: 1.0,
            rationale: "forced route override".to_string(),
            source: RouteSource::Forced,
        }
    }
}
