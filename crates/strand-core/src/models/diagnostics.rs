//! Per-query diagnostics. Attached to results, never persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::route::{Route, RouteSource};
use super::seed::SeedTier;
use super::tenant::IndexVersion;

/// How a contained unit failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Error,
    Timeout,
    Cancelled,
}

/// A tier, sub-question, fusion side, or collaborator call that degraded to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialFailure {
    /// e.g. `seed_tier:alias`, `fusion:vector`, `sub_question:sq-1-2`.
    pub unit: String,
    pub kind: FailureKind,
    pub message: String,
}

impl PartialFailure {
    pub fn new(unit: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Why the DRIFT workflow reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftTermination {
    ConfidenceReached,
    IterationCap,
    /// Every gap was already asked or past the depth limit.
    NoFurtherRefinement,
}

/// Diagnostics emitted for every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDiagnostics {
    pub started_at: DateTime<Utc>,
    pub route: Route,
    pub route_confidence: f64,
    pub route_rationale: String,
    pub route_source: RouteSource,
    pub index_version: Option<IndexVersion>,
    pub seeds_per_tier: BTreeMap<SeedTier, usize>,
    pub seed_count: usize,
    pub unmatched_terms: Vec<String>,
    pub evidence_count: usize,
    pub ppr_iterations: Option<usize>,
    pub ppr_converged: Option<bool>,
    pub ppr_damping: Option<f64>,
    pub drift_iterations: Option<usize>,
    pub drift_confidence: Option<f64>,
    pub drift_termination: Option<DriftTermination>,
    pub sub_questions_total: usize,
    pub sub_questions_answered: usize,
    pub cache_hits: usize,
    pub generator_invoked: bool,
    pub partial_failures: Vec<PartialFailure>,
    pub elapsed_ms: u64,
}

impl QueryDiagnostics {
    pub fn new(route: Route) -> Self {
        Self {
            started_at: Utc::now(),
            route,
            route_confidence: 0.0,
            route_rationale: String::new(),
            route_source: RouteSource::Heuristic,
            index_version: None,
            seeds_per_tier: BTreeMap::new(),
            seed_count: 0,
            unmatched_terms: Vec::new(),
            evidence_count: 0,
            ppr_iterations: None,
            ppr_converged: None,
            ppr_damping: None,
            drift_iterations: None,
            drift_confidence: None,
            drift_termination: None,
            sub_questions_total: 0,
            sub_questions_answered: 0,
            cache_hits: 0,
            generator_invoked: false,
            partial_failures: Vec::new(),
            elapsed_ms: 0,
        }
    }

    /// Add per-tier counts from a seed resolution.
    pub fn record_tiers(&mut self, per_tier: &BTreeMap<SeedTier, usize>) {
        for (tier, count) in per_tier {
            *self.seeds_per_tier.entry(*tier).or_default() += count;
        }
    }
}
