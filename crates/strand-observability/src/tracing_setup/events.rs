//! Structured log events for key query operations.
//!
//! Each function emits a `tracing` event with structured fields.

use strand_core::models::{DriftTermination, PartialFailure, RouteDecision, SeedResolution};

/// Log the router's decision.
pub fn route_selected(decision: &RouteDecision) {
    tracing::info!(
        event = "route_selected",
        route = %decision.route,
        confidence = decision.confidence,
        source = ?decision.source,
        rationale = %decision.rationale,
        "route selected"
    );
}

/// Log a seed resolution summary.
pub fn seeds_resolved(resolution: &SeedResolution) {
    tracing::debug!(
        event = "seeds_resolved",
        seeds = resolution.seeds.len(),
        unmatched = ?resolution.unmatched_terms,
        per_tier = ?resolution.per_tier,
        status = ?resolution.status,
        "seeds resolved"
    );
}

/// Log a contained failure that degraded a unit to empty.
pub fn degradation_triggered(failure: &PartialFailure) {
    tracing::warn!(
        event = "degradation_triggered",
        unit = %failure.unit,
        kind = ?failure.kind,
        message = %failure.message,
        "unit degraded to empty"
    );
}

/// Log the end of one DRIFT explore/aggregate/check round.
pub fn drift_round_completed(iteration: usize, answered: usize, total: usize, confidence: f64) {
    tracing::info!(
        event = "drift_round_completed",
        iteration = iteration,
        answered = answered,
        total = total,
        confidence = confidence,
        "drift round completed"
    );
}

/// Log DRIFT termination.
pub fn drift_terminated(termination: DriftTermination, iterations: usize, confidence: f64) {
    tracing::info!(
        event = "drift_terminated",
        termination = ?termination,
        iterations = iterations,
        confidence = confidence,
        "drift terminated"
    );
}

/// Log an explicit not-found result.
pub fn not_found(route: &str, reason: &str) {
    tracing::info!(
        event = "not_found",
        route = %route,
        reason = %reason,
        "query produced no evidence"
    );
}

/// Log a dropped foreign-tenant element.
pub fn tenant_violation(expected: &str, found: &str, unit: &str) {
    tracing::warn!(
        event = "tenant_violation",
        expected = %expected,
        found = %found,
        unit = %unit,
        "dropped foreign-tenant data"
    );
}
