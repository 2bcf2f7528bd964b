use strand_core::config::ObservabilityConfig;
use strand_core::models::{FailureKind, PartialFailure, Route, RouteDecision, SeedResolution};
use strand_observability::events;
use strand_observability::tracing_setup::spans;

#[test]
fn init_is_idempotent() {
    strand_observability::init_tracing_with_filter("debug");
    strand_observability::init_tracing_from_config(&ObservabilityConfig {
        log_level: "warn".to_string(),
        json_logs: false,
    });
}

#[test]
fn events_emit_without_subscriber_panics() {
    events::route_selected(&RouteDecision::forced(Route::MultiHop));
    events::seeds_resolved(&SeedResolution::empty(vec!["acme".to_string()]));
    events::degradation_triggered(&PartialFailure::new(
        "seed_tier:alias",
        FailureKind::Timeout,
        "tier timed out",
    ));
    events::not_found("entity_focused", "no_seeds");
}

#[test]
fn span_macros_expand() {
    let span = strand_observability::query_span!("q-1", "tenant-a");
    let _guard = span.enter();
    let inner = strand_observability::ppr_span!(10usize, 2usize);
    let _inner = inner.enter();
    assert_eq!(spans::names::QUERY, "strand.query");
}
