use strand_core::errors::*;

#[test]
fn unavailable_graph_is_fatal_and_retryable() {
    let err: StrandError = GraphError::Unavailable {
        reason: "connection refused".into(),
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::FatalGraph);
    assert!(err.is_retryable());
    assert_eq!(err.code(), "GRAPH_UNAVAILABLE");
}

#[test]
fn query_failures_are_partial() {
    let err: StrandError = GraphError::QueryFailed {
        reason: "bad pattern".into(),
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::PartialFailure);
    assert!(!err.is_retryable());
}

#[test]
fn timeout_and_cancel_kinds() {
    let timeout = StrandError::Timeout {
        operation: "query".into(),
        timeout_ms: 100,
    };
    assert_eq!(timeout.kind(), ErrorKind::Timeout);
    assert!(timeout.is_retryable());
    assert_eq!(StrandError::Cancelled.kind(), ErrorKind::Cancelled);
    assert!(!StrandError::Cancelled.is_retryable());
}

#[test]
fn failure_object_carries_kind_code_and_context() {
    let failure = StrandError::ConfigError("graph store missing".into())
        .to_failure()
        .with_context("collaborator", "graph_store");
    assert_eq!(failure.kind, ErrorKind::Configuration);
    assert_eq!(failure.code, "CONFIG_ERROR");
    assert_eq!(failure.context["collaborator"], "graph_store");
    assert_eq!(
        failure.to_string(),
        "[CONFIG_ERROR] configuration error: graph store missing"
    );

    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["kind"], "configuration");
}

#[test]
fn subsystem_messages_are_transparent() {
    let err: StrandError = LlmError::CompletionFailed {
        reason: "rate limited".into(),
    }
    .into();
    assert_eq!(err.to_string(), "completion failed: rate limited");
}
