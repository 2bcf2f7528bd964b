use strand_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = StrandConfig::from_toml("").unwrap();

    // Router defaults
    assert!(config.router.llm_enabled);
    assert_eq!(config.router.min_confidence, 0.5);

    // Seed defaults
    assert_eq!(config.seeds.exact_weight, 1.0);
    assert_eq!(config.seeds.alias_weight, 0.9);
    assert_eq!(config.seeds.fuzzy_weight, 0.75);
    assert_eq!(config.seeds.full_text_weight, 0.6);
    assert_eq!(config.seeds.structural_weight, 0.5);
    assert_eq!(config.seeds.probe_mode, ProbeMode::Sequential);

    // Fusion defaults
    assert_eq!(config.fusion.rrf_k, 60);

    // PPR defaults
    assert_eq!(config.ppr.damping, 0.85);
    assert_eq!(config.ppr.max_iterations, 20);
    assert_eq!(config.ppr.epsilon, 1e-6);

    // DRIFT defaults
    assert_eq!(config.drift.max_sub_questions, 5);
    assert_eq!(config.drift.max_iterations, 3);
    assert_eq!(config.drift.confidence_strategy, ConfidenceStrategy::Coverage);
    assert_eq!(config.drift.blend_coverage_weight, 0.7);

    // Store deadlines
    assert_eq!(config.query.store_timeout_ms, 5_000);
    assert_eq!(config.ppr.expansion_timeout_ms, 5_000);

    // Cache + observability defaults
    assert!(config.cache.enabled);
    assert_eq!(config.observability.log_level, "info");

    assert!(config.validate().is_ok());
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[ppr]
damping = 0.7
max_iterations = 10

[seeds]
probe_mode = "speculative"

[drift]
confidence_strategy = "blend"
"#;
    let config = StrandConfig::from_toml(toml).unwrap();
    assert_eq!(config.ppr.damping, 0.7);
    assert_eq!(config.ppr.max_iterations, 10);
    // Non-overridden fields keep defaults
    assert_eq!(config.ppr.epsilon, 1e-6);
    assert_eq!(config.seeds.probe_mode, ProbeMode::Speculative);
    assert_eq!(config.drift.confidence_strategy, ConfidenceStrategy::Blend);
    assert_eq!(config.fusion.rrf_k, 60);
}

#[test]
fn config_serde_roundtrip() {
    let config = StrandConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = StrandConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.ppr.damping, config.ppr.damping);
    assert_eq!(roundtripped.drift.max_iterations, config.drift.max_iterations);
}

#[test]
fn validate_rejects_damping_of_one() {
    let mut config = StrandConfig::default();
    config.ppr.damping = 1.0;
    let err = config.validate().unwrap_err();
    assert_eq!(err.kind(), strand_core::ErrorKind::Configuration);
}

#[test]
fn validate_rejects_zero_drift_iterations() {
    let mut config = StrandConfig::default();
    config.drift.max_iterations = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_zero_tier_weight() {
    let mut config = StrandConfig::default();
    config.seeds.alias_weight = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_zero_store_timeouts() {
    let mut config = StrandConfig::default();
    config.query.store_timeout_ms = 0;
    assert!(config.validate().is_err());

    let mut config = StrandConfig::default();
    config.ppr.expansion_timeout_ms = 0;
    assert!(config.validate().is_err());
}
