//! Configuration for every Strand subsystem.
//!
//! Every section is `#[serde(default)]`, so an empty TOML document yields the
//! defaults in [`defaults`].

pub mod cache_config;
pub mod defaults;
pub mod drift_config;
pub mod fusion_config;
pub mod observability_config;
pub mod ppr_config;
pub mod query_config;
pub mod router_config;
pub mod seed_config;

use serde::{Deserialize, Serialize};

pub use cache_config::CacheConfig;
pub use drift_config::{ConfidenceStrategy, DriftConfig};
pub use fusion_config::FusionConfig;
pub use observability_config::ObservabilityConfig;
pub use ppr_config::PprConfig;
pub use query_config::QueryConfig;
pub use router_config::RouterConfig;
pub use seed_config::{ProbeMode, SeedConfig};

use crate::constants::{MAX_DRIFT_ITERATIONS, MAX_PPR_ITERATIONS, MAX_SUB_QUESTIONS};
use crate::errors::{StrandError, StrandResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrandConfig {
    pub router: RouterConfig,
    pub seeds: SeedConfig,
    pub fusion: FusionConfig,
    pub ppr: PprConfig,
    pub drift: DriftConfig,
    pub query: QueryConfig,
    pub cache: CacheConfig,
    pub observability: ObservabilityConfig,
}

impl StrandConfig {
    /// Parse a TOML document. Missing sections and fields fall back to defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Reject settings that would break engine invariants.
    pub fn validate(&self) -> StrandResult<()> {
        let ppr = &self.ppr;
        if !(0.0..1.0).contains(&ppr.damping) {
            return Err(config_error(format!(
                "ppr.damping must be in [0, 1), got {}",
                ppr.damping
            )));
        }
        if ppr.min_damping < 0.0 || ppr.min_damping > ppr.damping {
            return Err(config_error(format!(
                "ppr.min_damping must be in [0, damping], got {}",
                ppr.min_damping
            )));
        }
        if ppr.epsilon <= 0.0 {
            return Err(config_error("ppr.epsilon must be positive"));
        }
        if ppr.max_iterations == 0 || ppr.max_iterations > MAX_PPR_ITERATIONS {
            return Err(config_error(format!(
                "ppr.max_iterations must be in 1..={MAX_PPR_ITERATIONS}"
            )));
        }

        let drift = &self.drift;
        if drift.max_iterations == 0 || drift.max_iterations > MAX_DRIFT_ITERATIONS {
            return Err(config_error(format!(
                "drift.max_iterations must be in 1..={MAX_DRIFT_ITERATIONS}"
            )));
        }
        if drift.max_sub_questions == 0 || drift.max_sub_questions > MAX_SUB_QUESTIONS {
            return Err(config_error(format!(
                "drift.max_sub_questions must be in 1..={MAX_SUB_QUESTIONS}"
            )));
        }
        if !(0.0..=1.0).contains(&drift.confidence_threshold) {
            return Err(config_error("drift.confidence_threshold must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&drift.blend_coverage_weight) {
            return Err(config_error("drift.blend_coverage_weight must be in [0, 1]"));
        }

        let seeds = &self.seeds;
        let weights = [
            seeds.exact_weight,
            seeds.alias_weight,
            seeds.fuzzy_weight,
            seeds.full_text_weight,
            seeds.structural_weight,
            seeds.vector_weight,
            seeds.community_weight,
        ];
        if weights.iter().any(|w| !(0.0..=1.0).contains(w) || *w == 0.0) {
            return Err(config_error("seed tier weights must be in (0, 1]"));
        }
        if seeds.max_seeds == 0 || seeds.candidates_per_term == 0 {
            return Err(config_error(
                "seeds.max_seeds and seeds.candidates_per_term must be positive",
            ));
        }

        if self.fusion.top_k == 0 || self.query.evidence_top_k == 0 {
            return Err(config_error("top-k limits must be positive"));
        }
        if self.query.query_timeout_ms == 0 {
            return Err(config_error("query.query_timeout_ms must be positive"));
        }
        if self.query.store_timeout_ms == 0 || self.ppr.expansion_timeout_ms == 0 {
            return Err(config_error("store timeouts must be positive"));
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> StrandError {
    StrandError::ConfigError(message.into())
}
