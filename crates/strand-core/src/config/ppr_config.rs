use serde::{Deserialize, Serialize};

use super::defaults;

/// Personalized pagerank configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PprConfig {
    /// Base damping factor.
    pub damping: f64,
    /// Floor for dynamically lowered damping.
    pub min_damping: f64,
    /// L1 convergence threshold.
    pub epsilon: f64,
    /// Iteration cap. Always wins over convergence.
    pub max_iterations: usize,
    /// Seed sets at or below this size lower the damping.
    pub small_seed_threshold: usize,
    pub small_seed_penalty: f64,
    /// Mean seed out-degree below this lowers the damping.
    pub sparse_degree_threshold: f64,
    pub sparse_penalty: f64,
    /// Hops of neighbor expansion around the seeds.
    pub expansion_hops: usize,
    /// Node budget for neighbor expansion.
    pub expansion_max_nodes: usize,
    /// Deadline for the neighborhood expansion call. An overrun yields an
    /// empty walk.
    pub expansion_timeout_ms: u64,
    /// Graphs with at least this many nodes use the parallel multiply.
    pub parallel_threshold: usize,
}

impl Default for PprConfig {
    fn default() -> Self {
        Self {
            damping: defaults::DEFAULT_DAMPING,
            min_damping: defaults::DEFAULT_MIN_DAMPING,
            epsilon: defaults::DEFAULT_PPR_EPSILON,
            max_iterations: defaults::DEFAULT_PPR_MAX_ITERATIONS,
            small_seed_threshold: defaults::DEFAULT_SMALL_SEED_THRESHOLD,
            small_seed_penalty: defaults::DEFAULT_SMALL_SEED_PENALTY,
            sparse_degree_threshold: defaults::DEFAULT_SPARSE_DEGREE_THRESHOLD,
            sparse_penalty: defaults::DEFAULT_SPARSE_PENALTY,
            expansion_hops: defaults::DEFAULT_EXPANSION_HOPS,
            expansion_max_nodes: defaults::DEFAULT_EXPANSION_MAX_NODES,
            expansion_timeout_ms: defaults::DEFAULT_EXPANSION_TIMEOUT_MS,
            parallel_threshold: defaults::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
