//! Dynamic damping.
//!
//! A walk seeded from one or two nodes, or from nodes with few outgoing edges,
//! drifts away from the query quickly. Lowering the damping factor keeps more
//! mass near the seeds in those cases.

use strand_core::config::PprConfig;

/// Damping to use for this walk, clamped to `[min_damping, damping]`.
pub fn effective_damping(config: &PprConfig, seed_count: usize, mean_seed_degree: f64) -> f64 {
    let mut d = config.damping;
    if seed_count <= config.small_seed_threshold {
        d -= config.small_seed_penalty;
    }
    if mean_seed_degree < config.sparse_degree_threshold {
        d -= config.sparse_penalty;
    }
    d.clamp(config.min_damping.min(config.damping), config.damping)
}
