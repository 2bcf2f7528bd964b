//! Power iteration with restart to the seed distribution.

use rayon::prelude::*;
use strand_core::errors::{StrandError, StrandResult};

use crate::graph::Transition;

/// Result of running the power iteration.
#[derive(Debug, Clone)]
pub struct IterationOutcome {
    pub scores: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    pub final_delta: f64,
}

/// Iteration knobs.
#[derive(Debug, Clone, Copy)]
pub struct IterationParams {
    pub damping: f64,
    pub epsilon: f64,
    pub max_iterations: usize,
    pub parallel: bool,
}

/// Run `p ← (1-d)·s + d·(M·p + dangling·s)` until the L1 change drops below
/// epsilon or the iteration cap is hit.
///
/// `seed` must sum to 1. Mass on dangling nodes is returned to the seeds, so
/// every step preserves total mass. `is_cancelled` is polled once per step.
pub fn power_iterate(
    transition: &Transition,
    seed: &[f64],
    params: IterationParams,
    is_cancelled: &dyn Fn() -> bool,
) -> StrandResult<IterationOutcome> {
    let n = seed.len();
    let d = params.damping;
    let mut p = seed.to_vec();
    let mut iterations = 0;
    let mut converged = false;
    let mut final_delta = f64::INFINITY;

    while iterations < params.max_iterations {
        if is_cancelled() {
            return Err(StrandError::Cancelled);
        }
        iterations += 1;

        let dangling_mass: f64 = p
            .iter()
            .zip(&transition.dangling)
            .filter(|(_, dangling)| **dangling)
            .map(|(mass, _)| *mass)
            .sum();

        let current = &p;
        let step = |v: usize| -> f64 {
            let walked: f64 = transition.incoming[v]
                .iter()
                .map(|(u, prob)| prob * current[*u])
                .sum();
            (1.0 - d) * seed[v] + d * (walked + dangling_mass * seed[v])
        };

        let next: Vec<f64> = if params.parallel {
            (0..n).into_par_iter().map(step).collect()
        } else {
            (0..n).map(step).collect()
        };

        final_delta = next.iter().zip(&p).map(|(a, b)| (a - b).abs()).sum();
        p = next;

        if final_delta < params.epsilon {
            converged = true;
            break;
        }
    }

    let total: f64 = p.iter().sum();
    if total > 0.0 {
        for x in &mut p {
            *x /= total;
        }
    }

    Ok(IterationOutcome {
        scores: p,
        iterations,
        converged,
        final_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max_iterations: usize, parallel: bool) -> IterationParams {
        IterationParams {
            damping: 0.85,
            epsilon: 1e-9,
            max_iterations,
            parallel,
        }
    }

    fn chain() -> Transition {
        // 0 -> 1 -> 2, node 2 dangling
        Transition {
            incoming: vec![vec![], vec![(0, 1.0)], vec![(1, 1.0)]],
            dangling: vec![false, false, true],
        }
    }

    #[test]
    fn conserves_mass() {
        let out = power_iterate(&chain(), &[1.0, 0.0, 0.0], params(50, false), &|| false).unwrap();
        let sum: f64 = out.scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(out.scores[0] > out.scores[2]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let seq = power_iterate(&chain(), &[0.5, 0.5, 0.0], params(30, false), &|| false).unwrap();
        let par = power_iterate(&chain(), &[0.5, 0.5, 0.0], params(30, true), &|| false).unwrap();
        assert_eq!(seq.scores, par.scores);
        assert_eq!(seq.iterations, par.iterations);
    }

    #[test]
    fn iteration_cap_wins() {
        let out = power_iterate(
            &chain(),
            &[1.0, 0.0, 0.0],
            IterationParams {
                epsilon: 0.0,
                ..params(3, false)
            },
            &|| false,
        )
        .unwrap();
        assert_eq!(out.iterations, 3);
        assert!(!out.converged);
    }

    #[test]
    fn cancellation_stops_the_walk() {
        let err = power_iterate(&chain(), &[1.0, 0.0, 0.0], params(10, false), &|| true).unwrap_err();
        assert!(matches!(err, StrandError::Cancelled));
    }
}
