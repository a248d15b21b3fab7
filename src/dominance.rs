//! Generalized Pareto dominance.

use crate::candidate::{Candidate, Objectives};

/// Does `a` Pareto-dominate `b`?
///
/// `a` must be no worse than `b` in every objective and strictly better in at
/// least one. When every objective is exactly equal, the candidate with the
/// smaller id dominates. This makes the relation a strict order, so a
/// candidate never dominates itself and of two distinct candidates with
/// identical objectives exactly one dominates the other.
///
/// Objectives are compared pairwise. If one list is longer than the other the
/// surplus values are ignored, and an empty list never decides anything.
pub fn dominates(a: &Objectives, a_id: u64, b: &Objectives, b_id: u64) -> bool {
    let minimize = || a.minimize.iter().zip(&b.minimize);
    let maximize = || a.maximize.iter().zip(&b.maximize);
    // No worse in any objective.
    if minimize().any(|(x, y)| x > y) || maximize().any(|(x, y)| x < y) {
        return false;
    }
    // Strictly better in at least one objective.
    if minimize().any(|(x, y)| x < y) || maximize().any(|(x, y)| x > y) {
        return true;
    }
    a_id < b_id
}

/// Find the non-dominated members of a population.
///
/// Returns their indices in ascending order.
pub fn frontier<C: Candidate>(population: &[C]) -> Vec<usize> {
    (0..population.len())
        .filter(|&s| {
            !population
                .iter()
                .enumerate()
                .any(|(t, other)| t != s && other.dominates(&population[s]))
        })
        .collect()
}
