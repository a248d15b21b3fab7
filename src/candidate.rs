//! Interfaces which candidate solutions implement in order to be evolved.
//!
//! A candidate plays two roles. As a [Work] unit it evaluates itself on a
//! worker thread and reports back with a small "letter". As a [Candidate] it
//! can be aged, mutated and compared against the rest of the population.
//!
//! The engine never looks inside a candidate. How it is encoded, how it
//! mutates and how its fitness is computed all belong to the implementation.

use crate::dominance;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Objective values of a candidate, split by the direction of optimization.
///
/// Both candidates in a comparison must report lists of the same length for
/// the same direction. The two directions may have different lengths, and
/// either may be empty.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Objectives {
    /// Smaller is better.
    pub minimize: Vec<f64>,

    /// Larger is better.
    pub maximize: Vec<f64>,
}

/// A self-contained unit of evaluation.
///
/// The dispatcher clones the candidate, calls [Work::complete_work] on the
/// clone in the worker pool, and delivers the resulting letter to the original
/// candidate with [Work::open_letter]. Letters should carry only what the
/// original needs to update itself, usually just the fitness.
pub trait Work: Send {
    /// Result of the computation, sent from the worker back to the population.
    type Letter: Send;

    /// Reason an evaluation failed. A failure aborts the whole generation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Do the expensive part of the evaluation.
    fn compute_work(&mut self) -> Result<(), Self::Error>;

    /// Package the results of [Work::compute_work].
    fn write_letter(&self) -> Self::Letter;

    /// Apply a letter which was written by a copy of this candidate.
    ///
    /// This must clear the evaluation-pending flag.
    fn open_letter(&mut self, letter: Self::Letter);

    /// Compute the work and write the letter.
    fn complete_work(&mut self) -> Result<Self::Letter, Self::Error> {
        self.compute_work()?;
        Ok(self.write_letter())
    }
}

/// A candidate solution which can be evolved by [crate::Afpo].
pub trait Candidate: Work + Clone {
    /// Sequence number, assigned by the population. Used as the tie-breaker
    /// between candidates with identical objectives.
    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    /// Called on every member of the population once per generation.
    /// AFPO candidates increment their age here.
    fn iterate_generation(&mut self);

    fn needs_evaluation(&self) -> bool;

    /// Perturb this candidate in place.
    ///
    /// Implementations must mark the candidate as needing evaluation and reset
    /// its fitness to a neutral value. The population assigns a new id
    /// immediately afterwards.
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R);

    fn fitness(&self) -> f64;

    /// Current objective values, see [OptimizeMode::objectives].
    fn objectives(&self) -> Objectives;

    /// Pareto dominance over [Candidate::objectives], with ties broken in
    /// favor of the lower id.
    fn dominates(&self, other: &Self) -> bool {
        dominance::dominates(&self.objectives(), self.id(), &other.objectives(), other.id())
    }

    /// Dominance relation for picking the final result. Ignores age and
    /// compares raw fitness only.
    fn dominates_final_selection(&self, other: &Self) -> bool {
        self.fitness() > other.fitness()
    }
}

/// Which way the raw fitness value of an AFPO candidate points.
///
/// Age is always minimized.
#[derive(Debug, Default, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OptimizeMode {
    /// Maximize fitness.
    #[default]
    Fitness,

    /// The value is an error to be minimized.
    Error,
}

impl OptimizeMode {
    /// Build the objective vector of an AFPO candidate.
    pub fn objectives(self, age: u64, value: f64) -> Objectives {
        match self {
            OptimizeMode::Fitness => Objectives {
                minimize: vec![age as f64],
                maximize: vec![value],
            },
            OptimizeMode::Error => Objectives {
                minimize: vec![age as f64, value],
                maximize: vec![],
            },
        }
    }

    /// Is raw value `a` strictly better than raw value `b`?
    pub fn prefers(self, a: f64, b: f64) -> bool {
        match self {
            OptimizeMode::Fitness => a > b,
            OptimizeMode::Error => a < b,
        }
    }
}

impl std::fmt::Display for OptimizeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizeMode::Fitness => write!(f, "fitness"),
            OptimizeMode::Error => write!(f, "error"),
        }
    }
}

impl FromStr for OptimizeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "fitness" => Ok(OptimizeMode::Fitness),
            "error" => Ok(OptimizeMode::Error),
            _ => Err(format!("expected either \"fitness\" or \"error\", got \"{s}\"")),
        }
    }
}
