//! Minimal candidate for unit tests.

use crate::candidate::{Candidate, Objectives, OptimizeMode, Work};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
#[error("candidate {0} refused to be evaluated")]
pub struct Refused(pub u64);

/// Fitness is a copy of `genes`. Mutation nudges `genes` by up to `step`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dummy {
    pub id: u64,
    pub age: u64,
    pub genes: f64,
    pub step: f64,
    pub fitness: f64,
    pub pending: bool,
    pub refuse: bool,
    pub mode: OptimizeMode,
}

impl Dummy {
    pub fn new(genes: f64) -> Self {
        Self {
            id: 0,
            age: 0,
            genes,
            step: 1.0,
            fitness: 0.0,
            pending: true,
            refuse: false,
            mode: OptimizeMode::Fitness,
        }
    }

    /// A candidate whose mutations never change its fitness.
    pub fn frozen(genes: f64) -> Self {
        Self { step: 0.0, ..Self::new(genes) }
    }

    pub fn evaluated(id: u64, age: u64, fitness: f64) -> Self {
        Self {
            id,
            age,
            fitness,
            pending: false,
            ..Self::new(fitness)
        }
    }
}

impl Work for Dummy {
    type Letter = f64;
    type Error = Refused;

    fn compute_work(&mut self) -> Result<(), Refused> {
        if self.refuse {
            return Err(Refused(self.id));
        }
        self.fitness = self.genes;
        Ok(())
    }

    fn write_letter(&self) -> f64 {
        self.fitness
    }

    fn open_letter(&mut self, letter: f64) {
        self.fitness = letter;
        self.pending = false;
    }
}

impl Candidate for Dummy {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn iterate_generation(&mut self) {
        self.age += 1;
    }

    fn needs_evaluation(&self) -> bool {
        self.pending
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.genes += rng.random_range(-1.0..=1.0) * self.step;
        self.fitness = 0.0;
        self.pending = true;
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn objectives(&self) -> Objectives {
        self.mode.objectives(self.age, self.fitness)
    }

    fn dominates_final_selection(&self, other: &Self) -> bool {
        self.mode.prefers(self.fitness, other.fitness)
    }
}
