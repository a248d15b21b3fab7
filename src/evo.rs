//! Age-Fitness Pareto Optimization.
//!
//! The population is kept at a target size. Every generation it is aged,
//! doubled with one random newcomer plus mutated copies of the survivors,
//! evaluated in parallel, and then culled back down by random pairwise
//! dominance tournaments. Age is one of the objectives, so fresh random
//! candidates can survive long enough to compete with established ones.

use crate::candidate::Candidate;
use crate::checkpoint::{self, Snapshot};
use crate::config::AfpoConfig;
use crate::dispatch::Dispatcher;
use crate::dominance;
use crate::Error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Warning signs that the dominance frontier is too large for selection to
/// make progress. This usually means that the objectives do not discriminate
/// well between candidates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Crowding {
    /// The frontier is at least twice the target size, so nothing is culled.
    AllDominating,

    /// The frontier is at least the target size.
    Full,

    /// The frontier is more than 75% of the target size.
    ThreeQuarters,
}

impl Crowding {
    /// Check the frontier size against the target population size.
    pub fn assess(frontier: usize, target: usize) -> Option<Self> {
        if frontier >= 2 * target {
            Some(Crowding::AllDominating)
        } else if frontier >= target {
            Some(Crowding::Full)
        } else if 4 * frontier > 3 * target {
            Some(Crowding::ThreeQuarters)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Crowding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crowding::AllDominating => write!(f, "unable to evolve, all individuals are dominating"),
            Crowding::Full => write!(f, "dominating frontier contains 100% of the population"),
            Crowding::ThreeQuarters => write!(f, "dominating frontier contains more than 75% of the population"),
        }
    }
}

/// A population of candidates evolved with AFPO.
///
/// Argument `F` is the factory for new random candidates.
pub struct Afpo<C, F> {
    population_size: usize,

    factory: F,

    rng: StdRng,

    members: Vec<C>,

    /// The most recently issued id.
    last_id: u64,

    generation: u64,

    dispatcher: Dispatcher,
}

impl<C, F> Afpo<C, F>
where
    C: Candidate,
    F: FnMut() -> C,
{
    /// Create a population of `config.population_size` random candidates.
    ///
    /// The candidates are not evaluated until the first generation.
    pub fn new(config: &AfpoConfig, factory: F) -> Result<Self, Error> {
        let mut this = Self::empty(config, factory)?;
        for _ in 0..config.population_size {
            let candidate = this.spawn();
            this.members.push(candidate);
        }
        log::info!(
            "initialized AFPO population of {} with {} evaluation workers",
            this.population_size,
            this.dispatcher.num_threads()
        );
        Ok(this)
    }

    /// Resume from a snapshot. The saved candidates replace the initial
    /// population and new ids continue after the highest saved id.
    pub fn restore(config: &AfpoConfig, factory: F, snapshot: Snapshot<C>) -> Result<Self, Error> {
        let mut this = Self::empty(config, factory)?;
        let highest = snapshot.candidates.iter().map(Candidate::id).max().unwrap_or(0);
        this.last_id = snapshot.last_id.max(highest);
        this.generation = snapshot.generation;
        this.members = snapshot.candidates;
        log::info!(
            "restored AFPO population of {} at generation {}",
            this.members.len(),
            this.generation
        );
        Ok(this)
    }

    fn empty(config: &AfpoConfig, factory: F) -> Result<Self, Error> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            population_size: config.population_size,
            factory,
            rng,
            members: Vec::with_capacity(2 * config.population_size + 1),
            last_id: 0,
            generation: 0,
            dispatcher: Dispatcher::new(config.threads.unwrap_or(0))?,
        })
    }

    fn issue_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Make a new random candidate with a fresh id.
    fn spawn(&mut self) -> C {
        let mut candidate = (self.factory)();
        let id = self.issue_id();
        candidate.set_id(id);
        candidate
    }

    /// Run one generation.
    ///
    /// Returns the size of the dominance frontier and its members. The
    /// frontier is never culled, so all of its members are still in the
    /// population.
    pub fn generation(&mut self) -> Result<(usize, Vec<&C>), Error> {
        // Update the generation dependent values of the candidates.
        for candidate in &mut self.members {
            candidate.iterate_generation();
        }
        // Parents are drawn from the survivors of the previous generation,
        // or from the newcomer if there are none.
        let parents = self.members.len().max(1);
        // Add a new random candidate even if the population is already full.
        let newcomer = self.spawn();
        self.members.push(newcomer);
        // Expand the population.
        while self.members.len() < 2 * self.population_size {
            let parent = self.rng.random_range(0..parents);
            let mut child = self.members[parent].clone();
            child.mutate(&mut self.rng);
            let id = self.issue_id();
            child.set_id(id);
            self.members.push(child);
        }
        let evaluated = self.dispatcher.evaluate_all(&mut self.members)?;

        let frontier = dominance::frontier(&self.members);
        let frontier_ids: HashSet<u64> = frontier.iter().map(|&index| self.members[index].id()).collect();
        let expanded = self.members.len();
        self.cull(frontier.len());

        self.generation += 1;
        log::debug!(
            "generation {}: evaluated {evaluated}, expanded to {expanded}, frontier {}, culled to {}",
            self.generation,
            frontier.len(),
            self.members.len()
        );
        if let Some(crowding) = Crowding::assess(frontier.len(), self.population_size) {
            log::warn!("{crowding} ({} of {})", frontier.len(), self.population_size);
        }

        let members = self
            .members
            .iter()
            .filter(|candidate| frontier_ids.contains(&candidate.id()))
            .collect();
        Ok((frontier.len(), members))
    }

    /// Remove dominated candidates at random until the population shrinks to
    /// the target size or the frontier size, whichever is larger.
    fn cull(&mut self, frontier: usize) {
        let target = self.population_size.max(frontier);
        let mut slots: Vec<Option<C>> = std::mem::take(&mut self.members).into_iter().map(Some).collect();
        let mut alive = slots.len();
        while alive > target {
            let i1 = self.rng.random_range(0..slots.len());
            let i2 = self.rng.random_range(0..slots.len());
            if i1 == i2 {
                continue;
            }
            let (Some(a), Some(b)) = (&slots[i1], &slots[i2]) else {
                continue;
            };
            if a.dominates(b) {
                slots[i2] = None;
                alive -= 1;
            }
        }
        // Compress the population.
        self.members = slots.into_iter().flatten().collect();
    }

    /// Find the best candidate by [Candidate::dominates_final_selection],
    /// which ignores age.
    ///
    /// Returns a tuple of (fitness, candidate).
    pub fn get_best(&self) -> Result<(f64, &C), Error> {
        let mut members = self.members.iter();
        let mut best = members.next().ok_or(Error::EmptyPopulation)?;
        for candidate in members {
            if candidate.dominates_final_selection(best) {
                best = candidate;
            }
        }
        Ok((best.fitness(), best))
    }

    /// Get the current members of the population.
    pub fn get_all_bots(&self) -> &[C] {
        &self.members
    }

    /// Get the target population size.
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Get the number of generations that have completely passed.
    pub fn generation_count(&self) -> u64 {
        self.generation
    }

    /// Get the most recently issued candidate id.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Capture the state of the population for [Afpo::restore].
    pub fn snapshot(&self) -> Snapshot<C> {
        Snapshot {
            saved: checkpoint::timestamp(),
            generation: self.generation,
            last_id: self.last_id,
            candidates: self.members.clone(),
        }
    }

    /// Stop the evaluation workers. Call this exactly once, when done.
    pub fn cleanup(&mut self) -> Result<(), Error> {
        self.dispatcher.shutdown()
    }
}
