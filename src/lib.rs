//! Age-Fitness Pareto Optimization (AFPO) is an evolutionary algorithm which
//! treats the age of each candidate solution as an extra objective, alongside
//! any number of other objectives to minimize or maximize. Young candidates
//! are protected from competition with older and fitter ones until they have
//! had time to improve, which keeps the population diverse.
//!
//! This crate provides the population and selection engine. It does not know
//! how candidates are encoded, mutated, or evaluated: implement the
//! [Candidate] and [Work] traits for your own type and hand [Afpo] a factory
//! for making random ones.
//!
//! Evaluations run in parallel on a pool of worker threads, everything else
//! runs on the caller's thread. The crate logs through the [log] facade.

pub mod candidate;
pub mod checkpoint;
pub mod config;
pub mod dispatch;
pub mod dominance;
mod error;
pub mod evo;

#[cfg(test)]
mod testing;

pub use candidate::{Candidate, Objectives, OptimizeMode, Work};
pub use checkpoint::Snapshot;
pub use config::AfpoConfig;
pub use error::Error;
pub use evo::{Afpo, Crowding};
