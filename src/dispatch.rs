//! Parallel evaluation of candidates.
//!
//! The dispatcher owns a pool of worker threads. Each pending candidate is
//! cloned into a work unit which runs on the pool, and only its letter comes
//! back. The population itself is never shared with the workers.

use crate::Error;
use crate::candidate::{Candidate, Work};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

pub struct Dispatcher {
    pool: Option<ThreadPool>,
}

impl Dispatcher {
    /// Start the worker pool.
    ///
    /// Argument `threads` is the number of workers, or zero to use all of the
    /// host's available parallelism.
    pub fn new(threads: usize) -> Result<Self, Error> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("afpo-eval-{index}"))
            .build()?;
        log::debug!("started {} evaluation workers", pool.current_num_threads());
        Ok(Self { pool: Some(pool) })
    }

    /// Number of worker threads, or zero after shutdown.
    pub fn num_threads(&self) -> usize {
        self.pool.as_ref().map_or(0, ThreadPool::current_num_threads)
    }

    /// Evaluate every candidate which needs it, blocking until all are done.
    ///
    /// Letters are opened in the order the candidates appear in the slice.
    /// If any evaluation fails then no letters are opened and the failure of
    /// the earliest such candidate is returned.
    ///
    /// Returns the number of candidates evaluated.
    pub fn evaluate_all<C: Candidate>(&self, candidates: &mut [C]) -> Result<usize, Error> {
        let Some(pool) = &self.pool else {
            return Err(Error::ShutDown);
        };
        let pending: Vec<usize> = (0..candidates.len())
            .filter(|&index| candidates[index].needs_evaluation())
            .collect();
        if pending.is_empty() {
            return Ok(0);
        }
        let units: Vec<C> = pending.iter().map(|&index| candidates[index].clone()).collect();
        let results: Vec<Result<C::Letter, Error>> = pool.install(|| {
            units
                .into_par_iter()
                .map(|mut unit| {
                    unit.complete_work().map_err(|err| Error::Evaluation {
                        id: unit.id(),
                        source: Box::new(err),
                    })
                })
                .collect()
        });
        let letters = results.into_iter().collect::<Result<Vec<_>, Error>>()?;
        for (index, letter) in pending.iter().zip(letters) {
            candidates[*index].open_letter(letter);
        }
        Ok(pending.len())
    }

    /// Stop the worker pool. It can not be restarted.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        match self.pool.take() {
            Some(pool) => {
                log::debug!("stopping {} evaluation workers", pool.current_num_threads());
                Ok(())
            }
            None => Err(Error::ShutDown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Dummy;

    #[test]
    fn only_pending_are_evaluated() {
        let dispatcher = Dispatcher::new(2).unwrap();
        let mut candidates = vec![Dummy::new(1.0), Dummy::evaluated(2, 0, 7.0), Dummy::new(3.0)];
        assert_eq!(dispatcher.evaluate_all(&mut candidates).unwrap(), 2);
        assert!(candidates.iter().all(|c| !c.needs_evaluation()));
        let fitness: Vec<f64> = candidates.iter().map(|c| c.fitness).collect();
        assert_eq!(fitness, [1.0, 7.0, 3.0]);
        // Nothing left to do.
        assert_eq!(dispatcher.evaluate_all(&mut candidates).unwrap(), 0);
    }

    #[test]
    fn letters_follow_submission_order() {
        let dispatcher = Dispatcher::new(0).unwrap();
        assert!(dispatcher.num_threads() > 0);
        let mut candidates: Vec<Dummy> = (0..200)
            .map(|index| {
                let mut dummy = Dummy::new(index as f64);
                dummy.id = index;
                dummy
            })
            .collect();
        dispatcher.evaluate_all(&mut candidates).unwrap();
        for (index, candidate) in candidates.iter().enumerate() {
            assert_eq!(candidate.fitness, index as f64);
        }
    }

    #[test]
    fn failure_applies_nothing() {
        let dispatcher = Dispatcher::new(4).unwrap();
        let mut candidates: Vec<Dummy> = (1..=10).map(|genes| Dummy::new(genes as f64)).collect();
        candidates[6].id = 7;
        candidates[6].refuse = true;
        let err = dispatcher.evaluate_all(&mut candidates).unwrap_err();
        assert!(matches!(err, Error::Evaluation { id: 7, .. }));
        assert!(err.to_string().contains("refused"));
        assert!(candidates.iter().all(|c| c.needs_evaluation() && c.fitness == 0.0));
    }

    #[test]
    fn shutdown_once() {
        let mut dispatcher = Dispatcher::new(1).unwrap();
        dispatcher.shutdown().unwrap();
        assert_eq!(dispatcher.num_threads(), 0);
        assert!(matches!(dispatcher.shutdown(), Err(Error::ShutDown)));
        let mut candidates = vec![Dummy::new(1.0)];
        assert!(matches!(dispatcher.evaluate_all(&mut candidates), Err(Error::ShutDown)));
    }
}
