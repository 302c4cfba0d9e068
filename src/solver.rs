pub mod generator;
pub mod genetic;
pub mod naive;
pub mod population;
pub mod rank;

use crate::job::Job;
use crate::solution::Solution;

/// A strategy that turns a job into a solution.
///
/// Implementations are shared across the dispatcher's worker threads and
/// must not carry per-solve mutable state.
pub trait Solver: Send + Sync {
    fn solve(&self, job: &Job) -> Solution;
}
