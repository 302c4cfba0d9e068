use crate::clause::Assignment;
use crate::job::Job;
use crate::solution::Solution;
use crate::solver::Solver;
use std::time::Instant;

/// Baseline solver that proposes the all-true assignment and reports
/// whatever score it earns. Useful as a floor when judging the genetic
/// search, and as the cheapest possible smoke test of the dispatch path.
pub struct NaiveSolver;

impl Solver for NaiveSolver {
    fn solve(&self, job: &Job) -> Solution {
        let start = Instant::now();
        let assignment: Assignment = job
            .variables()
            .into_iter()
            .map(|name| (name, true))
            .collect();
        Solution::package(&assignment, job, 0, start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{NewClause, NewJob, NewVariable};

    fn job(clauses: Vec<NewClause>) -> Job {
        Job::create(NewJob {
            name: "naive".to_string(),
            clauses,
        })
    }

    #[test]
    fn test_all_true_solves_positive_clauses() {
        let job = job(vec![NewClause::new(
            NewVariable::new("v1", false),
            NewVariable::new("v2", false),
            NewVariable::new("v3", false),
        )]);

        let solution = NaiveSolver.solve(&job);

        assert_eq!(solution.score, 1.0);
        assert_eq!(solution.cycles, 0);
        assert!(solution.variables.iter().all(|var| var.value));
    }

    #[test]
    fn test_all_true_misses_fully_negated_clauses() {
        let job = job(vec![NewClause::new(
            NewVariable::new("v1", true),
            NewVariable::new("v2", true),
            NewVariable::new("v3", true),
        )]);

        let solution = NaiveSolver.solve(&job);

        assert_eq!(solution.score, 0.0);
    }
}
