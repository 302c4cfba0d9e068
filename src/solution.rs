use crate::clause::Assignment;
use crate::job::Job;
use std::time::Duration;
use uuid::Uuid;

/// One variable of a solved assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedVariable {
    pub name: String,
    pub value: bool,
}

/// The answer to a job: the best assignment found, its score, how many
/// evolutionary cycles ran, and the wall time the solve took.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub uuid: Uuid,
    pub variables: Vec<SolvedVariable>,
    pub score: f64,
    pub cycles: usize,
    pub elapsed: Duration,
}

impl Solution {
    /// Packages a final assignment into a solution for the given job.
    ///
    /// The score is recomputed here from the assignment and the job's
    /// clauses rather than taken on trust from the solver.
    pub fn package(assignment: &Assignment, job: &Job, cycles: usize, elapsed: Duration) -> Self {
        let variables = assignment
            .iter()
            .map(|(name, value)| SolvedVariable {
                name: name.clone(),
                value: *value,
            })
            .collect();
        Solution {
            uuid: job.uuid,
            variables,
            score: job.score(assignment),
            cycles,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{NewClause, NewJob, NewVariable};

    fn two_clause_job() -> Job {
        Job::create(NewJob {
            name: "package".to_string(),
            clauses: vec![
                NewClause::new(
                    NewVariable::new("v1", false),
                    NewVariable::new("v2", false),
                    NewVariable::new("v3", false),
                ),
                NewClause::new(
                    NewVariable::new("v1", true),
                    NewVariable::new("v2", true),
                    NewVariable::new("v3", true),
                ),
            ],
        })
    }

    #[test]
    fn test_package_recomputes_score() {
        let job = two_clause_job();
        let assignment: Assignment = [("v1", true), ("v2", true), ("v3", true)]
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        let solution = Solution::package(&assignment, &job, 3, Duration::from_millis(12));

        // Only the first clause holds under all-true.
        assert_eq!(solution.score, 0.5);
        assert_eq!(solution.uuid, job.uuid);
        assert_eq!(solution.cycles, 3);
        assert_eq!(solution.elapsed, Duration::from_millis(12));
    }

    #[test]
    fn test_package_covers_every_assignment_entry() {
        let job = two_clause_job();
        let assignment: Assignment = [("v1", false), ("v2", true), ("v3", false)]
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        let solution = Solution::package(&assignment, &job, 0, Duration::ZERO);

        let mut names: Vec<&str> = solution.variables.iter().map(|v| v.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, job.variables());
        for var in &solution.variables {
            assert_eq!(Some(&var.value), assignment.get(&var.name));
        }
    }
}
