use crate::clause::{Assignment, Clause, Variable};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A problem submission as it arrives from the outside: a display name plus
/// the raw clause list. Turned into an immutable [`Job`] by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub name: String,
    pub clauses: Vec<NewClause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClause {
    pub var1: NewVariable,
    pub var2: NewVariable,
    pub var3: NewVariable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariable {
    pub name: String,
    pub negated: bool,
}

impl NewVariable {
    pub fn new(name: impl Into<String>, negated: bool) -> Self {
        NewVariable {
            name: name.into(),
            negated,
        }
    }
}

impl NewClause {
    pub fn new(var1: NewVariable, var2: NewVariable, var3: NewVariable) -> Self {
        NewClause { var1, var2, var3 }
    }
}

/// An immutable 3-CNF problem keyed by a v4 UUID.
///
/// The search subsystem treats a job as read-only; the `done` bit is only
/// ever flipped by the job store, under its lock, on the store's own record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub uuid: Uuid,
    pub name: String,
    pub clauses: Vec<Clause>,
    pub done: bool,
}

impl Job {
    /// Mints a fresh job from a submission: new UUID, `done = false`.
    pub fn create(new_job: NewJob) -> Self {
        let clauses = new_job
            .clauses
            .into_iter()
            .map(|c| {
                Clause::new(
                    Variable::new(c.var1.name, c.var1.negated),
                    Variable::new(c.var2.name, c.var2.negated),
                    Variable::new(c.var3.name, c.var3.negated),
                )
            })
            .collect();
        Job {
            uuid: Uuid::new_v4(),
            name: new_job.name,
            clauses,
            done: false,
        }
    }

    /// The distinct variable names appearing in the clause set, sorted.
    ///
    /// Sorted output is what makes seeded runs reproducible: every consumer
    /// walks the same name sequence.
    pub fn variables(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .clauses
            .iter()
            .flat_map(|clause| clause.variables())
            .map(|var| var.name.as_str())
            .collect();
        names.into_iter().map(String::from).collect()
    }

    /// Fraction of clauses satisfied by the given assignment, in `[0, 1]`.
    pub fn score(&self, assignment: &Assignment) -> f64 {
        debug_assert!(
            !self.clauses.is_empty(),
            "Scoring a job with no clauses divides by zero."
        );

        let satisfied = self
            .clauses
            .iter()
            .filter(|clause| clause.satisfied_by(assignment))
            .count();
        satisfied as f64 / self.clauses.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_clause(literals: [(&str, bool); 3]) -> NewClause {
        NewClause::new(
            NewVariable::new(literals[0].0, literals[0].1),
            NewVariable::new(literals[1].0, literals[1].1),
            NewVariable::new(literals[2].0, literals[2].1),
        )
    }

    fn assignment(pairs: &[(&str, bool)]) -> Assignment {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_create_mints_fresh_jobs() {
        let submission = NewJob {
            name: "test".to_string(),
            clauses: vec![new_clause([("v1", false), ("v2", true), ("v3", false)])],
        };

        let a = Job::create(submission.clone());
        let b = Job::create(submission);

        assert!(!a.done);
        assert_ne!(a.uuid, b.uuid, "Each job must get its own uuid");
        assert_eq!(a.clauses.len(), 1);
        assert_eq!(a.clauses[0].0[1], Variable::new("v2", true));
    }

    #[test]
    fn test_variables_are_distinct_and_sorted() {
        let job = Job::create(NewJob {
            name: "vars".to_string(),
            clauses: vec![
                new_clause([("b", false), ("a", true), ("b", false)]),
                new_clause([("c", false), ("a", false), ("d", true)]),
            ],
        });

        assert_eq!(job.variables(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_score_counts_satisfied_fraction() {
        let job = Job::create(NewJob {
            name: "score".to_string(),
            clauses: vec![
                // Satisfied by v1 = true.
                new_clause([("v1", false), ("v2", false), ("v3", false)]),
                // Requires some variable false.
                new_clause([("v1", true), ("v2", true), ("v3", true)]),
            ],
        });

        let cases: Vec<(&[(&str, bool)], f64)> = vec![
            (&[("v1", true), ("v2", true), ("v3", true)], 0.5),
            (&[("v1", true), ("v2", false), ("v3", true)], 1.0),
            (&[("v1", false), ("v2", false), ("v3", false)], 0.5),
        ];

        for (pairs, expected) in cases {
            assert_eq!(
                job.score(&assignment(pairs)),
                expected,
                "Score mismatch under {:?}",
                pairs
            );
        }
    }
}
