use std::collections::BTreeMap;

/// A total mapping from variable name to truth value.
///
/// Backed by an ordered map so that iterating an assignment always visits
/// names in sorted order, which keeps every random draw that walks an
/// assignment reproducible under a seeded source.
pub type Assignment = BTreeMap<String, bool>;

/// A reference to a named Boolean variable, possibly negated.
///
/// E.g. `x` or `¬x`, where `x` is a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub negated: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, negated: bool) -> Self {
        Variable {
            name: name.into(),
            negated,
        }
    }

    /// Evaluates the literal under the given assignment.
    ///
    /// A name missing from the assignment reads as `false`, so the literal
    /// `¬x` is satisfied by an assignment that never mentions `x`.
    pub fn satisfied_by(&self, assignment: &Assignment) -> bool {
        let value = assignment.get(&self.name).copied().unwrap_or(false);
        value != self.negated
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "¬{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// An ordered triple of literals, satisfied when at least one literal is.
///
/// The three variables are independently named; the same name may appear
/// more than once within a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause(pub [Variable; 3]);

impl Clause {
    pub fn new(var1: Variable, var2: Variable, var3: Variable) -> Self {
        Clause([var1, var2, var3])
    }

    /// Checks if the clause is satisfied by the given assignment.
    pub fn satisfied_by(&self, assignment: &Assignment) -> bool {
        self.0.iter().any(|var| var.satisfied_by(assignment))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(pairs: &[(&str, bool)]) -> Assignment {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_literal_evaluation() {
        let cases: Vec<(&str, bool, &[(&str, bool)], bool)> = vec![
            ("x", false, &[("x", true)], true),
            ("x", false, &[("x", false)], false),
            ("x", true, &[("x", true)], false),
            ("x", true, &[("x", false)], true),
            // Missing names read as false.
            ("x", false, &[], false),
            ("x", true, &[], true),
        ];

        for (name, negated, pairs, expected) in cases {
            let var = Variable::new(name, negated);
            assert_eq!(
                var.satisfied_by(&assignment(pairs)),
                expected,
                "Evaluating {} under {:?}",
                var,
                pairs
            );
        }
    }

    #[test]
    fn test_clause_satisfied_by_any_literal() {
        let clause = Clause::new(
            Variable::new("a", false),
            Variable::new("b", true),
            Variable::new("c", false),
        );

        let cases: Vec<(&[(&str, bool)], bool)> = vec![
            (&[("a", true), ("b", true), ("c", false)], true),
            (&[("a", false), ("b", false), ("c", false)], true),
            (&[("a", false), ("b", true), ("c", true)], true),
            (&[("a", false), ("b", true), ("c", false)], false),
        ];

        for (pairs, expected) in cases {
            assert_eq!(
                clause.satisfied_by(&assignment(pairs)),
                expected,
                "Clause check failed under {:?}",
                pairs
            );
        }
    }

    #[test]
    fn test_repeated_name_within_clause() {
        // (x, x, ¬x) is a tautology: some literal is satisfied either way.
        let clause = Clause::new(
            Variable::new("x", false),
            Variable::new("x", false),
            Variable::new("x", true),
        );
        assert!(clause.satisfied_by(&assignment(&[("x", true)])));
        assert!(clause.satisfied_by(&assignment(&[("x", false)])));
    }
}
