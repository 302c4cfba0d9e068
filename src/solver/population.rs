use crate::clause::Assignment;
use crate::job::Job;
use crate::random::RandomSource;

/// A candidate assignment in the evolutionary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    values: Assignment,
}

impl Member {
    pub fn new(values: Assignment) -> Self {
        Member { values }
    }

    pub fn assignment(&self) -> &Assignment {
        &self.values
    }

    /// Checks whether two members agree on every name this member carries.
    ///
    /// Members are always generated over the same name set, so this is a
    /// full-domain comparison. A name the other member lacks reads false.
    pub fn matches(&self, other: &Member) -> bool {
        self.values
            .iter()
            .all(|(name, value)| other.values.get(name).copied().unwrap_or(false) == *value)
    }

    /// Breeds a child that takes each value from either parent with equal
    /// probability.
    ///
    /// Names are visited in sorted order (the assignment map is ordered),
    /// so the per-name coin flips consume the random sequence identically
    /// on every run with the same seed.
    pub fn crossover(&self, other: &Member, random: &mut dyn RandomSource) -> Member {
        let values = self
            .values
            .iter()
            .map(|(name, value)| {
                let inherited = if random.index(2) == 1 {
                    *value
                } else {
                    other.values.get(name).copied().unwrap_or(false)
                };
                (name.clone(), inherited)
            })
            .collect();
        Member { values }
    }
}

/// An ordered collection of pairwise non-matching members.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Member>,
}

impl Population {
    pub fn with_capacity(capacity: usize) -> Self {
        Population {
            members: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Appends a member. Uniqueness is the caller's responsibility; both
    /// the generator and the reproduce loop check `contains` first.
    pub fn push(&mut self, member: Member) {
        self.members.push(member);
    }

    pub fn contains(&self, candidate: &Member) -> bool {
        self.members.iter().any(|member| candidate.matches(member))
    }

    /// Returns the best-scoring member and its score.
    ///
    /// Scans in order and keeps the first member that strictly beats the
    /// running maximum, so ties retain the earlier member. The running
    /// maximum starts at 0 with the member at index 0, which means an
    /// all-zero population yields the first member.
    pub fn best<'p>(&'p self, job: &Job) -> (&'p Member, f64) {
        let mut best_member = &self.members[0];
        let mut best_score = 0.0;
        for member in &self.members {
            let score = job.score(member.assignment());
            if score > best_score {
                best_score = score;
                best_member = member;
            }
        }
        (best_member, best_score)
    }
}

impl std::ops::Index<usize> for Population {
    type Output = Member;

    fn index(&self, index: usize) -> &Member {
        &self.members[index]
    }
}

impl FromIterator<Member> for Population {
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        Population {
            members: iter.into_iter().collect(),
        }
    }
}
