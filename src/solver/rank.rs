use crate::job::Job;
use crate::random::RandomSource;
use crate::solver::population::Population;
use itertools::Itertools;

/// One entry of the selection table: a population index and, after
/// normalization, the cumulative fitness up to and including that entry.
#[derive(Debug, Clone, Copy)]
pub struct MemberRank {
    pub index: usize,
    pub fitness: f64,
}

/// A fitness-proportional selection table.
///
/// Entries are sorted by descending raw fitness, then rewritten in place so
/// each holds the running sum of normalized fitness; the last entry ends at
/// 1 within floating-point error.
#[derive(Debug)]
pub struct MemberRanks(Vec<MemberRank>);

impl MemberRanks {
    pub fn rank(population: &Population, job: &Job) -> Self {
        let mut total = 0.0;
        let mut ranks: Vec<MemberRank> = population
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let fitness = job.score(member.assignment());
                total += fitness;
                MemberRank { index, fitness }
            })
            .collect();
        assert!(
            total > 0.0,
            "Cannot rank a population in which every member has zero fitness."
        );

        ranks = ranks
            .into_iter()
            .sorted_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(std::cmp::Ordering::Equal))
            .collect();

        // The running sum must land in the table itself, not a loop copy.
        let mut cumulative = 0.0;
        for rank in ranks.iter_mut() {
            cumulative += rank.fitness / total;
            rank.fitness = cumulative;
        }

        MemberRanks(ranks)
    }

    /// Draws a population index with probability proportional to fitness.
    ///
    /// Scans the descending-order table for the first entry whose
    /// cumulative fitness exceeds the drawn target; the numerical tail
    /// falls through to the last entry.
    pub fn select_member(&self, random: &mut dyn RandomSource) -> usize {
        let target = random.float();
        for rank in &self.0 {
            if rank.fitness > target {
                return rank.index;
            }
        }
        self.0
            .last()
            .expect("Cannot select from an empty rank table.")
            .index
    }

    #[cfg(test)]
    fn entries(&self) -> &[MemberRank] {
        &self.0
    }
}
