use crate::random::{RandomFactory, RandomSource};
use crate::solver::population::{Member, Population};
use std::sync::Arc;

/// Seeds the initial population for a solve.
///
/// The first two members are always the all-true and all-false assignments;
/// the rest are unique random draws up to `min(max_population, 2^n)`.
pub struct PopulationGenerator {
    random_factory: Arc<dyn RandomFactory>,
}

impl PopulationGenerator {
    pub fn new(random_factory: Arc<dyn RandomFactory>) -> Self {
        PopulationGenerator { random_factory }
    }

    pub fn generate(&self, max_population: usize, names: &[String]) -> Population {
        let mut population = Self::base_members(names);
        let target = match 1usize.checked_shl(names.len() as u32) {
            // The full assignment space fits in a usize; never ask for more.
            Some(space) => max_population.min(space),
            None => max_population,
        };

        let mut random = self.random_factory.build();
        while population.len() < target {
            let mut member = Self::random_member(names, random.as_mut());
            while population.contains(&member) {
                member = Self::random_member(names, random.as_mut());
            }
            population.push(member);
        }
        population
    }

    fn base_members(names: &[String]) -> Population {
        let all_true = Member::new(names.iter().map(|name| (name.clone(), true)).collect());
        let all_false = Member::new(names.iter().map(|name| (name.clone(), false)).collect());

        let mut population = Population::with_capacity(2);
        population.push(all_true);
        population.push(all_false);
        population
    }

    fn random_member(names: &[String], random: &mut dyn RandomSource) -> Member {
        Member::new(
            names
                .iter()
                .map(|name| (name.clone(), random.index(2) == 1))
                .collect(),
        )
    }
}
