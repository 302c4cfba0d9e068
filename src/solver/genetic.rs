use crate::job::Job;
use crate::random::{RandomFactory, RandomSource};
use crate::solution::Solution;
use crate::solver::Solver;
use crate::solver::generator::PopulationGenerator;
use crate::solver::population::{Member, Population};
use crate::solver::rank::MemberRanks;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Evolutionary 3-SAT search.
///
/// Seeds a population, then repeatedly replaces it with a generation of
/// unique children bred by fitness-proportional selection and crossover,
/// until a member satisfies every clause or the time budget runs out.
/// When the whole assignment space fits inside `max_population` the
/// population already enumerates it, so evolution is skipped and the best
/// seeded member is the answer.
pub struct GeneticSolver {
    max_population: usize,
    max_time: Duration,
    generator: PopulationGenerator,
    random_factory: Arc<dyn RandomFactory>,
}

impl GeneticSolver {
    pub fn new(
        max_population: usize,
        max_time: Duration,
        generator: PopulationGenerator,
        random_factory: Arc<dyn RandomFactory>,
    ) -> Self {
        GeneticSolver {
            max_population,
            max_time,
            generator,
            random_factory,
        }
    }

    fn start(
        &self,
        job: &Job,
        population: Population,
        random: &mut dyn RandomSource,
    ) -> (Member, usize) {
        if population.len() < self.max_population {
            // The population enumerates the entire assignment space.
            let (best, _) = population.best(job);
            (best.clone(), 0)
        } else {
            self.evolve(job, population, random)
        }
    }

    /// Runs generations until a perfect score or the time budget expires.
    ///
    /// The budget is measured from here, not from solve start; setup cost
    /// is not billed against it.
    fn evolve(
        &self,
        job: &Job,
        mut population: Population,
        random: &mut dyn RandomSource,
    ) -> (Member, usize) {
        let start = Instant::now();
        let mut cycles = 0;
        let (member, mut best_score) = population.best(job);
        let mut best = member.clone();

        while start.elapsed() < self.max_time && best_score < 1.0 {
            population = self.reproduce(job, &population, random);
            let (member, score) = population.best(job);
            best = member.clone();
            best_score = score;
            cycles += 1;
        }
        (best, cycles)
    }

    /// Breeds a full replacement generation of pairwise-unique children.
    ///
    /// Terminates because evolve only runs when `2^n >= max_population`,
    /// so a population of unique children always exists.
    fn reproduce(
        &self,
        job: &Job,
        population: &Population,
        random: &mut dyn RandomSource,
    ) -> Population {
        let ranks = MemberRanks::rank(population, job);
        let mut next = Population::with_capacity(population.len());
        for _ in 0..population.len() {
            let mut child = Self::breed(&ranks, population, random);
            while next.contains(&child) {
                child = Self::breed(&ranks, population, random);
            }
            next.push(child);
        }
        next
    }

    fn breed(
        ranks: &MemberRanks,
        population: &Population,
        random: &mut dyn RandomSource,
    ) -> Member {
        let parent1 = ranks.select_member(random);
        let mut parent2 = ranks.select_member(random);
        while parent1 == parent2 {
            parent2 = ranks.select_member(random);
        }
        population[parent1].crossover(&population[parent2], random)
    }
}

impl Solver for GeneticSolver {
    fn solve(&self, job: &Job) -> Solution {
        let start = Instant::now();
        let mut random = self.random_factory.build();
        let names = job.variables();
        let population = self.generator.generate(self.max_population, &names);
        let (best, cycles) = self.start(job, population, random.as_mut());
        Solution::package(best.assignment(), job, cycles, start.elapsed())
    }
}
