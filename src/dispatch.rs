use crate::job::{Job, NewJob};
use crate::solution::Solution;
use crate::solver::Solver;
use crate::store::{JobStore, SolutionStore, StoreError};
use crate::utils::human_duration;
use log::{error, info};
use nonzero_ext::nonzero;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::{self, available_parallelism};
use uuid::Uuid;

/// Owns all in-flight solve work for the process.
///
/// Submissions get a fresh UUID, land in the job store, and are queued to a
/// fixed pool of solve workers; the submitter gets the job back before any
/// solving happens. Reads are delegated straight to the stores.
pub struct JobDispatcher {
    job_store: Arc<dyn JobStore>,
    solution_store: Arc<dyn SolutionStore>,
    job_sender: crossbeam_channel::Sender<Job>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl JobDispatcher {
    pub fn new(
        solver: Arc<dyn Solver>,
        job_store: Arc<dyn JobStore>,
        solution_store: Arc<dyn SolutionStore>,
        requested_num_workers: NonZeroUsize,
    ) -> Self {
        // Limit number of workers to available parallelism
        let num_workers =
            requested_num_workers.min(available_parallelism().unwrap_or(nonzero!(1usize)));

        let (job_sender, job_receiver) = crossbeam_channel::unbounded::<Job>();

        let mut workers = Vec::with_capacity(num_workers.get());
        for worker_id in 0..num_workers.get() {
            let receiver = job_receiver.clone();
            let solver = Arc::clone(&solver);
            let job_store = Arc::clone(&job_store);
            let solution_store = Arc::clone(&solution_store);

            workers.push(thread::spawn(move || {
                run_worker(worker_id, receiver, solver, job_store, solution_store);
            }));
        }

        info!("Initialized dispatcher with {} solve worker(s).", num_workers);
        JobDispatcher {
            job_store,
            solution_store,
            job_sender,
            workers,
        }
    }

    /// Accepts a submission: mints the job, persists it, queues the solve,
    /// and returns the job immediately.
    ///
    /// A store failure is returned to the caller and the job is not
    /// queued; a closed queue surfaces as a backend error.
    pub fn dispatch_job(&self, new_job: NewJob) -> Result<Job, StoreError> {
        let job = Job::create(new_job);
        self.job_store.insert(job.clone())?;

        if self.job_sender.send(job.clone()).is_err() {
            return Err(StoreError::Backend("solve queue is closed".to_string()));
        }

        info!("Dispatched job {} ('{}').", job.uuid, job.name);
        Ok(job)
    }

    pub fn find_job(&self, uuid: Uuid) -> Result<Job, StoreError> {
        self.job_store.find(uuid)
    }

    pub fn find_solution(&self, uuid: Uuid) -> Result<Solution, StoreError> {
        self.solution_store.find(uuid)
    }

    /// Shuts down the pool, draining every queued and in-flight job first.
    pub fn join(self) {
        drop(self.job_sender);
        for worker in self.workers {
            let _ = worker.join();
        }
    }
}

/// Worker loop: one queued job at a time, solution insert strictly before
/// mark-done so that `done == true` implies the solution is visible.
fn run_worker(
    worker_id: usize,
    receiver: crossbeam_channel::Receiver<Job>,
    solver: Arc<dyn Solver>,
    job_store: Arc<dyn JobStore>,
    solution_store: Arc<dyn SolutionStore>,
) {
    while let Ok(job) = receiver.recv() {
        let solution = solver.solve(&job);
        info!(
            "[{}] Job {} scored {:.3} after {} cycle(s) in {}.",
            worker_id,
            job.uuid,
            solution.score,
            solution.cycles,
            human_duration(solution.elapsed)
        );

        // No retries: a failed write leaves the job not-done for good.
        if let Err(e) = solution_store.insert(solution) {
            error!("[{}] Failed to store solution for job {}: {}", worker_id, job.uuid, e);
            continue;
        }
        if let Err(e) = job_store.mark_done(job.uuid) {
            error!("[{}] Failed to mark job {} done: {}", worker_id, job.uuid, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{NewClause, NewVariable};
    use crate::random::FixedRandomFactory;
    use crate::solver::generator::PopulationGenerator;
    use crate::solver::genetic::GeneticSolver;
    use crate::solver::naive::NaiveSolver;
    use crate::store::{InMemoryJobStore, InMemorySolutionStore};
    use crate::utils::Backoff;
    use std::time::{Duration, Instant};

    fn genetic_dispatcher() -> JobDispatcher {
        let factory: Arc<dyn crate::random::RandomFactory> = Arc::new(FixedRandomFactory::new(0));
        let solver = GeneticSolver::new(
            10,
            Duration::from_millis(1),
            PopulationGenerator::new(Arc::clone(&factory)),
            factory,
        );
        JobDispatcher::new(
            Arc::new(solver),
            Arc::new(InMemoryJobStore::new()),
            Arc::new(InMemorySolutionStore::new()),
            nonzero!(2usize),
        )
    }

    fn single_clause_job() -> NewJob {
        NewJob {
            name: "simplejob".to_string(),
            clauses: vec![NewClause::new(
                NewVariable::new("var1", false),
                NewVariable::new("var2", false),
                NewVariable::new("var3", false),
            )],
        }
    }

    fn await_solution(dispatcher: &JobDispatcher, uuid: Uuid) -> Solution {
        let mut backoff = Backoff::new(
            64,
            128,
            Duration::from_micros(10),
            Duration::from_millis(5),
            1.5,
        );
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match dispatcher.find_solution(uuid) {
                Ok(solution) => return solution,
                Err(StoreError::SolutionNotFound(_)) if Instant::now() < deadline => {
                    backoff.wait();
                }
                Err(e) => panic!("polling for solution failed: {}", e),
            }
        }
    }

    #[test]
    fn test_dispatch_returns_immediately_and_solves_in_background() {
        let dispatcher = genetic_dispatcher();

        let job = dispatcher.dispatch_job(single_clause_job()).unwrap();
        assert!(!job.done);

        let solution = await_solution(&dispatcher, job.uuid);
        assert_eq!(solution.uuid, job.uuid);
        assert_eq!(solution.score, 1.0);
    }

    #[test]
    fn test_done_follows_solution_visibility() {
        let dispatcher = genetic_dispatcher();
        let job = dispatcher.dispatch_job(single_clause_job()).unwrap();

        // Wait until the job reads done, then the solution must already be
        // there: insert happens strictly before mark-done.
        let mut backoff = Backoff::new(
            64,
            128,
            Duration::from_micros(10),
            Duration::from_millis(5),
            1.5,
        );
        let deadline = Instant::now() + Duration::from_secs(10);
        while !dispatcher.find_job(job.uuid).unwrap().done {
            assert!(Instant::now() < deadline, "job never completed");
            backoff.wait();
        }

        assert_eq!(dispatcher.find_solution(job.uuid).unwrap().uuid, job.uuid);
    }

    #[test]
    fn test_lookups_for_unknown_uuids_are_not_found() {
        let dispatcher = genetic_dispatcher();
        let uuid = Uuid::new_v4();

        assert_eq!(
            dispatcher.find_job(uuid).unwrap_err(),
            StoreError::JobNotFound(uuid)
        );
        assert_eq!(
            dispatcher.find_solution(uuid).unwrap_err(),
            StoreError::SolutionNotFound(uuid)
        );
    }

    #[test]
    fn test_join_drains_queued_jobs() {
        let dispatcher = JobDispatcher::new(
            Arc::new(NaiveSolver),
            Arc::new(InMemoryJobStore::new()),
            Arc::new(InMemorySolutionStore::new()),
            nonzero!(1usize),
        );

        let jobs: Vec<Job> = (0..8)
            .map(|_| dispatcher.dispatch_job(single_clause_job()).unwrap())
            .collect();

        let job_store: Arc<dyn JobStore> = Arc::clone(&dispatcher.job_store);
        let solution_store: Arc<dyn SolutionStore> = Arc::clone(&dispatcher.solution_store);
        dispatcher.join();

        for job in &jobs {
            assert!(job_store.find(job.uuid).unwrap().done);
            assert_eq!(solution_store.find(job.uuid).unwrap().uuid, job.uuid);
        }
    }
}
