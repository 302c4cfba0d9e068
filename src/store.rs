use crate::job::Job;
use crate::solution::Solution;
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unable to find job with uuid {0}")]
    JobNotFound(Uuid),
    #[error("unable to find solution with uuid {0}")]
    SolutionNotFound(Uuid),
    /// An underlying persistence failure, surfaced verbatim.
    #[error("{0}")]
    Backend(String),
}

/// Persistence contract for jobs.
///
/// All operations are safe to call concurrently with the dispatcher's
/// worker threads; `find` never observes a partially inserted job.
pub trait JobStore: Send + Sync {
    fn insert(&self, job: Job) -> Result<(), StoreError>;

    /// Flips the stored job's `done` bit to true. Called exactly once per
    /// job, after its solution has been inserted.
    fn mark_done(&self, uuid: Uuid) -> Result<(), StoreError>;

    /// Returns a snapshot of the job; the `done` bit is stable as of the
    /// time of retrieval.
    fn find(&self, uuid: Uuid) -> Result<Job, StoreError>;
}

/// Persistence contract for solutions. `SolutionNotFound` is the normal
/// outcome while the background solve is still running.
pub trait SolutionStore: Send + Sync {
    fn insert(&self, solution: Solution) -> Result<(), StoreError>;
    fn find(&self, uuid: Uuid) -> Result<Solution, StoreError>;
}

/// Job store backed by a read/write-locked record list: many concurrent
/// readers, single-writer insert/update.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<Vec<Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for InMemoryJobStore {
    fn insert(&self, job: Job) -> Result<(), StoreError> {
        let mut jobs = self
            .jobs
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        jobs.push(job);
        Ok(())
    }

    fn mark_done(&self, uuid: Uuid) -> Result<(), StoreError> {
        let mut jobs = self
            .jobs
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match jobs.iter_mut().find(|job| job.uuid == uuid) {
            Some(job) => {
                job.done = true;
                Ok(())
            }
            None => Err(StoreError::JobNotFound(uuid)),
        }
    }

    fn find(&self, uuid: Uuid) -> Result<Job, StoreError> {
        let jobs = self
            .jobs
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        jobs.iter()
            .find(|job| job.uuid == uuid)
            .cloned()
            .ok_or(StoreError::JobNotFound(uuid))
    }
}

/// Solution store backed by the same locking discipline as the job store.
#[derive(Default)]
pub struct InMemorySolutionStore {
    solutions: RwLock<Vec<Solution>>,
}

impl InMemorySolutionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SolutionStore for InMemorySolutionStore {
    fn insert(&self, solution: Solution) -> Result<(), StoreError> {
        let mut solutions = self
            .solutions
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        solutions.push(solution);
        Ok(())
    }

    fn find(&self, uuid: Uuid) -> Result<Solution, StoreError> {
        let solutions = self
            .solutions
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        solutions
            .iter()
            .find(|solution| solution.uuid == uuid)
            .cloned()
            .ok_or(StoreError::SolutionNotFound(uuid))
    }
}
