use crate::cli::{self, SolverKind, Stats};
use evosat::{
    dispatch::JobDispatcher,
    job::Job,
    parser::parse_dimacs_3cnf,
    random::{FixedRandomFactory, RandomFactory, TimeRandomFactory},
    record_time,
    solution::Solution,
    solver::{
        Solver, generator::PopulationGenerator, genetic::GeneticSolver, naive::NaiveSolver,
    },
    store::{InMemoryJobStore, InMemorySolutionStore, StoreError},
    utils::{Backoff, human_duration},
};
use log::{error, info, warn};
use memmap2::Mmap;
use nonzero_ext::nonzero;
use std::{
    error::Error,
    fs::File,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

pub fn solve(
    path: PathBuf,
    limit: Option<usize>,
    solver_kind: SolverKind,
    max_time_ms: u64,
    max_population: usize,
    seed: Option<u64>,
    num_worker_threads: usize,
    no_progress_bar: bool,
) -> Result<(), Box<dyn Error>> {
    let progress = cli::init_logging();

    let start = Instant::now();
    let max_time = Duration::from_millis(max_time_ms);
    let dispatcher = build_dispatcher(
        solver_kind,
        max_time,
        max_population,
        seed,
        num_worker_threads,
    );

    let queue = cli::get_problem_input_queue(&path, limit)?;
    if queue.is_empty() {
        warn!("No problem instances found under {:?}.", path);
        return Ok(());
    }

    // Submit everything up front; the worker pool fans the solves out while
    // we poll for results in submission order.
    let mut stats = Stats::new();
    let mut submitted = Vec::with_capacity(queue.len());
    for path in &queue {
        match submit_file(path, &dispatcher, &mut stats) {
            Ok(job) => submitted.push(job),
            Err(e) => {
                error!("Error while submitting {:?}: {}", path, e);
                stats.failed += 1;
            }
        }
    }

    let pb = if !no_progress_bar && submitted.len() > 1 {
        Some(cli::create_progress_bar(&progress, submitted.len()))
    } else {
        None
    };

    // A solve may exceed its budget by setup and store writes; queued jobs
    // also wait for a worker slot.
    let wait_limit = max_time * 2 + Duration::from_secs(5) + max_time * submitted.len() as u32;
    for job in &submitted {
        match poll_solution(&dispatcher, job, wait_limit) {
            Some(solution) => record_solution(&dispatcher, job, &solution, &mut stats),
            None => {
                warn!("Timed out waiting for a solution to job {}.", job.uuid);
                stats.failed += 1;
            }
        }
        if let Some(p) = &pb {
            p.inc(1);
        }
    }
    if let Some(p) = &pb {
        p.finish_with_message("done");
    }

    stats.print_summary();
    info!("Total runtime: {}", human_duration(start.elapsed()));

    dispatcher.join();
    Ok(())
}

fn build_dispatcher(
    solver_kind: SolverKind,
    max_time: Duration,
    max_population: usize,
    seed: Option<u64>,
    num_worker_threads: usize,
) -> JobDispatcher {
    let random_factory: Arc<dyn RandomFactory> = match seed {
        Some(seed) => Arc::new(FixedRandomFactory::new(seed)),
        None => Arc::new(TimeRandomFactory),
    };

    let solver: Arc<dyn Solver> = match solver_kind {
        SolverKind::Genetic => Arc::new(GeneticSolver::new(
            max_population,
            max_time,
            PopulationGenerator::new(Arc::clone(&random_factory)),
            random_factory,
        )),
        SolverKind::Naive => Arc::new(NaiveSolver),
    };

    JobDispatcher::new(
        solver,
        Arc::new(InMemoryJobStore::new()),
        Arc::new(InMemorySolutionStore::new()),
        NonZeroUsize::new(num_worker_threads).unwrap_or(nonzero!(1usize)),
    )
}

/// Parses a single instance file and hands it to the dispatcher.
fn submit_file(
    path: &Path,
    dispatcher: &JobDispatcher,
    stats: &mut Stats,
) -> Result<Job, Box<dyn Error>> {
    info!("Submitting {:?}", path);
    stats.submitted += 1;

    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("instance");

    let new_job = record_time!(stats.parse_durations, {
        parse_dimacs_3cnf(&mmap, name)?
    });

    Ok(dispatcher.dispatch_job(new_job)?)
}

/// Polls the solution store until the background solve publishes, or the
/// wait limit passes.
fn poll_solution(
    dispatcher: &JobDispatcher,
    job: &Job,
    wait_limit: Duration,
) -> Option<Solution> {
    let mut backoff = Backoff::new(
        128,
        512,
        Duration::from_micros(50),
        Duration::from_millis(20),
        1.2,
    );
    let start = Instant::now();
    loop {
        match dispatcher.find_solution(job.uuid) {
            Ok(solution) => return Some(solution),
            Err(StoreError::SolutionNotFound(_)) => {
                if start.elapsed() > wait_limit {
                    return None;
                }
                backoff.wait();
            }
            Err(e) => {
                error!("Lookup failed for job {}: {}", job.uuid, e);
                return None;
            }
        }
    }
}

fn record_solution(
    dispatcher: &JobDispatcher,
    job: &Job,
    solution: &Solution,
    stats: &mut Stats,
) {
    stats.scores.push(solution.score);
    stats.total_cycles += solution.cycles as u64;
    stats.solve_durations.push(solution.elapsed);
    if solution.score == 1.0 {
        stats.satisfied += 1;
    }

    let done = dispatcher
        .find_job(job.uuid)
        .map(|found| found.done)
        .unwrap_or(false);
    info!(
        "{}: score {:.3}, {} cycle(s), {} ({}ms), done={}",
        job.name,
        solution.score,
        solution.cycles,
        human_duration(solution.elapsed),
        solution.elapsed.as_millis(),
        done
    );
}
