pub mod cli;

use clap::{Parser, Subcommand};
use std::{error::Error, path::PathBuf};

use crate::cli::{SolverKind, generate::generate, solve::solve};

#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit 3-CNF problem instances and poll for their solutions
    Solve {
        /// Path to a file or directory of DIMACS 3-CNF problem instances
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// Limit the number of problems to submit
        #[arg(short = 'l', long = "limit", value_name = "LIMIT")]
        limit: Option<usize>,
        /// Solver strategy
        #[arg(
            short = 's',
            long = "solver",
            value_name = "SOLVER",
            default_value = "genetic"
        )]
        solver: SolverKind,
        /// Evolution time budget per job, in milliseconds
        #[arg(long = "max-time-ms", value_name = "MS", default_value = "10000")]
        max_time_ms: u64,
        /// Maximum population size per job
        #[arg(long = "max-population", value_name = "N", default_value = "10")]
        max_population: usize,
        /// Fix the random seed for reproducible runs
        #[arg(long = "seed", value_name = "SEED")]
        seed: Option<u64>,
        /// Number of solve worker threads (number or 'auto')
        #[arg(short = 'w', long = "worker-threads", value_name = "N", default_value = "1", value_parser = cli::parse_num_worker_threads)]
        num_worker_threads: usize,
        /// Disable the progress bar
        #[arg(long = "no-bar")]
        no_progress_bar: bool,
    },
    /// Emit a random 3-CNF instance in DIMACS format on stdout
    #[command(name = "generate")]
    Generate {
        /// Number of clauses to emit
        num_clauses: usize,
        /// Number of distinct variables to draw literals from
        #[arg(short = 'v', long = "vars", value_name = "N", default_value = "150")]
        num_vars: usize,
        /// Fix the random seed for reproducible instances
        #[arg(long = "seed", value_name = "SEED")]
        seed: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Command::Solve {
            path,
            limit,
            solver,
            max_time_ms,
            max_population,
            seed,
            num_worker_threads,
            no_progress_bar,
        } => {
            solve(
                path,
                limit,
                solver,
                max_time_ms,
                max_population,
                seed,
                num_worker_threads,
                no_progress_bar,
            )?;
        }
        Command::Generate {
            num_clauses,
            num_vars,
            seed,
        } => {
            generate(num_clauses, num_vars, seed)?;
        }
    }

    Ok(())
}
