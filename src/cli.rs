pub mod generate;
pub mod solve;

use comfy_table::{Table, presets::UTF8_FULL};
use evosat::utils::human_duration;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use num_format::{Locale, ToFormattedString};
use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Which solver strategy backs the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SolverKind {
    Genetic,
    Naive,
}

pub fn parse_num_worker_threads(s: &str) -> Result<usize, String> {
    if s == "auto" {
        let n = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Ok(n)
    } else {
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!("Invalid value for --worker-threads: {}", s)),
        }
    }
}

/// Wires env_logger through the progress-bar multiplexer so log lines and
/// bars interleave cleanly.
pub fn init_logging() -> MultiProgress {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .build();
    let progress = MultiProgress::new();
    LogWrapper::new(progress.clone(), logger)
        .try_init()
        .expect("Failed to initialize logging");
    progress
}

pub fn create_progress_bar(progress: &MultiProgress, len: usize) -> ProgressBar {
    let pb = progress.add(ProgressBar::new(len as u64));
    pb.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("Progress template is valid")
            .progress_chars("=> "),
    );
    pb
}

/// Collects the instance files to submit: a single file, or every `.cnf`
/// file in a directory (sorted for stable submission order).
pub fn get_problem_input_queue(
    path: &Path,
    limit: Option<usize>,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut queue = if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().map(|ext| ext == "cnf").unwrap_or(false))
            .collect();
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    };

    if let Some(limit) = limit {
        queue.truncate(limit);
    }
    Ok(queue)
}

/// Per-run counters, printed as a summary table once all jobs resolve.
pub struct Stats {
    pub submitted: usize,
    pub satisfied: usize,
    pub failed: usize,
    pub total_cycles: u64,
    pub scores: Vec<f64>,
    pub parse_durations: Vec<Duration>,
    pub solve_durations: Vec<Duration>,
}

impl Stats {
    pub fn new() -> Self {
        Stats {
            submitted: 0,
            satisfied: 0,
            failed: 0,
            total_cycles: 0,
            scores: Vec::new(),
            parse_durations: Vec::new(),
            solve_durations: Vec::new(),
        }
    }

    pub fn print_summary(&self) {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Metric", "Value"]);
        table.add_row(vec![
            "Jobs submitted".to_string(),
            self.submitted.to_formatted_string(&Locale::en),
        ]);
        table.add_row(vec![
            "Fully satisfied".to_string(),
            self.satisfied.to_formatted_string(&Locale::en),
        ]);
        table.add_row(vec!["Failed".to_string(), self.failed.to_string()]);
        table.add_row(vec![
            "Mean score".to_string(),
            format!("{:.3}", mean(&self.scores)),
        ]);
        table.add_row(vec![
            "Total cycles".to_string(),
            self.total_cycles.to_formatted_string(&Locale::en),
        ]);
        table.add_row(vec![
            "Mean parse time".to_string(),
            human_duration(mean_duration(&self.parse_durations)),
        ]);
        table.add_row(vec![
            "Mean solve time".to_string(),
            human_duration(mean_duration(&self.solve_durations)),
        ]);
        println!("{table}");
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean_duration(durations: &[Duration]) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }
    durations.iter().sum::<Duration>() / durations.len() as u32
}
