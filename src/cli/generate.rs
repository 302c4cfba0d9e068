use std::{
    error::Error,
    io::{self, BufWriter, Write},
};

/// Emits a random 3-CNF instance in DIMACS format on stdout.
///
/// Each clause draws three distinct variables and negates each literal with
/// probability one half, so instances look like the random jobs the solver
/// is tuned for.
pub fn generate(num_clauses: usize, num_vars: usize, seed: Option<u64>) -> Result<(), Box<dyn Error>> {
    if num_vars < 3 {
        return Err("At least 3 variables are required for three-literal clauses".into());
    }

    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let stdout = io::stdout();
    let handle = stdout.lock();
    let mut writer = BufWriter::new(handle);

    writeln!(
        writer,
        "c Random 3-CNF with {} clauses over {} variables",
        num_clauses, num_vars
    )?;
    writeln!(writer, "p cnf {} {}", num_vars, num_clauses)?;

    for _ in 0..num_clauses {
        let mut vars = [0usize; 3];
        vars[0] = rng.usize(1..=num_vars);
        loop {
            vars[1] = rng.usize(1..=num_vars);
            if vars[1] != vars[0] {
                break;
            }
        }
        loop {
            vars[2] = rng.usize(1..=num_vars);
            if vars[2] != vars[0] && vars[2] != vars[1] {
                break;
            }
        }

        for var in vars {
            if rng.bool() {
                write!(writer, "-{} ", var)?;
            } else {
                write!(writer, "{} ", var)?;
            }
        }
        writeln!(writer, "0")?;
    }

    writer.flush()?;
    Ok(())
}
