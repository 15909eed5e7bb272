use clap::Parser;
use partcheck::{
    checks::checker::{CheckerError, check_instance_and_solution},
    io::report::Report,
};
use std::path::PathBuf;
use std::process::exit;
use tracing::{error, warn};

const EXIT_FAILURE: i32 = 1;
const EXIT_COST_MISMATCH: i32 = 2;

/// Recomputes the cost of a partitioning solution and compares it to the
/// cost the solution claims.
#[derive(Parser)]
#[command(version)]
pub struct Arguments {
    /// Instance file (max group area, cell areas, nets)
    pub instance: PathBuf,

    /// Solution file (claimed cost, number of groups, group of every cell)
    pub solution: PathBuf,

    /// Do not log warnings and errors to stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Treat warnings (e.g. declared sizes that do not match) as errors
    #[arg(short, long)]
    pub paranoid: bool,

    /// Print the report as JSON
    #[arg(short, long)]
    pub json: bool,
}

fn check(args: &Arguments) -> Result<bool, CheckerError> {
    let (instance, solution, result) =
        check_instance_and_solution(&args.instance, &args.solution, args.paranoid)?;

    let report = Report::new(&instance, &solution, &result);
    let mut stdout = std::io::stdout().lock();
    if args.json {
        report.write_json(&mut stdout)?;
    } else {
        report.write_text(&mut stdout)?;
    }

    Ok(result.matches())
}

fn main() {
    let args = Arguments::parse();

    if !args.quiet {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::INFO)
            .without_time()
            .init();
    }

    match check(&args) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Claimed cost does not match the recomputed cost");
            exit(EXIT_COST_MISMATCH)
        }
        Err(e) => {
            error!("{e}");
            exit(EXIT_FAILURE)
        }
    }
}
