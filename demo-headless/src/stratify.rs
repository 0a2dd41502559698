use clap::Parser;
use forest_sim_core::{CutPoints, StratifiedEstimate};
use forest_sim_headless::{init_logging, results_file, HeadlessError};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

/// Stratified confidence interval for a results file of absorption days
#[derive(Parser, Debug)]
#[command(name = "stratify")]
#[command(about = "Stratified variance reduction over recorded absorption days", long_about = None)]
struct Args {
    /// Results file: whitespace-separated absorption days
    file: PathBuf,

    /// Stratum cut-point (repeatable). Read from stdin up to a negative value when omitted
    #[arg(long = "cut", allow_negative_numbers = true)]
    cuts: Vec<i64>,

    /// Cut-points must lie strictly below this bound
    #[arg(long, default_value_t = 18250)]
    horizon: u32,
}

/// Read cut-points from stdin, one prompt per line, up to a negative value
fn read_cuts_from_stdin(horizon: u32) -> Result<CutPoints, HeadlessError> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let prompt = || {
        if interactive {
            eprint!("enter interval : ");
            let _ = io::stderr().flush();
        }
    };
    results_file::read_cut_points(stdin.lock(), horizon, prompt).map_err(|source| {
        HeadlessError::FileAccess {
            path: PathBuf::from("<stdin>"),
            source,
        }
    })
}

fn run(args: &Args) -> Result<(), HeadlessError> {
    let samples = results_file::read_samples(&args.file)?;
    info!("Read {} samples from {}", samples.len(), args.file.display());

    let cuts = if args.cuts.is_empty() {
        read_cuts_from_stdin(args.horizon)?
    } else {
        CutPoints::new(args.cuts.iter().copied(), args.horizon)
    };
    debug!("Cut-points: {:?}", cuts.as_slice());

    let result = StratifiedEstimate::compute(&samples, &cuts);
    for stratum in &result.strata {
        debug!(
            "Stratum ({:?}, {:?}]: size {}, std {:.4}, weight {:.4}",
            stratum.lower, stratum.upper, stratum.size, stratum.std_dev, stratum.weight
        );
    }

    println!();
    println!(
        "The mean t for file {} is {:.6} +- {:.6}",
        args.file.display(),
        result.estimate.mean,
        result.estimate.half_width
    );

    let artifact = results_file::write_artifact(&args.file, &result.estimate)?;
    info!("Wrote {}", artifact.display());
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
