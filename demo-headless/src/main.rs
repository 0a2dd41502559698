use clap::Parser;
use forest_sim_core::{
    CutPoints, FallMode, MonteCarlo, SimulationConfig, TimeoutPolicy, TrialOutcome,
};
use forest_sim_headless::{init_logging, load_config, render, results_file, HeadlessError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Forest fuel Monte Carlo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "forest-sim")]
#[command(about = "Expected time to forest burn-out or saturation under periodic raking", long_about = None)]
struct Args {
    /// JSON configuration file (missing fields use the reference defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// Number of trials
    #[arg(short = 'n', long)]
    trials: Option<u32>,

    /// Simulation horizon in days
    #[arg(long)]
    horizon: Option<u32>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Subtract leaf fall from growth instead of adding it
    #[arg(long)]
    subtract_fall: bool,

    /// Count timed-out trials at the horizon instead of excluding them
    #[arg(long)]
    censor_timeouts: bool,

    /// Run trials on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Write the sample of absorption days to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stratum cut-point for a stratified estimate (repeatable)
    #[arg(long = "cut", allow_negative_numbers = true)]
    cuts: Vec<i64>,

    /// Print the batch report as JSON
    #[arg(long)]
    json: bool,

    /// Print the final grid of the first trial
    #[arg(long)]
    show_grid: bool,
}

impl Args {
    fn build_config(&self) -> Result<SimulationConfig, HeadlessError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(trials) = self.trials {
            config.num_trials = trials;
        }
        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.subtract_fall {
            config.fall_mode = FallMode::Subtract;
        }
        if self.censor_timeouts {
            config.timeout_policy = TimeoutPolicy::CensorAtHorizon;
        }
        Ok(config)
    }
}

fn run(args: &Args) -> Result<(), HeadlessError> {
    let config = args.build_config()?;
    let batch = MonteCarlo::new(config)?;
    let config = batch.runner().config();

    println!("=== Forest Fuel Simulation ===\n");
    println!(
        "Grid {}x{}, {} trials, horizon {} days, seed {}",
        config.rows, config.cols, config.num_trials, config.horizon, config.seed
    );
    println!(
        "Raking {} every {} days, fall mode {:?}, timeouts {:?}\n",
        config.raking_amount, config.raking_frequency, config.fall_mode, config.timeout_policy
    );

    let report = if args.sequential {
        batch.run_sequential()
    } else {
        batch.run()
    };

    println!(
        "Outcomes: {} barren, {} saturated, {} timed out",
        report.count(TrialOutcome::Barren),
        report.count(TrialOutcome::Saturated),
        report.count(TrialOutcome::TimedOut)
    );
    let estimate = report.estimate();
    println!("The mean t is {:.6} +- {:.6} (n = {})", estimate.mean, estimate.half_width, estimate.n);

    if !args.cuts.is_empty() {
        let cuts = CutPoints::new(args.cuts.iter().copied(), config.horizon);
        let stratified = report.stratified(&cuts);
        println!(
            "Stratified over {} strata: {:.6} +- {:.6}",
            stratified.strata.len(),
            stratified.estimate.mean,
            stratified.estimate.half_width
        );
    }

    if let Some(path) = &args.output {
        results_file::write_samples(path, &report.samples())?;
        println!("Wrote {} absorption days to {}", report.samples().len(), path.display());
    }

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => error!("Failed to serialize report: {err}"),
        }
    }

    if args.show_grid {
        let (result, state) = batch.runner().run_trial_with_state(0);
        println!(
            "\nTrial 0 ended {} on day {}. Leaf volume:",
            result.outcome, result.day
        );
        print!("{}", render::leaf_matrix(state.grid()));
        println!("Nutrient volume:");
        print!("{}", render::nutrient_matrix(state.grid()));
        println!("Fire:");
        print!("{}", render::fire_matrix(state.grid()));
    }

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
