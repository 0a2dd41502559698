//! Monte Carlo harness
//!
//! Runs `num_trials` independent trials of one configuration and collects
//! their results. Trials share only the read-only topology; each draws from
//! its own random stream, so the parallel and sequential runners return the
//! same results in the same order.

use super::trial::{TrialOutcome, TrialResult, TrialRunner};
use crate::config::{SimulationConfig, TimeoutPolicy};
use crate::error::ConfigError;
use crate::stats::{CutPoints, Estimate, StratifiedEstimate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Batch of trials for one configuration
#[derive(Debug, Clone)]
pub struct MonteCarlo {
    runner: TrialRunner,
}

impl MonteCarlo {
    /// Validate `config` and prepare a batch
    ///
    /// # Errors
    /// Returns the configuration error if `config` is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            runner: TrialRunner::new(config)?,
        })
    }

    /// Underlying trial runner
    pub fn runner(&self) -> &TrialRunner {
        &self.runner
    }

    /// Run every trial on the rayon thread pool
    pub fn run(&self) -> BatchReport {
        let config = self.runner.config();
        info!(
            "Running {} trials on {}x{} grid (horizon {} days, seed {})",
            config.num_trials, config.rows, config.cols, config.horizon, config.seed
        );
        let results: Vec<TrialResult> = (0..config.num_trials)
            .into_par_iter()
            .map(|trial| self.runner.run_trial(u64::from(trial)))
            .collect();
        self.finish(results)
    }

    /// Run every trial on the calling thread
    pub fn run_sequential(&self) -> BatchReport {
        let config = self.runner.config();
        info!(
            "Running {} trials sequentially on {}x{} grid (horizon {} days, seed {})",
            config.num_trials, config.rows, config.cols, config.horizon, config.seed
        );
        let results: Vec<TrialResult> = (0..config.num_trials)
            .map(|trial| self.runner.run_trial(u64::from(trial)))
            .collect();
        self.finish(results)
    }

    fn finish(&self, results: Vec<TrialResult>) -> BatchReport {
        let config = self.runner.config();
        let report = BatchReport {
            results,
            horizon: config.horizon,
            timeout_policy: config.timeout_policy,
        };

        let timed_out = report.count(TrialOutcome::TimedOut);
        if timed_out > 0 && report.timeout_policy == TimeoutPolicy::Exclude {
            warn!(
                "{} of {} trials reached the {}-day horizon without absorbing and are excluded; \
                 the mean is biased toward fast absorption",
                timed_out,
                report.results.len(),
                report.horizon
            );
        }
        info!(
            "Batch finished: {} barren, {} saturated, {} timed out, mean t = {:.3}",
            report.count(TrialOutcome::Barren),
            report.count(TrialOutcome::Saturated),
            timed_out,
            report.estimate()
        );
        report
    }
}

/// Results of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One result per trial, in trial order
    pub results: Vec<TrialResult>,
    /// Horizon the trials ran against
    pub horizon: u32,
    /// How timed-out trials enter the sample
    pub timeout_policy: TimeoutPolicy,
}

impl BatchReport {
    /// Number of trials that ended with `outcome`
    pub fn count(&self, outcome: TrialOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Absorption days of trials that reached an absorbing state
    pub fn absorption_days(&self) -> Vec<u32> {
        self.results
            .iter()
            .filter(|r| r.is_absorbed())
            .map(|r| r.day)
            .collect()
    }

    /// Sample fed to the estimators under the timeout policy
    pub fn samples(&self) -> Vec<u32> {
        match self.timeout_policy {
            TimeoutPolicy::Exclude => self.absorption_days(),
            TimeoutPolicy::CensorAtHorizon => self.results.iter().map(|r| r.day).collect(),
        }
    }

    /// Naive mean and 95% half-width
    pub fn estimate(&self) -> Estimate {
        Estimate::from_samples(&self.samples())
    }

    /// Stratified mean and 95% half-width
    pub fn stratified(&self, cuts: &CutPoints) -> StratifiedEstimate {
        StratifiedEstimate::compute(&self.samples(), cuts)
    }
}
