use std::fmt;

use crate::error::Result;
use crate::optimizer::OptimizerConfig;
use crate::surface::SurfaceKind;
use super::{Run, RunOptions, RunStatus, Trajectory};

pub const TUNING_ITERATIONS: usize = 150;
pub const TUNING_THRESHOLD: f64 = 0.001;

/// Qualitative rating of a tuning run
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Excellent,
    Good,
    /// Loss stayed above 1: the step size is likely too large
    Poor,
    /// Budget used up without a good loss: the step size is likely too small
    Slow,
    Moderate,
}

impl Verdict {
    /// Rate a run by its final loss and path length
    pub fn classify(final_loss: f64, iterations: usize) -> Self {
        if final_loss < 0.01 && iterations < 50 {
            Verdict::Excellent
        } else if final_loss < 0.1 && iterations < 100 {
            Verdict::Good
        } else if final_loss > 1.0 {
            Verdict::Poor
        } else if iterations >= TUNING_ITERATIONS {
            Verdict::Slow
        } else {
            Verdict::Moderate
        }
    }
}

/// Result of a hyperparameter-tuning run on the sphere
#[derive(Clone, Debug)]
pub struct TuningOutcome {
    pub config: OptimizerConfig,
    pub trajectory: Trajectory,
    pub final_loss: f64,
    /// Path length, start point included
    pub iterations: usize,
    pub status: RunStatus,
    pub verdict: Verdict,
}

/// Run `config` on the sphere from (2, 2) until the loss drops below
/// [`TUNING_THRESHOLD`] or [`TUNING_ITERATIONS`] steps pass.
pub fn tune(config: OptimizerConfig) -> Result<TuningOutcome> {
    let options = RunOptions {
        max_iterations: TUNING_ITERATIONS,
        convergence_threshold: Some(TUNING_THRESHOLD),
        ..RunOptions::default()
    };
    let mut run = Run::new(SurfaceKind::Sphere.surface(), &[config], options)?;
    let status = run.run_to_end();

    let trajectory = run.lanes()[0].trajectory().clone();
    let final_loss = run.surface().value_at(trajectory.last());
    let iterations = trajectory.len();

    Ok(TuningOutcome {
        config,
        final_loss,
        iterations,
        status,
        verdict: Verdict::classify(final_loss, iterations),
        trajectory,
    })
}

impl fmt::Display for TuningOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lr = self.config.learning_rate();
        let n = self.iterations;
        match self.verdict {
            Verdict::Excellent => write!(f, "Excellent: converged in {n} iterations with lr={lr:.4}"),
            Verdict::Good => write!(f, "Good convergence in {n} iterations"),
            Verdict::Poor => write!(
                f,
                "Poor convergence (loss {:.4}): lr={lr:.4} may be too high",
                self.final_loss
            ),
            Verdict::Slow => match self.config {
                OptimizerConfig::Momentum { alpha, .. } => write!(
                    f,
                    "Slow convergence: lr={lr:.4} may be too low, or raise momentum ({alpha:.2})"
                ),
                _ => write!(f, "Slow convergence: try increasing lr from {lr:.4}"),
            },
            Verdict::Moderate => write!(f, "Moderate performance, final loss {:.4}", self.final_loss),
        }
    }
}
