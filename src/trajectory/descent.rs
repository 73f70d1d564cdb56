use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::optimizer::OptimizerConfig;
use crate::position::Position;
use crate::surface::SurfaceKind;
use super::{GradientNoise, Run, RunOptions};

/// Where the gradient-descent demo begins on the sphere
pub const DESCENT_START: Position = Position::new(-2.0, 2.0);

/// Flavours of gradient descent, told apart by how noisy each step is
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescentMode {
    /// Full-batch: exact gradient
    #[serde(rename = "bgd")]
    Batch,
    #[serde(rename = "sgd")]
    Stochastic,
    #[default]
    #[serde(rename = "mbgd")]
    MiniBatch,
}

impl DescentMode {
    pub fn max_iterations(self) -> usize {
        match self {
            DescentMode::Batch => 50,
            DescentMode::Stochastic => 100,
            DescentMode::MiniBatch => 75,
        }
    }

    pub fn noise(self) -> GradientNoise {
        match self {
            DescentMode::Batch => GradientNoise::None,
            DescentMode::Stochastic => GradientNoise::STOCHASTIC,
            DescentMode::MiniBatch => GradientNoise::MINI_BATCH,
        }
    }
}

/// Plain gradient descent on the sphere from [`DESCENT_START`]
pub fn descent_run(mode: DescentMode, learning_rate: f64, seed: Option<u64>) -> Result<Run> {
    let options = RunOptions {
        max_iterations: mode.max_iterations(),
        noise: mode.noise(),
        seed,
        convergence_threshold: None,
        start: Some(DESCENT_START),
    };
    Run::new(
        SurfaceKind::Sphere.surface(),
        &[OptimizerConfig::Sgd { lr: learning_rate }],
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_mode_is_exact() {
        let mut run = descent_run(DescentMode::Batch, 0.1, None).unwrap();
        run.run_to_end();

        let path = run.lanes()[0].trajectory();
        assert_eq!(path.len(), 51);
        assert_eq!(path.start(), DESCENT_START);
        let expected = 2.0 * 0.8f64.powi(50);
        assert!((path.last().x + expected).abs() < 1e-12);
        assert!((path.last().y - expected).abs() < 1e-12);
    }

    #[test]
    fn test_mode_budgets() {
        for (mode, budget) in [
            (DescentMode::Batch, 50),
            (DescentMode::Stochastic, 100),
            (DescentMode::MiniBatch, 75),
        ] {
            let mut run = descent_run(mode, 0.05, Some(11)).unwrap();
            run.run_to_end();
            assert_eq!(run.iteration(), budget);
            assert!(run.final_losses()[0] < 8.0);
        }
    }

    #[test]
    fn test_mode_names() {
        let mode: DescentMode = serde_json::from_str("\"sgd\"").unwrap();
        assert_eq!(mode, DescentMode::Stochastic);
        assert_eq!(DescentMode::default(), DescentMode::MiniBatch);
    }
}
