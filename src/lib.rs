//! # Neuro Sim
//!
//! Numeric engine behind a set of interactive neural-network lessons.
//!
//! It covers scalar activations, losses and 2-D benchmark surfaces, five
//! optimizers stepped over those surfaces, a single perceptron and the logic
//! gates it can (and cannot) learn, a stage-by-stage backpropagation walk,
//! gradient flow through deep chains and a handful of regularization demos.
//! Everything is synchronous and deterministic given a seed; rendering is
//! left to the caller.

pub mod error;
mod position;
pub mod activation;
pub mod loss;
pub mod surface;
pub mod optimizer;
pub mod trajectory;
pub mod neuron;
pub mod gates;
pub mod backprop;
pub mod gradient_flow;
pub mod regularization;
pub mod zones;
pub mod config;
pub mod visualization;

// Re-export main types
pub use activation::ActivationKind;
pub use backprop::{BackpropStepper, BackpropValues, Stage};
pub use config::SessionConfig;
pub use error::{Result, SimError};
pub use gates::LogicGate;
pub use gradient_flow::{GradientChain, gradient_chain};
pub use loss::Loss;
pub use neuron::{NeuronConfig, NeuronOutput};
pub use optimizer::{Optimizer, OptimizerConfig, OptimizerKind, Stepper};
pub use position::Position;
pub use surface::{Surface, SurfaceKind};
pub use trajectory::{Run, RunOptions, Trajectory, TrajectoryRunner};
pub use zones::{Parameter, ParameterZone};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_descent_single_step() {
        let surface = SurfaceKind::Sphere.surface();
        let mut sgd = Optimizer::new(OptimizerConfig::Sgd { lr: 0.1 });
        let p = surface.start;
        let next = sgd.step(p, surface.gradient_at(p));
        assert!((next.x - 1.6).abs() < 1e-12);
        assert!((next.y - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_mse_example() {
        let mse = loss::mean_squared_error(&[0.9, 0.2, 0.8], &[1.0, 0.0, 1.0]).unwrap();
        assert!((mse - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_default_session_runs_end_to_end() {
        let config = SessionConfig::default();
        assert_eq!(config.neuron.evaluate().output, 0.0);

        let mut run = trajectory::compare(
            config.comparison.surface,
            &config.comparison.selected,
            config.comparison.iterations,
        )
        .unwrap();
        run.run_to_end();
        assert_eq!(run.lanes().len(), 3);

        let chain = gradient_chain(
            config.gradient_flow.depth,
            config.gradient_flow.weight_scale,
            config.gradient_flow.activation,
        )
        .unwrap();
        assert_eq!(chain.values().len(), 6);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
