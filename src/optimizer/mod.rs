//! Stateful update rules that move a 2D position against a gradient

mod sgd;
mod momentum;
mod adagrad;
mod rmsprop;
mod adam;

pub use sgd::SGD;
pub use momentum::Momentum;
pub use adagrad::AdaGrad;
pub use rmsprop::RMSProp;
pub use adam::Adam;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::position::Position;

/// Common trait for optimizers
pub trait Stepper {
    /// Produce the next position from the current one and the gradient there.
    ///
    /// Only the optimizer's own accumulators change; the caller's position
    /// is taken by value and never touched.
    fn step(&mut self, position: Position, gradient: Position) -> Position;
}

/// The available update rules
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    Sgd,
    Momentum,
    AdaGrad,
    RmsProp,
    Adam,
}

impl OptimizerKind {
    pub const ALL: [OptimizerKind; 5] = [
        OptimizerKind::Sgd,
        OptimizerKind::Momentum,
        OptimizerKind::AdaGrad,
        OptimizerKind::RmsProp,
        OptimizerKind::Adam,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OptimizerKind::Sgd => "sgd",
            OptimizerKind::Momentum => "momentum",
            OptimizerKind::AdaGrad => "adagrad",
            OptimizerKind::RmsProp => "rmsprop",
            OptimizerKind::Adam => "adam",
        }
    }

    /// Hyperparameters used when a comparison run builds this optimizer
    pub fn default_config(self) -> OptimizerConfig {
        match self {
            OptimizerKind::Sgd => OptimizerConfig::Sgd { lr: sgd::DEFAULT_LR },
            OptimizerKind::Momentum => OptimizerConfig::Momentum {
                lr: momentum::DEFAULT_LR,
                alpha: momentum::DEFAULT_ALPHA,
            },
            OptimizerKind::AdaGrad => OptimizerConfig::AdaGrad { lr: adagrad::DEFAULT_LR },
            OptimizerKind::RmsProp => OptimizerConfig::RmsProp {
                lr: rmsprop::DEFAULT_LR,
                beta: rmsprop::DEFAULT_BETA,
            },
            OptimizerKind::Adam => OptimizerConfig::Adam {
                lr: adam::DEFAULT_LR,
                beta1: adam::DEFAULT_BETA1,
                beta2: adam::DEFAULT_BETA2,
            },
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptimizerKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptimizerKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SimError::InvalidInput(format!("unknown optimizer '{s}'")))
    }
}

/// Construction parameters for an optimizer, fixed for the life of a run
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OptimizerConfig {
    Sgd { lr: f64 },
    Momentum { lr: f64, alpha: f64 },
    AdaGrad { lr: f64 },
    RmsProp { lr: f64, beta: f64 },
    Adam { lr: f64, beta1: f64, beta2: f64 },
}

impl OptimizerConfig {
    pub fn kind(&self) -> OptimizerKind {
        match self {
            OptimizerConfig::Sgd { .. } => OptimizerKind::Sgd,
            OptimizerConfig::Momentum { .. } => OptimizerKind::Momentum,
            OptimizerConfig::AdaGrad { .. } => OptimizerKind::AdaGrad,
            OptimizerConfig::RmsProp { .. } => OptimizerKind::RmsProp,
            OptimizerConfig::Adam { .. } => OptimizerKind::Adam,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        match *self {
            OptimizerConfig::Sgd { lr }
            | OptimizerConfig::Momentum { lr, .. }
            | OptimizerConfig::AdaGrad { lr }
            | OptimizerConfig::RmsProp { lr, .. }
            | OptimizerConfig::Adam { lr, .. } => lr,
        }
    }

    /// Build a fresh optimizer with zeroed accumulators
    pub fn build(&self) -> Optimizer {
        Optimizer::new(*self)
    }
}

/// One optimizer of any kind, owning its own accumulators
#[derive(Clone, Debug)]
pub enum Optimizer {
    Sgd(SGD),
    Momentum(Momentum),
    AdaGrad(AdaGrad),
    RmsProp(RMSProp),
    Adam(Adam),
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        match config {
            OptimizerConfig::Sgd { lr } => Optimizer::Sgd(SGD::new(lr)),
            OptimizerConfig::Momentum { lr, alpha } => Optimizer::Momentum(Momentum::new(lr, alpha)),
            OptimizerConfig::AdaGrad { lr } => Optimizer::AdaGrad(AdaGrad::new(lr)),
            OptimizerConfig::RmsProp { lr, beta } => Optimizer::RmsProp(RMSProp::new(lr, beta)),
            OptimizerConfig::Adam { lr, beta1, beta2 } => {
                Optimizer::Adam(Adam::new(lr, beta1, beta2, adam::EPSILON))
            }
        }
    }

    /// Build the kind with its default hyperparameters
    pub fn with_defaults(kind: OptimizerKind) -> Self {
        Self::new(kind.default_config())
    }

    pub fn kind(&self) -> OptimizerKind {
        match self {
            Optimizer::Sgd(_) => OptimizerKind::Sgd,
            Optimizer::Momentum(_) => OptimizerKind::Momentum,
            Optimizer::AdaGrad(_) => OptimizerKind::AdaGrad,
            Optimizer::RmsProp(_) => OptimizerKind::RmsProp,
            Optimizer::Adam(_) => OptimizerKind::Adam,
        }
    }
}

impl Stepper for Optimizer {
    fn step(&mut self, position: Position, gradient: Position) -> Position {
        match self {
            Optimizer::Sgd(o) => o.step(position, gradient),
            Optimizer::Momentum(o) => o.step(position, gradient),
            Optimizer::AdaGrad(o) => o.step(position, gradient),
            Optimizer::RmsProp(o) => o.step(position, gradient),
            Optimizer::Adam(o) => o.step(position, gradient),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        assert_eq!(OptimizerKind::Sgd.default_config(), OptimizerConfig::Sgd { lr: 0.01 });
        assert_eq!(
            OptimizerKind::Momentum.default_config(),
            OptimizerConfig::Momentum { lr: 0.01, alpha: 0.9 }
        );
        assert_eq!(OptimizerKind::AdaGrad.default_config(), OptimizerConfig::AdaGrad { lr: 0.1 });
        assert_eq!(
            OptimizerKind::RmsProp.default_config(),
            OptimizerConfig::RmsProp { lr: 0.01, beta: 0.9 }
        );
        assert_eq!(
            OptimizerKind::Adam.default_config(),
            OptimizerConfig::Adam { lr: 0.001, beta1: 0.9, beta2: 0.999 }
        );
    }

    #[test]
    fn test_kind_round_trips_through_build() {
        for kind in OptimizerKind::ALL {
            assert_eq!(Optimizer::with_defaults(kind).kind(), kind);
            assert_eq!(kind.default_config().kind(), kind);
            assert_eq!(kind.name().parse::<OptimizerKind>().unwrap(), kind);
        }
        assert!("lbfgs".parse::<OptimizerKind>().is_err());
    }

    #[test]
    fn test_config_json_shape() {
        let config: OptimizerConfig =
            serde_json::from_str(r#"{"kind": "momentum", "lr": 0.05, "alpha": 0.8}"#).unwrap();
        assert_eq!(config, OptimizerConfig::Momentum { lr: 0.05, alpha: 0.8 });
        assert_eq!(config.learning_rate(), 0.05);
    }

    #[test]
    fn test_dispatch_matches_concrete_optimizer() {
        let start = Position::new(2.0, 2.0);
        let grad = Position::new(4.0, 4.0);

        let mut dynamic = Optimizer::with_defaults(OptimizerKind::RmsProp);
        let mut concrete = RMSProp::new(0.01, 0.9);
        for _ in 0..3 {
            assert_eq!(dynamic.step(start, grad), concrete.step(start, grad));
        }
    }

    #[test]
    fn test_fresh_optimizers_do_not_share_state() {
        let mut first = Optimizer::with_defaults(OptimizerKind::Momentum);
        let p = Position::new(1.0, -1.0);
        let g = Position::new(0.5, 0.5);
        first.step(p, g);
        first.step(p, g);

        let mut second = Optimizer::with_defaults(OptimizerKind::Momentum);
        let mut reference = Momentum::new(0.01, 0.9);
        assert_eq!(second.step(p, g), reference.step(p, g));
    }
}
