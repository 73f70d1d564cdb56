//! Per-session settings, loadable from JSON

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationKind;
use crate::error::{Result, SimError};
use crate::gradient_flow::MAX_DEPTH;
use crate::neuron::NeuronConfig;
use crate::optimizer::{OptimizerConfig, OptimizerKind};
use crate::surface::SurfaceKind;
use crate::trajectory::{COMPARISON_ITERATIONS, DescentMode};

/// Everything a demo session can be configured with.
///
/// Every field falls back to its default, so a partial JSON file (or `{}`)
/// is a valid configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub neuron: NeuronConfig,
    pub descent: DescentConfig,
    pub comparison: ComparisonConfig,
    pub tuning: TuningConfig,
    pub gradient_flow: GradientFlowConfig,
    pub regularization: RegularizationConfig,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescentConfig {
    pub mode: DescentMode,
    pub learning_rate: f64,
    /// Seed for gradient noise; random when absent
    pub seed: Option<u64>,
}

impl Default for DescentConfig {
    fn default() -> Self {
        DescentConfig {
            mode: DescentMode::MiniBatch,
            learning_rate: 0.1,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub selected: Vec<OptimizerKind>,
    pub surface: SurfaceKind,
    pub iterations: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        ComparisonConfig {
            selected: vec![OptimizerKind::Sgd, OptimizerKind::Momentum, OptimizerKind::Adam],
            surface: SurfaceKind::Beale,
            iterations: COMPARISON_ITERATIONS,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub optimizer: OptimizerKind,
    pub momentum: OptimizerConfig,
    pub adam: OptimizerConfig,
}

impl Default for TuningConfig {
    fn default() -> Self {
        TuningConfig {
            optimizer: OptimizerKind::Adam,
            momentum: OptimizerKind::Momentum.default_config(),
            adam: OptimizerKind::Adam.default_config(),
        }
    }
}

impl TuningConfig {
    /// Hyperparameters of the optimizer being tuned
    pub fn selected(&self) -> OptimizerConfig {
        match self.optimizer {
            OptimizerKind::Momentum => self.momentum,
            OptimizerKind::Adam => self.adam,
            other => other.default_config(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientFlowConfig {
    pub activation: ActivationKind,
    pub depth: usize,
    pub weight_scale: f64,
    pub clip: f64,
}

impl Default for GradientFlowConfig {
    fn default() -> Self {
        GradientFlowConfig {
            activation: ActivationKind::Sigmoid,
            depth: 5,
            weight_scale: 1.0,
            clip: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegularizationConfig {
    pub complexity: f64,
    pub data_size: f64,
    pub l1: f64,
    pub l2: f64,
    pub dropout: f64,
    pub patience: usize,
    pub weights: Vec<f64>,
}

impl Default for RegularizationConfig {
    fn default() -> Self {
        RegularizationConfig {
            complexity: 5.0,
            data_size: 100.0,
            l1: 0.01,
            l2: 0.01,
            dropout: 0.5,
            patience: 10,
            weights: vec![0.8, 0.6, 0.9, 0.7, 0.5, 0.4, 0.3, 0.8, 0.6, 0.9],
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading session config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no demo can run with
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: &str) -> Result<()> {
            if ok { Ok(()) } else { Err(SimError::Config(msg.to_string())) }
        }

        check(self.descent.learning_rate > 0.0, "descent.learning_rate must be positive")?;
        check(!self.comparison.selected.is_empty(), "comparison.selected must not be empty")?;
        check(self.comparison.iterations > 0, "comparison.iterations must be positive")?;
        check(self.tuning.momentum.kind() == OptimizerKind::Momentum, "tuning.momentum must be a momentum optimizer")?;
        check(self.tuning.adam.kind() == OptimizerKind::Adam, "tuning.adam must be an adam optimizer")?;
        check(self.tuning.selected().learning_rate() > 0.0, "tuning learning rate must be positive")?;
        check(
            self.gradient_flow.activation.flow_derivative().is_some(),
            "gradient_flow.activation must be sigmoid, relu or tanh",
        )?;
        check(
            self.gradient_flow.depth <= MAX_DEPTH,
            "gradient_flow.depth must be at most 1000",
        )?;
        check(self.gradient_flow.clip > 0.0, "gradient_flow.clip must be positive")?;
        check(self.regularization.data_size > 0.0, "regularization.data_size must be positive")?;
        check(
            (0.0..=1.0).contains(&self.regularization.dropout),
            "regularization.dropout must be in [0, 1]",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.neuron.bias, -0.8);
        assert_eq!(config.descent.mode, DescentMode::MiniBatch);
        assert_eq!(config.comparison.surface, SurfaceKind::Beale);
        assert_eq!(config.tuning.selected(), OptimizerConfig::Adam { lr: 0.001, beta1: 0.9, beta2: 0.999 });
        assert_eq!(config.gradient_flow.depth, 5);
        assert_eq!(config.regularization.weights.len(), 10);
    }

    #[test]
    fn test_partial_override() {
        let config = SessionConfig::from_json(
            r#"{
                "neuron": { "activation": "leaky_relu", "w1": 2.0 },
                "comparison": { "selected": ["rmsprop", "adagrad"], "surface": "rosenbrock" },
                "tuning": { "optimizer": "momentum", "momentum": { "kind": "momentum", "lr": 0.05, "alpha": 0.8 } },
                "gradient_flow": { "activation": "tanh", "depth": 20 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.neuron.activation, ActivationKind::LeakyRelu);
        assert_eq!(config.neuron.w1, 2.0);
        assert_eq!(config.neuron.x1, 0.5);
        assert_eq!(config.comparison.selected, vec![OptimizerKind::RmsProp, OptimizerKind::AdaGrad]);
        assert_eq!(config.comparison.iterations, 100);
        assert_eq!(config.tuning.selected().learning_rate(), 0.05);
        assert_eq!(config.gradient_flow.depth, 20);
        assert_eq!(config.gradient_flow.weight_scale, 1.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SessionConfig::from_json(r#"{ "gradient_flow": { "activation": "swish" } }"#).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));

        let err = SessionConfig::from_json(r#"{ "comparison": { "selected": [] } }"#).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));

        let err = SessionConfig::from_json(r#"{ "gradient_flow": { "depth": 18446744073709551615 } }"#).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));

        let err = SessionConfig::from_json(r#"{ "descent": { "mode": "turbo" } }"#).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SessionConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SessionConfig::load("/nonexistent/session.json").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
