//! A single two-input perceptron

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::activation::ActivationKind;
use crate::error::{Result, SimError};

/// Inputs, weights and activation of one neuron
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuronConfig {
    pub x1: f64,
    pub x2: f64,
    pub w1: f64,
    pub w2: f64,
    pub bias: f64,
    pub activation: ActivationKind,
}

impl Default for NeuronConfig {
    fn default() -> Self {
        NeuronConfig {
            x1: 0.5,
            x2: 0.5,
            w1: 0.5,
            w2: 0.5,
            bias: -0.8,
            activation: ActivationKind::Step,
        }
    }
}

/// How strongly a neuron fired
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActivationBand {
    Active,
    Partial,
    Inactive,
}

/// Result of evaluating a neuron
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NeuronOutput {
    /// Weighted sum w1·x1 + w2·x2 + bias
    pub z: f64,
    pub output: f64,
    pub band: ActivationBand,
    pub activation: ActivationKind,
}

impl NeuronConfig {
    pub fn weighted_sum(&self) -> f64 {
        self.w1 * self.x1 + self.w2 * self.x2 + self.bias
    }

    pub fn evaluate(&self) -> NeuronOutput {
        let z = self.weighted_sum();
        let output = self.activation.apply(z);
        NeuronOutput {
            z,
            output,
            band: classify(self.activation, output),
            activation: self.activation,
        }
    }

    /// Line separating the two output classes in the (x1, x2) plane
    pub fn decision_boundary(&self) -> Result<DecisionBoundary> {
        decision_boundary(self.w1, self.w2, self.bias)
    }
}

/// Evaluate a neuron from loose parameters
pub fn evaluate(x1: f64, x2: f64, w1: f64, w2: f64, bias: f64, activation: ActivationKind) -> NeuronOutput {
    NeuronConfig { x1, x2, w1, w2, bias, activation }.evaluate()
}

/// Place an activation's output into a band, using thresholds suited to
/// that activation's output range.
pub fn classify(activation: ActivationKind, output: f64) -> ActivationBand {
    // (active above, partial above)
    let (high, low) = match activation {
        ActivationKind::Step | ActivationKind::Sign => {
            return if output == 1.0 {
                ActivationBand::Active
            } else {
                ActivationBand::Inactive
            };
        }
        ActivationKind::Sigmoid => (0.7, 0.3),
        ActivationKind::Tanh => (0.5, -0.5),
        ActivationKind::Relu | ActivationKind::LeakyRelu => (0.5, 0.0),
        ActivationKind::Swish => (0.3, -0.3),
        ActivationKind::SoftmaxSurrogate => (2.0, 0.5),
    };
    if output > high {
        ActivationBand::Active
    } else if output > low {
        ActivationBand::Partial
    } else {
        ActivationBand::Inactive
    }
}

impl fmt::Display for NeuronOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ActivationBand::*;
        use ActivationKind::*;

        let label = match (self.activation, self.band) {
            (Step | Sign, Active) => "Neuron activated",
            (Step | Sign, _) => "Neuron not activated",
            (Sigmoid, Active) => "Strong activation",
            (Sigmoid, Partial) => "Partial activation",
            (Sigmoid, Inactive) => "Low activation",
            (Tanh | Swish, Active) => "Positive output",
            (Tanh | Swish, Partial) => "Near zero",
            (Tanh | Swish, Inactive) => "Negative output",
            (Relu | LeakyRelu, Active) => "Active",
            (Relu | LeakyRelu, Partial) => "Weakly active",
            (Relu | LeakyRelu, Inactive) => "Inactive",
            (SoftmaxSurrogate, Active) => "High probability",
            (SoftmaxSurrogate, Partial) => "Moderate",
            (SoftmaxSurrogate, Inactive) => "Low probability",
        };
        match self.activation {
            Step | Sign => write!(f, "{label} ({})", self.output),
            Sigmoid => write!(f, "{label} ({:.1}%)", self.output * 100.0),
            _ => write!(f, "{label} ({:.3})", self.output),
        }
    }
}

/// The line x2 = slope·x1 + intercept where the weighted sum is zero
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecisionBoundary {
    pub slope: f64,
    pub intercept: f64,
}

impl DecisionBoundary {
    pub fn x2_at(&self, x1: f64) -> f64 {
        self.slope * x1 + self.intercept
    }
}

/// Solve w1·x1 + w2·x2 + bias = 0 for x2.
///
/// A zero `w2` gives a vertical (or no) line, which has no slope form.
pub fn decision_boundary(w1: f64, w2: f64, bias: f64) -> Result<DecisionBoundary> {
    if w2 == 0.0 {
        return Err(SimError::NumericDegenerate(
            "decision boundary is undefined for w2 = 0".into(),
        ));
    }
    Ok(DecisionBoundary {
        slope: -w1 / w2,
        intercept: -bias / w2,
    })
}
