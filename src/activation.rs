//! Scalar activation functions and their derivatives

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Slope of leaky ReLU for negative inputs
pub const LEAKY_SLOPE: f64 = 0.01;

/// Heaviside step: 1 for z ≥ 0, else 0
pub fn step(z: f64) -> f64 {
    if z >= 0.0 { 1.0 } else { 0.0 }
}

/// 1 for z ≥ 0, else -1
pub fn sign(z: f64) -> f64 {
    if z >= 0.0 { 1.0 } else { -1.0 }
}

/// Logistic sigmoid, 1 / (1 + e^(-z))
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

pub fn tanh(z: f64) -> f64 {
    z.tanh()
}

pub fn relu(z: f64) -> f64 {
    z.max(0.0)
}

pub fn leaky_relu(z: f64) -> f64 {
    if z > 0.0 { z } else { LEAKY_SLOPE * z }
}

/// z · sigmoid(z)
pub fn swish(z: f64) -> f64 {
    z * sigmoid(z)
}

/// Single-logit stand-in for softmax: e^z, with no normalisation across logits.
pub fn softmax_surrogate(z: f64) -> f64 {
    z.exp()
}

pub fn sigmoid_derivative(z: f64) -> f64 {
    let s = sigmoid(z);
    s * (1.0 - s)
}

pub fn relu_derivative(z: f64) -> f64 {
    if z > 0.0 { 1.0 } else { 0.0 }
}

pub fn tanh_derivative(z: f64) -> f64 {
    let t = z.tanh();
    1.0 - t * t
}

/// The activation functions a neuron can use
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    #[default]
    Step,
    Sign,
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu,
    Swish,
    #[serde(rename = "softmax")]
    SoftmaxSurrogate,
}

impl ActivationKind {
    pub const ALL: [ActivationKind; 8] = [
        ActivationKind::Step,
        ActivationKind::Sign,
        ActivationKind::Sigmoid,
        ActivationKind::Tanh,
        ActivationKind::Relu,
        ActivationKind::LeakyRelu,
        ActivationKind::Swish,
        ActivationKind::SoftmaxSurrogate,
    ];

    /// Evaluate the activation at `z`
    pub fn apply(self, z: f64) -> f64 {
        match self {
            ActivationKind::Step => step(z),
            ActivationKind::Sign => sign(z),
            ActivationKind::Sigmoid => sigmoid(z),
            ActivationKind::Tanh => tanh(z),
            ActivationKind::Relu => relu(z),
            ActivationKind::LeakyRelu => leaky_relu(z),
            ActivationKind::Swish => swish(z),
            ActivationKind::SoftmaxSurrogate => softmax_surrogate(z),
        }
    }

    /// Derivative of the activation at `z`.
    ///
    /// Step and sign are treated as flat everywhere (their jump at zero has
    /// no finite derivative).
    pub fn derivative(self, z: f64) -> f64 {
        match self {
            ActivationKind::Step | ActivationKind::Sign => 0.0,
            ActivationKind::Sigmoid => sigmoid_derivative(z),
            ActivationKind::Tanh => tanh_derivative(z),
            ActivationKind::Relu => relu_derivative(z),
            ActivationKind::LeakyRelu => {
                if z > 0.0 { 1.0 } else { LEAKY_SLOPE }
            }
            ActivationKind::Swish => {
                let s = sigmoid(z);
                s + z * s * (1.0 - s)
            }
            ActivationKind::SoftmaxSurrogate => z.exp(),
        }
    }

    /// Representative per-layer derivative used by the gradient-flow
    /// simulation: the peak of sigmoid', relu' on its active side, and a
    /// typical tanh' value. Other kinds have none.
    pub fn flow_derivative(self) -> Option<f64> {
        match self {
            ActivationKind::Sigmoid => Some(0.25),
            ActivationKind::Relu => Some(1.0),
            ActivationKind::Tanh => Some(0.4),
            _ => None,
        }
    }

    /// Name as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            ActivationKind::Step => "step",
            ActivationKind::Sign => "sign",
            ActivationKind::Sigmoid => "sigmoid",
            ActivationKind::Tanh => "tanh",
            ActivationKind::Relu => "relu",
            ActivationKind::LeakyRelu => "leaky_relu",
            ActivationKind::Swish => "swish",
            ActivationKind::SoftmaxSurrogate => "softmax",
        }
    }

    /// Sample the activation over `[min, max]` for plotting
    pub fn sample(self, min: f64, max: f64, samples: usize) -> Vec<(f64, f64)> {
        if samples < 2 {
            return vec![(min, self.apply(min))];
        }
        let step = (max - min) / (samples - 1) as f64;
        (0..samples)
            .map(|i| {
                let z = min + step * i as f64;
                (z, self.apply(z))
            })
            .collect()
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivationKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SimError::InvalidInput(format!("unknown activation '{s}'")))
    }
}
