//! Step-by-step forward and backward pass through a 1-1-1 sigmoid network
//!
//! The network is `x → z1 = w1·x + b1 → a1 = σ(z1) → z2 = w2·a1 + b2 →
//! a2 = σ(z2)` with loss `½(target − a2)²`. [`BackpropStepper`] walks it one
//! [`Stage`] at a time; each forward advance fills in only the value that
//! becomes known at that stage.

use std::fmt;

use crate::activation::sigmoid;

/// Position of the walk through the network
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    #[default]
    Ready,
    Input,
    HiddenLinear,
    HiddenActivation,
    OutputLinear,
    OutputLoss,
    OutputGradient,
    HiddenGradient,
    WeightGradients,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::Ready,
        Stage::Input,
        Stage::HiddenLinear,
        Stage::HiddenActivation,
        Stage::OutputLinear,
        Stage::OutputLoss,
        Stage::OutputGradient,
        Stage::HiddenGradient,
        Stage::WeightGradients,
    ];

    /// Stage number, 0 through 8
    pub fn index(self) -> usize {
        self as usize
    }

    /// The following stage; the last stage maps to itself
    pub fn advance(self) -> Stage {
        Stage::ALL.get(self.index() + 1).copied().unwrap_or(self)
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::WeightGradients
    }

    /// Whether the forward pass (including the loss) is complete
    pub fn forward_done(self) -> bool {
        self >= Stage::OutputLoss
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Ready => "Ready",
            Stage::Input => "Input layer",
            Stage::HiddenLinear => "Hidden layer - linear",
            Stage::HiddenActivation => "Hidden layer - activation",
            Stage::OutputLinear => "Output layer - linear",
            Stage::OutputLoss => "Output & loss",
            Stage::OutputGradient => "Backprop - output gradient",
            Stage::HiddenGradient => "Backprop - hidden layer",
            Stage::WeightGradients => "Backprop - weight gradients",
        }
    }

    /// Symbolic form of what this stage computes
    pub fn formula(self) -> &'static str {
        match self {
            Stage::Ready => "",
            Stage::Input => "x",
            Stage::HiddenLinear => "z1 = w1 * x + b1",
            Stage::HiddenActivation => "a1 = σ(z1)",
            Stage::OutputLinear => "z2 = w2 * a1 + b2",
            Stage::OutputLoss => "a2 = σ(z2); L = ½(target - a2)²",
            Stage::OutputGradient => "∂L/∂a2 = -(target - a2)",
            Stage::HiddenGradient => "∂L/∂a1 = ∂L/∂a2 * ∂a2/∂z2 * ∂z2/∂a1",
            Stage::WeightGradients => {
                "∂L/∂w2 = ∂L/∂a2 * ∂a2/∂z2 * ∂z2/∂w2; ∂L/∂w1 = ∂L/∂a1 * ∂a1/∂z1 * ∂z1/∂w1"
            }
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Every scalar in the network
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BackpropValues {
    pub x: f64,
    pub w1: f64,
    pub b1: f64,
    pub z1: f64,
    pub a1: f64,
    pub w2: f64,
    pub b2: f64,
    pub z2: f64,
    pub a2: f64,
    pub target: f64,
    pub loss: f64,
}

impl BackpropValues {
    /// Fixed inputs with every derived field zeroed
    pub fn new(x: f64, w1: f64, b1: f64, w2: f64, b2: f64, target: f64) -> Self {
        BackpropValues {
            x,
            w1,
            b1,
            z1: 0.0,
            a1: 0.0,
            w2,
            b2,
            z2: 0.0,
            a2: 0.0,
            target,
            loss: 0.0,
        }
    }

    fn cleared(&self) -> Self {
        Self::new(self.x, self.w1, self.b1, self.w2, self.b2, self.target)
    }
}

impl Default for BackpropValues {
    fn default() -> Self {
        Self::new(1.0, 0.5, 0.2, 0.8, -0.3, 1.0)
    }
}

/// Gradients of the loss with respect to each parameter
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParameterGradients {
    pub w1: f64,
    pub b1: f64,
    pub w2: f64,
    pub b2: f64,
}

/// Walks the network one stage per [`advance`](BackpropStepper::advance)
#[derive(Clone, Debug, Default)]
pub struct BackpropStepper {
    stage: Stage,
    values: BackpropValues,
}

impl BackpropStepper {
    pub fn new(values: BackpropValues) -> Self {
        BackpropStepper {
            stage: Stage::Ready,
            values: values.cleared(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn values(&self) -> &BackpropValues {
        &self.values
    }

    /// Move to the next stage, computing what becomes known there.
    ///
    /// At the final stage this does nothing.
    pub fn advance(&mut self) -> Stage {
        let next = self.stage.advance();
        if next == self.stage {
            return next;
        }
        let v = &mut self.values;
        match next {
            Stage::HiddenLinear => v.z1 = v.w1 * v.x + v.b1,
            Stage::HiddenActivation => v.a1 = sigmoid(v.z1),
            Stage::OutputLinear => v.z2 = v.w2 * v.a1 + v.b2,
            Stage::OutputLoss => {
                v.a2 = sigmoid(v.z2);
                v.loss = 0.5 * (v.target - v.a2).powi(2);
            }
            // Input holds a fixed value; the backward stages derive their
            // numbers on demand and store nothing.
            _ => {}
        }
        self.stage = next;
        next
    }

    /// Back to `Ready`, keeping inputs, weights and target
    pub fn reset(&mut self) {
        self.stage = Stage::Ready;
        self.values = self.values.cleared();
    }

    /// ∂L/∂a2, available from the output-gradient stage on
    pub fn output_gradient(&self) -> Option<f64> {
        (self.stage >= Stage::OutputGradient).then(|| -(self.values.target - self.values.a2))
    }

    /// ∂L/∂a1, available from the hidden-gradient stage on
    pub fn hidden_gradient(&self) -> Option<f64> {
        if self.stage < Stage::HiddenGradient {
            return None;
        }
        Some(self.output_delta() * self.values.w2)
    }

    /// Parameter gradients, available at the final stage
    pub fn parameter_gradients(&self) -> Option<ParameterGradients> {
        if !self.stage.is_terminal() {
            return None;
        }
        let v = &self.values;
        let delta2 = self.output_delta();
        let delta1 = delta2 * v.w2 * v.a1 * (1.0 - v.a1);
        Some(ParameterGradients {
            w1: delta1 * v.x,
            b1: delta1,
            w2: delta2 * v.a1,
            b2: delta2,
        })
    }

    /// ∂L/∂z2
    fn output_delta(&self) -> f64 {
        let v = &self.values;
        -(v.target - v.a2) * v.a2 * (1.0 - v.a2)
    }
}
