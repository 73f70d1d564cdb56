use crate::position::Position;
use super::Stepper;

pub(crate) const DEFAULT_LR: f64 = 0.001;
pub(crate) const DEFAULT_BETA1: f64 = 0.9;
pub(crate) const DEFAULT_BETA2: f64 = 0.999;
pub const EPSILON: f64 = 1e-8;

/// Adam optimizer
#[derive(Clone, Debug)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    m: Position, // First moment
    v: Position, // Second moment
    t: u32,      // Timestep counter
}

impl Adam {
    /// Create a new Adam optimizer with the specified parameters
    pub fn new(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Self {
        Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            m: Position::ZERO,
            v: Position::ZERO,
            t: 0,
        }
    }

    /// Number of steps taken so far
    pub fn timestep(&self) -> u32 {
        self.t
    }

    pub fn moments(&self) -> (Position, Position) {
        (self.m, self.v)
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(DEFAULT_LR, DEFAULT_BETA1, DEFAULT_BETA2, EPSILON)
    }
}

impl Stepper for Adam {
    fn step(&mut self, position: Position, gradient: Position) -> Position {
        let Self { beta1: b1, beta2: b2, learning_rate: lr, epsilon: eps, .. } = *self;

        // Increment timestep before bias correction
        self.t += 1;

        // Update biased first and second raw moment estimates
        self.m = self.m.zip_with(gradient, |m, g| b1 * m + (1.0 - b1) * g);
        self.v = self.v.zip_with(gradient, |v, g| b2 * v + (1.0 - b2) * g * g);

        // Bias-corrected estimates
        let m_hat = self.m * (1.0 / (1.0 - b1.powi(self.t as i32)));
        let v_hat = self.v * (1.0 / (1.0 - b2.powi(self.t as i32)));

        position - m_hat.zip_with(v_hat, |m, v| lr * m / (v.sqrt() + eps))
    }
}
