use crate::position::Position;
use super::Stepper;

pub(crate) const DEFAULT_LR: f64 = 0.01;
pub(crate) const DEFAULT_BETA: f64 = 0.9;
pub const EPSILON: f64 = 1e-7;

/// Like AdaGrad, but the squared-gradient cache decays exponentially
#[derive(Clone, Debug)]
pub struct RMSProp {
    learning_rate: f64,
    beta: f64,
    cache: Position,
}

impl RMSProp {
    pub fn new(learning_rate: f64, beta: f64) -> Self {
        RMSProp {
            learning_rate,
            beta,
            cache: Position::ZERO,
        }
    }

    pub fn cache(&self) -> Position {
        self.cache
    }
}

impl Default for RMSProp {
    fn default() -> Self {
        Self::new(DEFAULT_LR, DEFAULT_BETA)
    }
}

impl Stepper for RMSProp {
    fn step(&mut self, position: Position, gradient: Position) -> Position {
        let beta = self.beta;
        self.cache = self
            .cache
            .zip_with(gradient, |c, g| beta * c + (1.0 - beta) * g * g);
        let lr = self.learning_rate;
        position - self.cache.zip_with(gradient, |c, g| lr / (c.sqrt() + EPSILON) * g)
    }
}
