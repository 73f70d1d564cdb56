use crate::position::Position;
use super::Stepper;

pub(crate) const DEFAULT_LR: f64 = 0.1;
pub const EPSILON: f64 = 1e-7;

/// Per-coordinate step sizes shrinking with the running sum of squared gradients
#[derive(Clone, Debug)]
pub struct AdaGrad {
    learning_rate: f64,
    cache: Position,
}

impl AdaGrad {
    pub fn new(learning_rate: f64) -> Self {
        AdaGrad {
            learning_rate,
            cache: Position::ZERO,
        }
    }

    /// Accumulated squared gradients; never decreases
    pub fn cache(&self) -> Position {
        self.cache
    }
}

impl Default for AdaGrad {
    fn default() -> Self {
        Self::new(DEFAULT_LR)
    }
}

impl Stepper for AdaGrad {
    fn step(&mut self, position: Position, gradient: Position) -> Position {
        self.cache = self.cache + gradient.squared();
        let lr = self.learning_rate;
        let scaled = self.cache.zip_with(gradient, |c, g| lr / (c.sqrt() + EPSILON) * g);
        position - scaled
    }
}
