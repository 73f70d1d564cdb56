use crate::position::Position;
use super::Stepper;

pub(crate) const DEFAULT_LR: f64 = 0.01;

/// Plain gradient step, no state
#[derive(Clone, Debug)]
pub struct SGD {
    learning_rate: f64,
}

impl SGD {
    /// Create a new SGD optimizer with the specified learning rate
    pub fn new(learning_rate: f64) -> Self {
        SGD { learning_rate }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new(DEFAULT_LR)
    }
}

impl Stepper for SGD {
    fn step(&mut self, position: Position, gradient: Position) -> Position {
        position - gradient * self.learning_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::sphere_gradient;

    #[test]
    fn test_sgd_step() {
        let mut sgd = SGD::new(0.1);
        let start = Position::new(2.0, 2.0);

        let next = sgd.step(start, sphere_gradient(start.x, start.y));

        // gradient (4, 4), so 2 - 0.1 * 4 = 1.6
        assert!((next.x - 1.6).abs() < 1e-12);
        assert!((next.y - 1.6).abs() < 1e-12);
        // caller's position is untouched
        assert_eq!(start, Position::new(2.0, 2.0));
    }

    #[test]
    fn test_sgd_is_stateless() {
        let mut sgd = SGD::default();
        let p = Position::new(1.0, 1.0);
        let g = Position::new(3.0, -2.0);
        assert_eq!(sgd.step(p, g), sgd.step(p, g));
    }
}
