use crate::position::Position;
use super::Stepper;

pub(crate) const DEFAULT_LR: f64 = 0.01;
pub(crate) const DEFAULT_ALPHA: f64 = 0.9;

/// Gradient descent with a decaying velocity term
#[derive(Clone, Debug)]
pub struct Momentum {
    learning_rate: f64,
    alpha: f64,
    velocity: Position,
}

impl Momentum {
    pub fn new(learning_rate: f64, alpha: f64) -> Self {
        Momentum {
            learning_rate,
            alpha,
            velocity: Position::ZERO,
        }
    }

    pub fn velocity(&self) -> Position {
        self.velocity
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(DEFAULT_LR, DEFAULT_ALPHA)
    }
}

impl Stepper for Momentum {
    fn step(&mut self, position: Position, gradient: Position) -> Position {
        self.velocity = self.velocity * self.alpha - gradient * self.learning_rate;
        position + self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_accumulates() {
        let mut momentum = Momentum::new(0.1, 0.9);
        let g = Position::new(1.0, -2.0);

        let p1 = momentum.step(Position::ZERO, g);
        assert!((p1.x + 0.1).abs() < 1e-12);
        assert!((p1.y - 0.2).abs() < 1e-12);

        // v = 0.9 * (-0.1, 0.2) - 0.1 * (1, -2) = (-0.19, 0.38)
        let p2 = momentum.step(p1, g);
        assert!((momentum.velocity().x + 0.19).abs() < 1e-12);
        assert!((momentum.velocity().y - 0.38).abs() < 1e-12);
        assert!((p2.x + 0.29).abs() < 1e-12);
    }

    #[test]
    fn test_starts_at_rest() {
        assert_eq!(Momentum::default().velocity(), Position::ZERO);
    }
}
