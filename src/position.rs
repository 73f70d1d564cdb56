use serde::{Deserialize, Serialize};

/// A point (or a gradient) on a 2D surface
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The origin
    pub const ZERO: Self = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Apply `f` to both coordinates
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Position::new(f(self.x), f(self.y))
    }

    /// Combine two positions coordinate by coordinate
    pub fn zip_with(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Position::new(f(self.x, other.x), f(self.y, other.y))
    }

    /// Elementwise square
    pub fn squared(self) -> Self {
        self.map(|v| v * v)
    }

    /// Euclidean distance to `other`
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position::new(x, y)
    }
}

impl From<Position> for (f64, f64) {
    fn from(p: Position) -> Self {
        (p.x, p.y)
    }
}

impl std::ops::Add for Position {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
}

impl std::ops::Mul for Position {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }
}

impl std::ops::Mul<f64> for Position {
    type Output = Self;
    fn mul(self, scale: f64) -> Self {
        self.map(|v| v * scale)
    }
}

impl std::ops::Neg for Position {
    type Output = Self;
    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}
