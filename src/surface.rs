//! Benchmark loss surfaces with closed-form gradients

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::position::Position;

/// x² + y²
pub fn sphere(x: f64, y: f64) -> f64 {
    x * x + y * y
}

pub fn sphere_gradient(x: f64, y: f64) -> Position {
    Position::new(2.0 * x, 2.0 * y)
}

/// (1 − x)² + 100 (y − x²)²
pub fn rosenbrock(x: f64, y: f64) -> f64 {
    (1.0 - x).powi(2) + 100.0 * (y - x * x).powi(2)
}

pub fn rosenbrock_gradient(x: f64, y: f64) -> Position {
    let gx = -2.0 * (1.0 - x) - 400.0 * x * (y - x * x);
    let gy = 200.0 * (y - x * x);
    Position::new(gx, gy)
}

/// Residuals of the three Beale terms
fn beale_terms(x: f64, y: f64) -> [f64; 3] {
    [
        1.5 - x + x * y,
        2.25 - x + x * y * y,
        2.625 - x + x * y * y * y,
    ]
}

/// (1.5 − x + xy)² + (2.25 − x + xy²)² + (2.625 − x + xy³)²
pub fn beale(x: f64, y: f64) -> f64 {
    beale_terms(x, y).iter().map(|t| t * t).sum()
}

pub fn beale_gradient(x: f64, y: f64) -> Position {
    let [t1, t2, t3] = beale_terms(x, y);
    let gx = 2.0 * t1 * (y - 1.0) + 2.0 * t2 * (y * y - 1.0) + 2.0 * t3 * (y * y * y - 1.0);
    let gy = 2.0 * t1 * x + 2.0 * t2 * 2.0 * x * y + 2.0 * t3 * 3.0 * x * y * y;
    Position::new(gx, gy)
}

/// Names of the registered surfaces
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    #[default]
    Sphere,
    Rosenbrock,
    Beale,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 3] = [SurfaceKind::Sphere, SurfaceKind::Rosenbrock, SurfaceKind::Beale];

    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Sphere => "sphere",
            SurfaceKind::Rosenbrock => "rosenbrock",
            SurfaceKind::Beale => "beale",
        }
    }

    /// Look up the descriptor for this surface.
    ///
    /// Beale runs start at (1, 1). Starting at its optimum (3, 0.5), as the
    /// lesson's first version did, leaves every optimizer at a zero gradient.
    pub fn surface(self) -> Surface {
        match self {
            SurfaceKind::Sphere => Surface {
                kind: self,
                value: sphere,
                gradient: sphere_gradient,
                start: Position::new(2.0, 2.0),
                optimum: Position::new(0.0, 0.0),
                range: 3.0,
            },
            SurfaceKind::Rosenbrock => Surface {
                kind: self,
                value: rosenbrock,
                gradient: rosenbrock_gradient,
                start: Position::new(-1.0, -1.0),
                optimum: Position::new(1.0, 1.0),
                range: 2.0,
            },
            SurfaceKind::Beale => Surface {
                kind: self,
                value: beale,
                gradient: beale_gradient,
                start: Position::new(1.0, 1.0),
                optimum: Position::new(3.0, 0.5),
                range: 4.0,
            },
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurfaceKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SurfaceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SimError::InvalidInput(format!("unknown surface '{s}'")))
    }
}

/// Immutable descriptor of a benchmark surface
#[derive(Copy, Clone, Debug)]
pub struct Surface {
    pub kind: SurfaceKind,
    value: fn(f64, f64) -> f64,
    gradient: fn(f64, f64) -> Position,
    /// Where optimization runs begin
    pub start: Position,
    /// Known global minimum
    pub optimum: Position,
    /// Half-width of the square a renderer should show around the origin
    pub range: f64,
}

impl Surface {
    pub fn value(&self, x: f64, y: f64) -> f64 {
        (self.value)(x, y)
    }

    pub fn gradient(&self, x: f64, y: f64) -> Position {
        (self.gradient)(x, y)
    }

    pub fn value_at(&self, p: Position) -> f64 {
        self.value(p.x, p.y)
    }

    pub fn gradient_at(&self, p: Position) -> Position {
        self.gradient(p.x, p.y)
    }

    /// Sample the surface on an `n × n` grid spanning `[-range, range]²`,
    /// rows ordered by increasing y.
    pub fn grid(&self, n: usize) -> Vec<Vec<f64>> {
        let n = n.max(2);
        let step = 2.0 * self.range / (n - 1) as f64;
        (0..n)
            .map(|row| {
                let y = -self.range + step * row as f64;
                (0..n)
                    .map(|col| self.value(-self.range + step * col as f64, y))
                    .collect()
            })
            .collect()
    }
}

impl Default for Surface {
    fn default() -> Self {
        SurfaceKind::default().surface()
    }
}
