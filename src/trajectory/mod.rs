//! Optimization runs over benchmark surfaces
//!
//! A [`Run`] owns one or more optimizers, each with its own [`Trajectory`],
//! and advances them in lockstep one tick at a time. Nothing here sleeps or
//! reads the clock: a caller drives the run from a timer, a tight loop or a
//! test, and renders whatever it likes between ticks.

mod run;
mod runner;
mod comparison;
mod tuning;
mod descent;

pub use run::{GradientNoise, Lane, Run, RunOptions, RunStatus, TickReport};
pub use runner::TrajectoryRunner;
pub use comparison::{compare, LaneSummary, COMPARISON_ITERATIONS};
pub use tuning::{tune, TuningOutcome, Verdict, TUNING_ITERATIONS, TUNING_THRESHOLD};
pub use descent::{descent_run, DescentMode, DESCENT_START};

use crate::position::Position;

/// Positions visited by one optimizer, oldest first
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    positions: Vec<Position>,
}

impl Trajectory {
    /// A trajectory holding only its start point
    pub fn new(start: Position) -> Self {
        Trajectory { positions: vec![start] }
    }

    pub(crate) fn push(&mut self, position: Position) {
        self.positions.push(position);
    }

    /// The most recent position
    pub fn last(&self) -> Position {
        // never empty: constructed with a start point and only grows
        self.positions[self.positions.len() - 1]
    }

    pub fn start(&self) -> Position {
        self.positions[0]
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Number of steps taken
    pub fn steps(&self) -> usize {
        self.positions.len() - 1
    }
}
