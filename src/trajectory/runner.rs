use log::{debug, warn};

use crate::error::{Result, SimError};
use super::{Run, TickReport};

/// Holds at most one active run.
///
/// A new run is accepted only when there is none or the current one has
/// stopped; the accepted run replaces the old one wholesale, so no optimizer
/// state or trajectory carries over between runs.
#[derive(Default)]
pub struct TrajectoryRunner {
    current: Option<Run>,
}

impl TrajectoryRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `run` as the current run.
    ///
    /// Fails with [`SimError::RunInProgress`] if the current run has not
    /// finished; the in-flight run is left untouched.
    pub fn start(&mut self, run: Run) -> Result<&mut Run> {
        if self.is_running() {
            warn!("start rejected: a run is still in progress");
            return Err(SimError::RunInProgress);
        }
        debug!("runner starting a new run");
        Ok(self.current.insert(run))
    }

    /// Advance the current run, if any
    pub fn tick(&mut self) -> Option<TickReport> {
        self.current.as_mut().and_then(Run::tick)
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|run| !run.is_finished())
    }

    pub fn current(&self) -> Option<&Run> {
        self.current.as_ref()
    }

    /// Drop the current run, finished or not
    pub fn reset(&mut self) {
        if self.current.take().is_some() {
            debug!("runner reset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::OptimizerConfig;
    use crate::surface::SurfaceKind;
    use crate::trajectory::RunOptions;

    fn run(budget: usize) -> Run {
        Run::new(
            SurfaceKind::Sphere.surface(),
            &[OptimizerConfig::Sgd { lr: 0.1 }],
            RunOptions::with_budget(budget),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_start_while_running() {
        let mut runner = TrajectoryRunner::new();
        runner.start(run(3)).unwrap();
        runner.tick();

        assert!(matches!(runner.start(run(10)), Err(SimError::RunInProgress)));
        // the first run is still there and keeps its progress
        assert_eq!(runner.current().unwrap().iteration(), 1);
        assert_eq!(runner.current().unwrap().options().max_iterations, 3);
    }

    #[test]
    fn test_new_run_replaces_finished_one() {
        let mut runner = TrajectoryRunner::new();
        runner.start(run(2)).unwrap();
        while runner.tick().is_some() {}
        assert!(!runner.is_running());

        let fresh = runner.start(run(5)).unwrap();
        assert_eq!(fresh.iteration(), 0);
        assert_eq!(fresh.lanes()[0].trajectory().len(), 1);
    }

    #[test]
    fn test_reset_discards_run() {
        let mut runner = TrajectoryRunner::new();
        runner.start(run(5)).unwrap();
        runner.tick();
        runner.reset();

        assert!(runner.current().is_none());
        assert!(runner.tick().is_none());
        assert!(runner.start(run(5)).is_ok());
    }
}
