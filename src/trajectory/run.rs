use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, SimError};
use crate::optimizer::{Optimizer, OptimizerConfig, OptimizerKind, Stepper};
use crate::position::Position;
use crate::surface::Surface;
use super::Trajectory;

/// Multiplicative jitter applied to each gradient before stepping
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum GradientNoise {
    #[default]
    None,
    /// Scale the gradient by a factor drawn uniformly from `[low, high)`
    Uniform { low: f64, high: f64 },
}

impl GradientNoise {
    /// Per-sample noise, as in stochastic gradient descent
    pub const STOCHASTIC: Self = GradientNoise::Uniform { low: 0.5, high: 1.5 };
    /// Milder noise, as in mini-batch gradient descent
    pub const MINI_BATCH: Self = GradientNoise::Uniform { low: 0.8, high: 1.2 };

    fn validate(&self) -> Result<()> {
        match *self {
            GradientNoise::Uniform { low, high } if !(low.is_finite() && high.is_finite()) => Err(
                SimError::InvalidInput(format!("noise range [{low}, {high}) must be finite")),
            ),
            GradientNoise::Uniform { low, high } if !(low < high) => Err(SimError::InvalidInput(
                format!("noise range [{low}, {high}) is empty"),
            )),
            _ => Ok(()),
        }
    }

    fn factor(&self, rng: &mut impl Rng) -> f64 {
        match *self {
            GradientNoise::None => 1.0,
            GradientNoise::Uniform { low, high } => rng.random_range(low..high),
        }
    }
}

/// How a run is bounded and perturbed
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    /// Number of ticks before the run stops on its own
    pub max_iterations: usize,
    /// Stop early once every lane's loss drops below this value
    pub convergence_threshold: Option<f64>,
    pub noise: GradientNoise,
    /// Seed for the noise source; `None` draws one from the thread RNG
    pub seed: Option<u64>,
    /// Where every lane begins; `None` uses the surface's start point
    pub start: Option<Position>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            max_iterations: 100,
            convergence_threshold: None,
            noise: GradientNoise::None,
            seed: None,
            start: None,
        }
    }
}

impl RunOptions {
    pub fn with_budget(max_iterations: usize) -> Self {
        RunOptions {
            max_iterations,
            ..Self::default()
        }
    }
}

/// Where a run stands
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Every lane fell below the convergence threshold after this many ticks
    Converged { iterations: usize },
    /// The iteration budget ran out
    Exhausted,
}

/// One optimizer and the path it has taken
#[derive(Clone, Debug)]
pub struct Lane {
    optimizer: Optimizer,
    trajectory: Trajectory,
}

impl Lane {
    pub fn kind(&self) -> OptimizerKind {
        self.optimizer.kind()
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }
}

/// What changed during one tick
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Ticks completed, including this one
    pub iteration: usize,
    /// Newest position of each lane, in lane order
    pub positions: Vec<Position>,
    /// Surface value at each new position
    pub losses: Vec<f64>,
}

/// A set of optimizers stepping in lockstep over one surface
pub struct Run {
    surface: Surface,
    lanes: Vec<Lane>,
    options: RunOptions,
    iteration: usize,
    status: RunStatus,
    rng: StdRng,
}

impl Run {
    /// Build a run with a fresh optimizer for every config, all starting at
    /// `options.start` or else the surface's start point.
    pub fn new(surface: Surface, configs: &[OptimizerConfig], options: RunOptions) -> Result<Self> {
        if configs.is_empty() {
            return Err(SimError::InvalidInput("a run needs at least one optimizer".into()));
        }
        options.noise.validate()?;

        let start = options.start.unwrap_or(surface.start);
        let lanes = configs
            .iter()
            .map(|config| Lane {
                optimizer: config.build(),
                trajectory: Trajectory::new(start),
            })
            .collect();
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let status = if options.max_iterations == 0 {
            RunStatus::Exhausted
        } else {
            RunStatus::Running
        };

        debug!(
            "run created on {} with {} optimizer(s), budget {}",
            surface.kind,
            configs.len(),
            options.max_iterations
        );

        Ok(Run {
            surface,
            lanes,
            options,
            iteration: 0,
            status,
            rng,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Ticks completed so far
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status != RunStatus::Running
    }

    /// Advance every lane by one step. Returns `None` once the run has stopped.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.is_finished() {
            return None;
        }

        let mut positions = Vec::with_capacity(self.lanes.len());
        let mut losses = Vec::with_capacity(self.lanes.len());
        for lane in &mut self.lanes {
            let current = lane.trajectory.last();
            let noise = self.options.noise.factor(&mut self.rng);
            let gradient = self.surface.gradient_at(current) * noise;
            let next = lane.optimizer.step(current, gradient);
            lane.trajectory.push(next);

            positions.push(next);
            losses.push(self.surface.value_at(next));
        }
        self.iteration += 1;
        trace!("tick {}: {:?}", self.iteration, positions);

        let converged = self
            .options
            .convergence_threshold
            .is_some_and(|threshold| losses.iter().all(|&loss| loss < threshold));
        if converged {
            debug!("run converged after {} iteration(s)", self.iteration);
            self.status = RunStatus::Converged { iterations: self.iteration };
        } else if self.iteration >= self.options.max_iterations {
            debug!("run exhausted its budget of {}", self.options.max_iterations);
            self.status = RunStatus::Exhausted;
        }

        Some(TickReport {
            iteration: self.iteration,
            positions,
            losses,
        })
    }

    /// Tick until the run stops
    pub fn run_to_end(&mut self) -> RunStatus {
        while self.tick().is_some() {}
        self.status
    }

    /// Surface value at each lane's newest position
    pub fn final_losses(&self) -> Vec<f64> {
        self.lanes
            .iter()
            .map(|lane| self.surface.value_at(lane.trajectory.last()))
            .collect()
    }
}

impl Iterator for Run {
    type Item = TickReport;

    fn next(&mut self) -> Option<TickReport> {
        self.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceKind;

    fn sphere_sgd(lr: f64, options: RunOptions) -> Run {
        Run::new(SurfaceKind::Sphere.surface(), &[OptimizerConfig::Sgd { lr }], options).unwrap()
    }

    #[test]
    fn test_single_step_on_sphere() {
        let mut run = sphere_sgd(0.1, RunOptions::with_budget(1));
        let report = run.tick().unwrap();

        assert_eq!(report.iteration, 1);
        assert!((report.positions[0].x - 1.6).abs() < 1e-12);
        assert!((report.positions[0].y - 1.6).abs() < 1e-12);
        assert!((report.losses[0] - 5.12).abs() < 1e-12);
        assert_eq!(run.status(), RunStatus::Exhausted);
        assert!(run.tick().is_none());
    }

    #[test]
    fn test_budget_bounds_trajectory_length() {
        let mut run = sphere_sgd(0.01, RunOptions::with_budget(50));
        assert_eq!(run.run_to_end(), RunStatus::Exhausted);
        assert_eq!(run.iteration(), 50);
        assert_eq!(run.lanes()[0].trajectory().len(), 51);
    }

    #[test]
    fn test_convergence_stops_early() {
        let options = RunOptions {
            max_iterations: 150,
            convergence_threshold: Some(0.001),
            ..RunOptions::default()
        };
        let mut run = sphere_sgd(0.1, options);
        let status = run.run_to_end();

        let RunStatus::Converged { iterations } = status else {
            panic!("expected convergence, got {status:?}");
        };
        assert!(iterations < 150);
        assert!(run.final_losses()[0] < 0.001);
        // the previous point was still above the threshold
        let path = run.lanes()[0].trajectory().positions();
        let before = path[path.len() - 2];
        assert!(run.surface().value_at(before) >= 0.001);
    }

    #[test]
    fn test_lanes_step_in_lockstep() {
        let configs: Vec<_> = OptimizerKind::ALL.iter().map(|k| k.default_config()).collect();
        let mut run = Run::new(SurfaceKind::Rosenbrock.surface(), &configs, RunOptions::with_budget(10)).unwrap();
        let reports: Vec<_> = run.by_ref().collect();

        assert_eq!(reports.len(), 10);
        for lane in run.lanes() {
            assert_eq!(lane.trajectory().len(), 11);
            assert_eq!(lane.trajectory().start(), Position::new(-1.0, -1.0));
        }
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let options = RunOptions {
            max_iterations: 20,
            noise: GradientNoise::STOCHASTIC,
            seed: Some(7),
            ..RunOptions::default()
        };
        let mut a = sphere_sgd(0.1, options.clone());
        let mut b = sphere_sgd(0.1, options);
        a.run_to_end();
        b.run_to_end();
        assert_eq!(a.lanes()[0].trajectory(), b.lanes()[0].trajectory());

        // noise only rescales the step, so the path stays on the diagonal
        for p in a.lanes()[0].trajectory().positions() {
            assert!((p.x - p.y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_noise_bounds_each_step() {
        let options = RunOptions {
            max_iterations: 30,
            noise: GradientNoise::MINI_BATCH,
            seed: Some(3),
            ..RunOptions::default()
        };
        let mut run = sphere_sgd(0.1, options);
        run.run_to_end();
        // x' = x (1 - 0.2 f) with f in [0.8, 1.2)
        for w in run.lanes()[0].trajectory().positions().windows(2) {
            let ratio = w[1].x / w[0].x;
            assert!(ratio > 0.76 - 1e-12 && ratio <= 0.84 + 1e-12, "ratio {ratio}");
        }
    }

    #[test]
    fn test_rejects_bad_setup() {
        let surface = SurfaceKind::Sphere.surface();
        assert!(matches!(
            Run::new(surface, &[], RunOptions::default()),
            Err(SimError::InvalidInput(_))
        ));
        let options = RunOptions {
            noise: GradientNoise::Uniform { low: 1.0, high: 1.0 },
            ..RunOptions::default()
        };
        assert!(Run::new(surface, &[OptimizerConfig::Sgd { lr: 0.1 }], options).is_err());
    }

    #[test]
    fn test_zero_budget_is_finished_immediately() {
        let mut run = sphere_sgd(0.1, RunOptions::with_budget(0));
        assert!(run.is_finished());
        assert!(run.tick().is_none());
        assert_eq!(run.lanes()[0].trajectory().len(), 1);
    }

    #[test]
    fn test_custom_start() {
        let options = RunOptions {
            start: Some(Position::new(-2.0, 2.0)),
            ..RunOptions::default()
        };
        let run = sphere_sgd(0.1, options);
        assert_eq!(run.lanes()[0].trajectory().start(), Position::new(-2.0, 2.0));
    }

    #[test]
    fn test_new_run_at_custom_start_has_fresh_state() {
        let adam = [OptimizerConfig::Adam { lr: 0.1, beta1: 0.9, beta2: 0.999 }];
        let surface = SurfaceKind::Sphere.surface();
        let mut first = Run::new(surface, &adam, RunOptions::with_budget(3)).unwrap();
        first.run_to_end();
        let Optimizer::Adam(used) = first.lanes()[0].optimizer() else {
            panic!("expected adam");
        };
        assert_eq!(used.timestep(), 3);

        let options = RunOptions {
            start: Some(Position::new(-2.0, 2.0)),
            ..RunOptions::with_budget(3)
        };
        let second = Run::new(surface, &adam, options).unwrap();
        assert_eq!(second.iteration(), 0);
        assert_eq!(second.status(), RunStatus::Running);
        assert_eq!(second.lanes()[0].trajectory().len(), 1);
        let Optimizer::Adam(fresh) = second.lanes()[0].optimizer() else {
            panic!("expected adam");
        };
        assert_eq!(fresh.timestep(), 0);
    }

    #[test]
    fn test_rejects_non_finite_noise() {
        let options = RunOptions {
            noise: GradientNoise::Uniform { low: 0.0, high: f64::INFINITY },
            ..RunOptions::default()
        };
        let surface = SurfaceKind::Sphere.surface();
        assert!(matches!(
            Run::new(surface, &[OptimizerConfig::Sgd { lr: 0.1 }], options),
            Err(SimError::InvalidInput(_))
        ));
        let options = RunOptions {
            noise: GradientNoise::Uniform { low: f64::NAN, high: 1.0 },
            ..RunOptions::default()
        };
        assert!(Run::new(surface, &[OptimizerConfig::Sgd { lr: 0.1 }], options).is_err());
    }
}
