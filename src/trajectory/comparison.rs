use crate::error::Result;
use crate::optimizer::{OptimizerConfig, OptimizerKind};
use crate::position::Position;
use crate::surface::SurfaceKind;
use super::{Run, RunOptions};

/// Ticks in an optimizer comparison
pub const COMPARISON_ITERATIONS: usize = 100;

/// Build a comparison run: each selected optimizer with its default
/// hyperparameters, stepping in lockstep over `surface`.
///
/// Repeated kinds are kept once, in first-seen order.
pub fn compare(surface: SurfaceKind, selected: &[OptimizerKind], iterations: usize) -> Result<Run> {
    let mut kinds: Vec<OptimizerKind> = Vec::with_capacity(selected.len());
    for &kind in selected {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    let configs: Vec<OptimizerConfig> = kinds.iter().map(|k| k.default_config()).collect();
    Run::new(surface.surface(), &configs, RunOptions::with_budget(iterations))
}

/// End-of-run metrics for one optimizer
#[derive(Clone, Debug, PartialEq)]
pub struct LaneSummary {
    pub kind: OptimizerKind,
    /// Number of recorded positions, start included
    pub path_length: usize,
    pub final_position: Position,
    pub final_loss: f64,
    /// Distance from the final position to the surface's optimum
    pub distance_to_optimum: f64,
}

impl Run {
    pub fn summaries(&self) -> Vec<LaneSummary> {
        let surface = self.surface();
        self.lanes()
            .iter()
            .map(|lane| {
                let last = lane.trajectory().last();
                LaneSummary {
                    kind: lane.kind(),
                    path_length: lane.trajectory().len(),
                    final_position: last,
                    final_loss: surface.value_at(last),
                    distance_to_optimum: last.distance(surface.optimum),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_compare_on_sphere() {
        let mut run = compare(
            SurfaceKind::Sphere,
            &[OptimizerKind::Sgd, OptimizerKind::Momentum, OptimizerKind::Adam],
            COMPARISON_ITERATIONS,
        )
        .unwrap();
        run.run_to_end();

        let summaries = run.summaries();
        assert_eq!(summaries.len(), 3);
        let start_loss = 8.0;
        for summary in &summaries {
            assert_eq!(summary.path_length, 101);
            assert!(summary.final_loss < start_loss, "{:?} did not descend", summary.kind);
        }
        // sgd with lr 0.01: x_n = 2 * 0.98^n
        let expected = 2.0 * 0.98f64.powi(100);
        assert!((summaries[0].final_position.x - expected).abs() < 1e-9);
    }

    #[test]
    fn test_selection_is_deduplicated() {
        let run = compare(
            SurfaceKind::Beale,
            &[OptimizerKind::Adam, OptimizerKind::Sgd, OptimizerKind::Adam],
            10,
        )
        .unwrap();
        let kinds: Vec<_> = run.lanes().iter().map(|l| l.kind()).collect();
        assert_eq!(kinds, vec![OptimizerKind::Adam, OptimizerKind::Sgd]);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        assert!(matches!(
            compare(SurfaceKind::Sphere, &[], 10),
            Err(SimError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_successive_comparisons_are_identical() {
        let mut first = compare(SurfaceKind::Beale, &OptimizerKind::ALL, 100).unwrap();
        first.run_to_end();
        let mut second = compare(SurfaceKind::Beale, &OptimizerKind::ALL, 100).unwrap();
        second.run_to_end();
        assert_eq!(first.summaries(), second.summaries());
    }

    #[test]
    fn test_beale_comparison_descends() {
        let mut run = compare(SurfaceKind::Beale, &OptimizerKind::ALL, COMPARISON_ITERATIONS).unwrap();
        run.run_to_end();
        // starts at (1, 1) where the loss is 14.203125
        for summary in run.summaries() {
            assert!(summary.final_loss.is_finite());
            assert!(summary.final_loss < 14.2, "{:?} did not descend", summary.kind);
        }
        let momentum = &run.summaries()[1];
        assert!(momentum.distance_to_optimum < 0.1);
    }
}
