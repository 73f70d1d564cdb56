//! Text rendering of curves, trajectories and gradient chains
//!
//! The `render_*` functions build a string; the `plot_*` wrappers print it.

use std::fmt::Write;

use crate::gradient_flow::GradientChain;
use crate::position::Position;
use crate::trajectory::Run;

const BAR_WIDTH: usize = 50;

/// Plot a series of values as a column of `*`, one column per entry
pub fn render_series(title: &str, values: &[f64], height: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        let _ = writeln!(out, "No data available.");
        return out;
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Avoid division by zero if all values are the same
    let range = if (max - min).abs() < 1e-12 { 1.0 } else { max - min };
    let height = height.max(2);
    let width = values.len();

    let mut plot = vec![vec![' '; width]; height];
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        let normalized = (v - min) / range;
        let row = ((1.0 - normalized) * (height - 1) as f64).round() as usize;
        plot[row.min(height - 1)][i] = '*';
    }

    for row in plot {
        let _ = writeln!(out, "|{}|", row.into_iter().collect::<String>());
    }
    let _ = writeln!(out, "+{}+", "-".repeat(width));
    let _ = writeln!(out, "Min: {min:.6}, Max: {max:.6}");
    let _ = writeln!(out, "Steps: 0 to {}", width - 1);
    if let Some(last) = values.last() {
        let _ = writeln!(out, "Final: {last:.6}");
    }
    out
}

/// Print a loss curve
pub fn plot_loss(losses: &[f64]) {
    print!("{}", render_series("Loss Curve:", losses, 15));
}

/// Draw every lane of a run on a `size × size` grid spanning the surface's
/// range. Lanes are numbered from 1 in run order; `*` marks the optimum.
pub fn render_trajectories(run: &Run, size: usize) -> String {
    let size = size.max(3);
    let range = run.surface().range;
    let mut grid = vec![vec!['.'; size]; size];

    let cell = |p: Position| -> Option<(usize, usize)> {
        if !p.is_finite() || p.x.abs() > range || p.y.abs() > range {
            return None;
        }
        let scale = (size - 1) as f64 / (2.0 * range);
        let col = ((p.x + range) * scale).round() as usize;
        // y grows upward
        let row = ((range - p.y) * scale).round() as usize;
        Some((row.min(size - 1), col.min(size - 1)))
    };

    for (i, lane) in run.lanes().iter().enumerate() {
        // lanes past the ninth share '#'
        let marker = char::from_digit((i + 1) as u32, 10).unwrap_or('#');
        for &p in lane.trajectory().positions() {
            if let Some((row, col)) = cell(p) {
                grid[row][col] = marker;
            }
        }
    }
    if let Some((row, col)) = cell(run.surface().optimum) {
        grid[row][col] = '*';
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} surface, [-{range}, {range}]²", run.surface().kind);
    for row in grid {
        let _ = writeln!(out, "{}", row.into_iter().collect::<String>());
    }
    for (i, lane) in run.lanes().iter().enumerate() {
        let _ = writeln!(out, "  {} = {}", i + 1, lane.kind());
    }
    out
}

pub fn plot_trajectories(run: &Run) {
    print!("{}", render_trajectories(run, 21));
}

/// One bar per layer, scaled to the largest magnitude in the chain
pub fn render_gradient_chain(chain: &GradientChain) -> String {
    let max = chain.values().iter().copied().fold(0.0, f64::max);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Gradient flow ({}, scale {}):",
        chain.activation(),
        chain.weight_scale()
    );
    for (layer, &g) in chain.values().iter().enumerate() {
        let len = if max > 0.0 {
            ((g / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(out, "layer {layer:3} {:<BAR_WIDTH$} {g:.3e}", "#".repeat(len));
    }
    let _ = writeln!(out, "ratio last/first: {:.3e} ({})", chain.ratio(), chain.regime());
    out
}

pub fn plot_gradient_chain(chain: &GradientChain) {
    print!("{}", render_gradient_chain(chain));
}

/// Weights before and after regularization, one pair of bars per weight
pub fn render_weights(original: &[f64], regularized: &[f64]) -> String {
    let max = original
        .iter()
        .chain(regularized)
        .map(|w| w.abs())
        .fold(0.0, f64::max);
    let bar = |w: f64| {
        let len = if max > 0.0 {
            ((w.abs() / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        "#".repeat(len)
    };

    let mut out = String::new();
    for (i, (&before, &after)) in original.iter().zip(regularized).enumerate() {
        let _ = writeln!(out, "w{i:<2} before {:<BAR_WIDTH$} {before:+.3}", bar(before));
        let _ = writeln!(out, "    after  {:<BAR_WIDTH$} {after:+.3}", bar(after));
    }
    out
}
