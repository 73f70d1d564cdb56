//! Overfitting curves and the regularization techniques that counter them
//!
//! The curves here are closed-form stand-ins for real training runs: they
//! have the shape a learner sees (training loss keeps falling, validation
//! loss turns upward once the model starts memorising) without training
//! anything.

use std::fmt;

use log::debug;
use rand::Rng;

use crate::error::{Result, SimError};

/// Epochs shown by the curve demos
pub const EPOCHS: usize = 100;

/// Layer widths of the dropout demo network: input, two hidden, output
pub const DROPOUT_LAYERS: [usize; 4] = [3, 8, 8, 2];
/// Dropout rate applied to the input layer regardless of the chosen rate
pub const INPUT_DROPOUT: f64 = 0.2;

const EARLY_STOP_ONSET: f64 = 30.0;
const EARLY_STOP_SLOPE: f64 = 0.6 / 40.0;

fn train_loss(epoch: f64) -> f64 {
    2.0 * (-epoch / 20.0).exp() + 0.1
}

/// Falls until `onset`, then climbs linearly from the value reached there
fn validation_loss(epoch: f64, onset: f64, slope: f64) -> f64 {
    if epoch < onset {
        2.5 * (-epoch / 25.0).exp() + 0.3
    } else {
        2.5 * (-onset / 25.0).exp() + 0.3 + (epoch - onset) * slope
    }
}

/// How far validation loss has drifted from training loss
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Generalization {
    Good,
    ModerateOverfit,
    SevereOverfit,
}

impl Generalization {
    pub fn from_gap(gap: f64) -> Self {
        if gap > 0.5 {
            Generalization::SevereOverfit
        } else if gap > 0.2 {
            Generalization::ModerateOverfit
        } else {
            Generalization::Good
        }
    }
}

impl fmt::Display for Generalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Generalization::Good => "Good generalization: training and validation losses are close",
            Generalization::ModerateOverfit => "Moderate overfitting: consider regularization",
            Generalization::SevereOverfit => "Severe overfitting: large gap between training and validation loss",
        })
    }
}

/// Training and validation loss per epoch
#[derive(Clone, Debug, PartialEq)]
pub struct LossCurves {
    pub train: Vec<f64>,
    pub validation: Vec<f64>,
    /// Epoch at which validation loss stops improving
    pub onset: f64,
}

impl LossCurves {
    pub fn final_train(&self) -> f64 {
        self.train.last().copied().unwrap_or(0.0)
    }

    pub fn final_validation(&self) -> f64 {
        self.validation.last().copied().unwrap_or(0.0)
    }

    /// Final validation loss minus final training loss
    pub fn gap(&self) -> f64 {
        self.final_validation() - self.final_train()
    }

    pub fn generalization(&self) -> Generalization {
        Generalization::from_gap(self.gap())
    }

    /// Epoch with the lowest validation loss, first one on ties
    pub fn best_epoch(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.validation.iter().enumerate().skip(1) {
            if v < self.validation[best] {
                best = i;
            }
        }
        best
    }
}

/// Curves for a model of the given complexity trained on `data_size` samples.
///
/// More complexity or less data moves the overfitting onset earlier, but
/// never before epoch 10.
pub fn overfitting_curves(complexity: f64, data_size: f64) -> Result<LossCurves> {
    if !(data_size > 0.0) {
        return Err(SimError::InvalidInput(format!("data size must be positive, got {data_size}")));
    }
    let factor = complexity / (data_size / 100.0);
    let onset = (40.0 - factor * 5.0).max(10.0);
    debug!("overfitting curves: complexity {complexity}, data {data_size}, onset {onset}");

    let (train, validation) = (0..EPOCHS)
        .map(|i| {
            let epoch = i as f64;
            (train_loss(epoch), validation_loss(epoch, onset, 0.5 / 30.0))
        })
        .unzip();
    Ok(LossCurves { train, validation, onset })
}

/// Soft-threshold every weight by `lambda`; weights within `lambda` of zero
/// become exactly zero.
pub fn l1_shrink(weights: &[f64], lambda: f64) -> Vec<f64> {
    weights
        .iter()
        .map(|&w| {
            if w.abs() <= lambda {
                0.0
            } else {
                w - w.signum() * lambda
            }
        })
        .collect()
}

/// Multiplier applied to every weight by [`l2_decay`]
pub fn l2_decay_factor(lambda: f64) -> f64 {
    1.0 / (1.0 + lambda * 10.0)
}

/// Shrink every weight toward zero by the same factor
pub fn l2_decay(weights: &[f64], lambda: f64) -> Vec<f64> {
    let factor = l2_decay_factor(lambda);
    weights.iter().map(|w| w * factor).collect()
}

/// Which neurons of the demo network survived one dropout draw
#[derive(Clone, Debug, PartialEq)]
pub struct DropoutMask {
    /// `true` where a neuron was dropped, one vector per layer
    pub layers: Vec<Vec<bool>>,
}

impl DropoutMask {
    pub fn total(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn dropped(&self) -> usize {
        self.layers.iter().flatten().filter(|&&d| d).count()
    }

    pub fn active(&self) -> usize {
        self.total() - self.dropped()
    }
}

/// Draw a mask over `count` neurons, dropping each with probability `rate`
pub fn dropout_layer<R: Rng + ?Sized>(count: usize, rate: f64, rng: &mut R) -> Result<Vec<bool>> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(SimError::InvalidInput(format!("dropout rate must be in [0, 1], got {rate}")));
    }
    Ok((0..count).map(|_| rng.random::<f64>() < rate).collect())
}

/// Draw a mask over the demo network: the input layer at a fixed 20%, the
/// hidden layers at `rate`, the output layer never.
pub fn dropout_network<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> Result<DropoutMask> {
    let last = DROPOUT_LAYERS.len() - 1;
    let layers = DROPOUT_LAYERS
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let layer_rate = match i {
                0 => INPUT_DROPOUT,
                i if i == last => 0.0,
                _ => rate,
            };
            dropout_layer(count, layer_rate, rng)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DropoutMask { layers })
}

/// Where early stopping would halt training
#[derive(Clone, Debug, PartialEq)]
pub struct EarlyStop {
    pub curves: LossCurves,
    pub best_epoch: usize,
    pub stop_epoch: usize,
}

impl EarlyStop {
    /// Validation loss at the best epoch
    pub fn best_loss(&self) -> f64 {
        self.curves.validation[self.best_epoch]
    }

    /// Epochs skipped compared to training to the end
    pub fn epochs_saved(&self) -> usize {
        EPOCHS - 1 - self.stop_epoch
    }
}

/// Stop `patience` epochs after the best validation loss
pub fn early_stopping(patience: usize) -> EarlyStop {
    let (train, validation) = (0..EPOCHS)
        .map(|i| {
            let epoch = i as f64;
            (train_loss(epoch), validation_loss(epoch, EARLY_STOP_ONSET, EARLY_STOP_SLOPE))
        })
        .unzip();
    let curves = LossCurves {
        train,
        validation,
        onset: EARLY_STOP_ONSET,
    };
    let best_epoch = curves.best_epoch();
    let stop_epoch = best_epoch.saturating_add(patience).min(EPOCHS - 1);
    debug!("early stopping: best epoch {best_epoch}, stop at {stop_epoch}");
    EarlyStop {
        curves,
        best_epoch,
        stop_epoch,
    }
}
