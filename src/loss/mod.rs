//! Loss functions comparing predictions against targets

mod mse;
mod cross_entropy;

pub use mse::MSELoss;
pub use cross_entropy::{CrossEntropyLoss, CE_EPSILON};

use crate::error::{Result, SimError};

/// Common trait for loss functions
pub trait Loss {
    /// Calculate the loss between predictions and targets
    fn forward(predictions: &[f64], targets: &[f64]) -> Result<f64>;
}

/// Reject sequences that cannot be compared elementwise
pub(crate) fn check_pair(predictions: &[f64], targets: &[f64]) -> Result<()> {
    if predictions.is_empty() {
        return Err(SimError::InvalidInput("loss needs at least one prediction".into()));
    }
    if predictions.len() != targets.len() {
        return Err(SimError::InvalidInput(format!(
            "predictions and targets differ in length ({} vs {})",
            predictions.len(),
            targets.len()
        )));
    }
    Ok(())
}

/// Mean squared error; see [`MSELoss`]
pub fn mean_squared_error(predictions: &[f64], targets: &[f64]) -> Result<f64> {
    MSELoss::forward(predictions, targets)
}

/// Summed cross entropy; see [`CrossEntropyLoss`]
pub fn cross_entropy(predictions: &[f64], targets: &[f64]) -> Result<f64> {
    CrossEntropyLoss::forward(predictions, targets)
}
