use crate::activation::sigmoid;
use crate::error::Result;
use super::{Loss, check_pair};

/// Clamp margin keeping probabilities away from 0 and 1
pub const CE_EPSILON: f64 = 1e-10;

/// Binary cross entropy, summed over elements.
///
/// Predictions outside `[0, 1]` are squashed through a sigmoid first, so raw
/// scores can be passed in. Targets above 0.5 count as positive, everything
/// else (including negative targets) as negative.
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// Map a raw prediction to a probability safe to take the log of
    pub fn normalize(prediction: f64) -> f64 {
        let p = if (0.0..=1.0).contains(&prediction) {
            prediction
        } else {
            sigmoid(prediction)
        };
        p.clamp(CE_EPSILON, 1.0 - CE_EPSILON)
    }

    /// Loss contribution of a single element
    pub fn term(prediction: f64, target: f64) -> f64 {
        let p = Self::normalize(prediction);
        if target > 0.5 { -p.ln() } else { -(1.0 - p).ln() }
    }
}

impl Loss for CrossEntropyLoss {
    fn forward(predictions: &[f64], targets: &[f64]) -> Result<f64> {
        check_pair(predictions, targets)?;

        Ok(predictions
            .iter()
            .zip(targets)
            .map(|(&p, &t)| Self::term(p, t))
            .sum())
    }
}
