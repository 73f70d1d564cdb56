use crate::error::Result;
use super::{Loss, check_pair};

/// Mean Squared Error loss
pub struct MSELoss;

impl Loss for MSELoss {
    /// Calculate MSE loss between predictions and targets
    fn forward(predictions: &[f64], targets: &[f64]) -> Result<f64> {
        check_pair(predictions, targets)?;

        let sum_squared_error: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(p, t)| (p - t) * (p - t))
            .sum();

        Ok(sum_squared_error / predictions.len() as f64)
    }
}

impl MSELoss {
    /// Gradient of the MSE with respect to each prediction
    pub fn backward(predictions: &[f64], targets: &[f64]) -> Result<Vec<f64>> {
        check_pair(predictions, targets)?;
        let n = predictions.len() as f64;

        Ok(predictions
            .iter()
            .zip(targets)
            .map(|(p, t)| 2.0 * (p - t) / n)
            .collect())
    }

    /// Per-element squared errors, in input order
    pub fn squared_errors(predictions: &[f64], targets: &[f64]) -> Result<Vec<f64>> {
        check_pair(predictions, targets)?;
        Ok(predictions.iter().zip(targets).map(|(p, t)| (p - t).powi(2)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_mse_loss() {
        let loss = MSELoss::forward(&[0.9, 0.2, 0.8], &[1.0, 0.0, 1.0]).unwrap();

        // ((0.1)^2 + (0.2)^2 + (0.2)^2) / 3 = 0.03
        assert!((loss - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_mse_backward() {
        let gradients = MSELoss::backward(&[0.5, 0.8], &[0.4, 0.9]).unwrap();

        // [2*(0.5-0.4)/2, 2*(0.8-0.9)/2] = [0.1, -0.1]
        assert!((gradients[0] - 0.1).abs() < 1e-12);
        assert!((gradients[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_mse_rejects_bad_lengths() {
        assert!(matches!(
            MSELoss::forward(&[1.0, 2.0], &[1.0]),
            Err(SimError::InvalidInput(_))
        ));
        assert!(matches!(MSELoss::forward(&[], &[]), Err(SimError::InvalidInput(_))));
    }

    #[test]
    fn test_squared_errors() {
        let errors = MSELoss::squared_errors(&[1.0, 3.0], &[0.0, 1.0]).unwrap();
        assert_eq!(errors, vec![1.0, 4.0]);
    }
}
