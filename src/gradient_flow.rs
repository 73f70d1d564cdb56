//! How a gradient grows or shrinks as it passes back through many layers

use std::fmt;

use log::debug;

use crate::activation::ActivationKind;
use crate::error::{Result, SimError};

/// Ratio below which a chain counts as vanishing
pub const VANISHING_RATIO: f64 = 1e-3;
/// Ratio above which a chain counts as exploding
pub const EXPLODING_RATIO: f64 = 1e3;
/// Deepest chain [`gradient_chain`] will build
pub const MAX_DEPTH: usize = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlowRegime {
    Vanishing,
    Stable,
    Exploding,
}

impl fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowRegime::Vanishing => "vanishing",
            FlowRegime::Stable => "stable",
            FlowRegime::Exploding => "exploding",
        })
    }
}

/// Gradient magnitude at each layer, from the output (1.0) back to the input
#[derive(Clone, Debug, PartialEq)]
pub struct GradientChain {
    activation: ActivationKind,
    weight_scale: f64,
    values: Vec<f64>,
}

impl GradientChain {
    pub fn activation(&self) -> ActivationKind {
        self.activation
    }

    pub fn weight_scale(&self) -> f64 {
        self.weight_scale
    }

    /// Number of layers the gradient passed through
    pub fn depth(&self) -> usize {
        self.values.len() - 1
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first(&self) -> f64 {
        self.values[0]
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// last / first
    pub fn ratio(&self) -> f64 {
        self.last() / self.first()
    }

    pub fn regime(&self) -> FlowRegime {
        let ratio = self.ratio();
        if ratio < VANISHING_RATIO {
            FlowRegime::Vanishing
        } else if ratio > EXPLODING_RATIO {
            FlowRegime::Exploding
        } else {
            FlowRegime::Stable
        }
    }
}

/// Multiply a unit gradient by `derivative · weight_scale` once per layer.
///
/// The per-layer derivative is a fixed constant for the activation (see
/// [`ActivationKind::flow_derivative`]); activations without one are rejected,
/// as are depths above [`MAX_DEPTH`].
pub fn gradient_chain(depth: usize, weight_scale: f64, activation: ActivationKind) -> Result<GradientChain> {
    let derivative = activation.flow_derivative().ok_or_else(|| {
        SimError::InvalidInput(format!("no gradient-flow constant for activation '{activation}'"))
    })?;
    if depth > MAX_DEPTH {
        return Err(SimError::InvalidInput(format!("depth must be at most {MAX_DEPTH}, got {depth}")));
    }
    if !weight_scale.is_finite() {
        return Err(SimError::InvalidInput(format!("weight scale must be finite, got {weight_scale}")));
    }

    let factor = derivative * weight_scale;
    let mut values = Vec::with_capacity(depth + 1);
    let mut g = 1.0;
    values.push(g);
    for _ in 0..depth {
        g *= factor;
        values.push(g);
    }

    let chain = GradientChain { activation, weight_scale, values };
    debug!(
        "gradient chain: {activation}, depth {depth}, scale {weight_scale}: ratio {:.3e} ({})",
        chain.ratio(),
        chain.regime()
    );
    Ok(chain)
}

/// Clamp a gradient into `[-threshold, threshold]`
pub fn clip_gradient(g: f64, threshold: f64) -> f64 {
    let t = threshold.abs();
    g.clamp(-t, t)
}

/// `(raw, clipped)` pairs with raw spanning `[-4, 4]`
pub fn clipping_curve(threshold: f64, samples: usize) -> Vec<(f64, f64)> {
    let samples = samples.max(2);
    let step = 8.0 / (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            let raw = -4.0 + step * i as f64;
            (raw, clip_gradient(raw, threshold))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_chain_vanishes() {
        let chain = gradient_chain(30, 1.0, ActivationKind::Sigmoid).unwrap();
        assert_eq!(chain.values().len(), 31);
        assert_eq!(chain.first(), 1.0);
        assert!((chain.ratio() - 0.25f64.powi(30)).abs() < 1e-30);
        assert_eq!(chain.regime(), FlowRegime::Vanishing);
        for pair in chain.values().windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn test_relu_chain_is_flat() {
        let chain = gradient_chain(10, 1.0, ActivationKind::Relu).unwrap();
        assert!(chain.values().iter().all(|&v| v == 1.0));
        assert_eq!(chain.regime(), FlowRegime::Stable);
    }

    #[test]
    fn test_large_scale_explodes() {
        // tanh: 0.4 * 5.0 = 2 per layer
        let chain = gradient_chain(12, 5.0, ActivationKind::Tanh).unwrap();
        assert!((chain.last() - 4096.0).abs() < 1e-9);
        assert_eq!(chain.regime(), FlowRegime::Exploding);
    }

    #[test]
    fn test_zero_depth() {
        let chain = gradient_chain(0, 3.0, ActivationKind::Sigmoid).unwrap();
        assert_eq!(chain.values(), &[1.0]);
        assert_eq!(chain.depth(), 0);
        assert_eq!(chain.ratio(), 1.0);
    }

    #[test]
    fn test_unsupported_activation() {
        assert!(matches!(
            gradient_chain(5, 1.0, ActivationKind::Swish),
            Err(SimError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_depth_is_bounded() {
        assert!(gradient_chain(MAX_DEPTH, 1.0, ActivationKind::Relu).is_ok());
        assert!(matches!(
            gradient_chain(MAX_DEPTH + 1, 1.0, ActivationKind::Relu),
            Err(SimError::InvalidInput(_))
        ));
        assert!(matches!(
            gradient_chain(usize::MAX, 1.0, ActivationKind::Sigmoid),
            Err(SimError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_clipping() {
        assert_eq!(clip_gradient(3.0, 1.0), 1.0);
        assert_eq!(clip_gradient(-3.0, 1.0), -1.0);
        assert_eq!(clip_gradient(0.4, 1.0), 0.4);

        let curve = clipping_curve(2.0, 9);
        assert_eq!(curve.len(), 9);
        assert_eq!(curve[0], (-4.0, -2.0));
        assert_eq!(curve[4], (0.0, 0.0));
        assert_eq!(curve[8], (4.0, 2.0));
    }
}
