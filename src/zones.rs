//! Safe / experimental / dangerous ranges for tunable parameters

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterZone {
    Safe,
    Experimental,
    Dangerous,
}

impl fmt::Display for ParameterZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParameterZone::Safe => "safe",
            ParameterZone::Experimental => "experimental",
            ParameterZone::Dangerous => "dangerous",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Weights,
    Bias,
    LearningRate,
    Dropout,
    Lambda,
    Momentum,
    Depth,
    WeightScale,
}

/// Inclusive ranges of each zone
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoneRanges {
    pub safe: (f64, f64),
    pub experimental: (f64, f64),
    pub dangerous: (f64, f64),
}

impl Parameter {
    pub const ALL: [Parameter; 8] = [
        Parameter::Weights,
        Parameter::Bias,
        Parameter::LearningRate,
        Parameter::Dropout,
        Parameter::Lambda,
        Parameter::Momentum,
        Parameter::Depth,
        Parameter::WeightScale,
    ];

    pub fn ranges(self) -> ZoneRanges {
        let (safe, experimental, dangerous) = match self {
            Parameter::Weights | Parameter::Bias => ((-2.0, 2.0), (-5.0, 5.0), (-10.0, 10.0)),
            Parameter::LearningRate => ((0.0001, 0.1), (0.1, 1.0), (1.0, 5.0)),
            Parameter::Dropout => ((0.2, 0.5), (0.5, 0.8), (0.8, 0.95)),
            Parameter::Lambda => ((0.0, 0.1), (0.1, 1.0), (1.0, 10.0)),
            Parameter::Momentum => ((0.8, 1.0), (0.0, 0.8), (1.0, 1.5)),
            Parameter::Depth => ((1.0, 10.0), (10.0, 20.0), (20.0, 50.0)),
            Parameter::WeightScale => ((0.1, 1.0), (1.0, 2.0), (2.0, 10.0)),
        };
        ZoneRanges { safe, experimental, dangerous }
    }

    /// Value above which this parameter is dangerous regardless of its ranges
    fn danger_threshold(self) -> Option<f64> {
        match self {
            Parameter::Momentum | Parameter::LearningRate => Some(1.0),
            Parameter::Dropout => Some(0.8),
            Parameter::Lambda => Some(5.0),
            Parameter::Depth => Some(20.0),
            Parameter::WeightScale => Some(2.0),
            Parameter::Weights | Parameter::Bias => None,
        }
    }

    /// Zone of `value`.
    ///
    /// Only the explicit thresholds yield `Dangerous`; anything else
    /// outside the safe bound by magnitude is `Experimental`.
    pub fn classify(self, value: f64) -> ParameterZone {
        if self.danger_threshold().is_some_and(|t| value > t) {
            return ParameterZone::Dangerous;
        }
        let ranges = self.ranges();
        let magnitude = value.abs();
        if magnitude > ranges.experimental.1.abs() || magnitude > ranges.safe.1.abs() {
            ParameterZone::Experimental
        } else {
            ParameterZone::Safe
        }
    }
}
