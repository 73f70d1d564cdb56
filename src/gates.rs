//! Logic gates as fixed single-neuron models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::activation::step;
use crate::error::SimError;

/// Weights of a perceptron computing `step(w1·x1 + w2·x2 + bias)`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GateWeights {
    pub w1: f64,
    pub w2: f64,
    pub bias: f64,
}

/// One row of a truth table
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TruthRow {
    pub inputs: [u8; 2],
    pub output: u8,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicGate {
    #[default]
    And,
    Or,
    Nand,
    Xor,
}

const INPUTS: [[u8; 2]; 4] = [[0, 0], [0, 1], [1, 0], [1, 1]];

impl LogicGate {
    pub const ALL: [LogicGate; 4] = [LogicGate::And, LogicGate::Or, LogicGate::Nand, LogicGate::Xor];

    pub fn name(self) -> &'static str {
        match self {
            LogicGate::And => "AND",
            LogicGate::Or => "OR",
            LogicGate::Nand => "NAND",
            LogicGate::Xor => "XOR",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LogicGate::And => "Output 1 only when both inputs are 1",
            LogicGate::Or => "Output 1 when either or both inputs are 1",
            LogicGate::Nand => "Output 0 only when both inputs are 1",
            LogicGate::Xor => "Output 1 when inputs differ; not linearly separable",
        }
    }

    fn expected(self, a: u8, b: u8) -> u8 {
        let (a, b) = (a != 0, b != 0);
        let out = match self {
            LogicGate::And => a && b,
            LogicGate::Or => a || b,
            LogicGate::Nand => !(a && b),
            LogicGate::Xor => a != b,
        };
        out as u8
    }

    /// All four input pairs with the expected output
    pub fn truth_table(self) -> [TruthRow; 4] {
        INPUTS.map(|inputs| TruthRow {
            inputs,
            output: self.expected(inputs[0], inputs[1]),
        })
    }

    /// Perceptron weights solving the gate; XOR has none
    pub fn weights(self) -> Option<GateWeights> {
        match self {
            LogicGate::And => Some(GateWeights { w1: 0.5, w2: 0.5, bias: -0.8 }),
            LogicGate::Or => Some(GateWeights { w1: 0.5, w2: 0.5, bias: -0.3 }),
            LogicGate::Nand => Some(GateWeights { w1: -0.5, w2: -0.5, bias: 0.8 }),
            LogicGate::Xor => None,
        }
    }

    pub fn is_linearly_separable(self) -> bool {
        self.weights().is_some()
    }

    /// Output for binary inputs: through the perceptron when the gate has
    /// weights, otherwise looked up in the truth table. Inputs with no row
    /// in the table give 0.
    pub fn evaluate(self, x1: u8, x2: u8) -> u8 {
        match self.weights() {
            Some(GateWeights { w1, w2, bias }) => {
                step(w1 * f64::from(x1) + w2 * f64::from(x2) + bias) as u8
            }
            None => self
                .truth_table()
                .iter()
                .find(|row| row.inputs == [x1, x2])
                .map_or(0, |row| row.output),
        }
    }
}

impl fmt::Display for LogicGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicGate {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicGate::ALL
            .into_iter()
            .find(|gate| gate.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SimError::InvalidInput(format!("unknown gate '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perceptron_gates_match_truth_tables() {
        for gate in [LogicGate::And, LogicGate::Or, LogicGate::Nand] {
            for row in gate.truth_table() {
                assert_eq!(
                    gate.evaluate(row.inputs[0], row.inputs[1]),
                    row.output,
                    "{gate} failed on {:?}",
                    row.inputs
                );
            }
        }
    }

    #[test]
    fn test_xor_has_no_weights() {
        assert!(LogicGate::Xor.weights().is_none());
        assert!(!LogicGate::Xor.is_linearly_separable());
        let outputs: Vec<u8> = LogicGate::Xor.truth_table().iter().map(|r| r.output).collect();
        assert_eq!(outputs, vec![0, 1, 1, 0]);
        assert_eq!(LogicGate::Xor.evaluate(1, 0), 1);
        assert_eq!(LogicGate::Xor.evaluate(1, 1), 0);
    }

    #[test]
    fn test_xor_non_binary_inputs() {
        assert_eq!(LogicGate::Xor.evaluate(2, 0), 0);
        assert_eq!(LogicGate::Xor.evaluate(0, 7), 0);
    }

    #[test]
    fn test_no_single_line_solves_xor() {
        // coarse search over weights: every candidate gets at least one row wrong
        let grid: Vec<f64> = (-10..=10).map(|i| i as f64 * 0.2).collect();
        for &w1 in &grid {
            for &w2 in &grid {
                for &bias in &grid {
                    let solves = LogicGate::Xor.truth_table().iter().all(|row| {
                        let z = w1 * f64::from(row.inputs[0]) + w2 * f64::from(row.inputs[1]) + bias;
                        step(z) as u8 == row.output
                    });
                    assert!(!solves, "XOR solved by ({w1}, {w2}, {bias})");
                }
            }
        }
    }

    #[test]
    fn test_parse_gate() {
        assert_eq!("nand".parse::<LogicGate>().unwrap(), LogicGate::Nand);
        assert_eq!("XOR".parse::<LogicGate>().unwrap(), LogicGate::Xor);
        assert!("NOR".parse::<LogicGate>().is_err());
    }
}
