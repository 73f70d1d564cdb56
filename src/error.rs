use std::fmt;

/// All errors the simulation engine can report.
///
/// None of them are fatal: each one is local to the evaluation that
/// produced it and leaves any trajectory or optimizer state untouched.
#[derive(Debug)]
pub enum SimError {
    /// Malformed caller input: mismatched or empty sequences, unknown names.
    InvalidInput(String),
    /// A quantity has no finite value for the given parameters.
    NumericDegenerate(String),
    /// A runner was asked to start while its current run is unfinished.
    RunInProgress,
    /// Session configuration could not be parsed.
    Config(String),
    /// An underlying I/O error while loading configuration.
    Io(std::io::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::NumericDegenerate(msg) => write!(f, "numerically degenerate: {msg}"),
            Self::RunInProgress => write!(f, "a run is already in progress"),
            Self::Config(msg) => write!(f, "invalid config: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;
