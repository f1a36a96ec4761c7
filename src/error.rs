//! Error types for injection and configuration.
//!
//! Shape mismatches and out-of-range `Field` access are contract
//! violations and panic; only caller-supplied input that can reasonably
//! be wrong at runtime is reported through these enums.

use std::error::Error;
use std::fmt;

/// Rejected call to [`Solver::inject`](crate::Solver::inject).
/// Nothing is written to the solver when one of these is returned.
#[derive(Clone, Debug, PartialEq)]
pub enum InjectError {
    /// Cell lies outside the padded grid `[0, n + 1]^2`.
    OutOfRange {
        x: usize,
        y: usize,
        /// Interior side length of the grid.
        n: usize,
    },
    /// One of the amounts or direction components is NaN or infinite.
    NonFinite {
        /// Name of the offending argument.
        what: &'static str,
        value: f64,
    },
}

impl fmt::Display for InjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { x, y, n } => {
                write!(f, "cell ({x}, {y}) outside grid [0, {}]^2", n + 1)
            }
            Self::NonFinite { what, value } => {
                write!(f, "non-finite {what} ({value}) rejected")
            }
        }
    }
}

impl Error for InjectError {}

/// Failure to load or parse a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Io(std::io::Error),
    /// The file is not valid YAML for [`Config`](crate::config::Config).
    Parse(serde_yaml::Error),
    /// The file parsed but holds a value the solver cannot run with.
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid config value '{field}': {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}
