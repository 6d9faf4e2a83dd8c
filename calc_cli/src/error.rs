use std::path::PathBuf;

use calc_core::CalcError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("input ended before the form was complete")]
    Aborted,
}

impl CliError {
    /// Process exit code: 2 for an unknown calculator, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Calc(CalcError::NotFound { .. }) => 2,
            _ => 1,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(CalcError::not_found("nope")).exit_code(), 2);
        assert_eq!(CliError::from(CalcError::NoResult).exit_code(), 1);
        assert_eq!(CliError::Aborted.exit_code(), 1);
    }

    #[test]
    fn test_io_error_names_path() {
        let err = CliError::io("missing.json", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.to_string().starts_with("cannot access missing.json"));
    }
}
