use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised before a simulation starts. Once inputs are validated the
/// trial loop itself cannot fail.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl SimulationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        SimulationError::InvalidParameter(message.into())
    }
}

/// Errors raised while turning a finished simulation into files.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataframe error: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("plotting error: {0}")]
    Plot(String),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let error = SimulationError::invalid("n_trials must be at least 1");

        assert_eq!(error.to_string(), "invalid parameter: n_trials must be at least 1");
    }

    #[test]
    fn test_io_error_converts_into_report_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: ReportError = io.into();

        assert!(matches!(error, ReportError::Io(_)));
        assert!(error.to_string().contains("missing"));
    }
}
