//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),

    /// `check` found problems; they have already been printed.
    #[error("{0} problem(s) found")]
    ProblemsFound(usize),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::ProblemsFound(_) => crate::exitcode::DATAERR,
            CliError::Infra(InfraError::Application(app)) => match app {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
                ApplicationError::Document { .. } | ApplicationError::EmptyTree(_) => {
                    crate::exitcode::DATAERR
                }
                ApplicationError::Domain(DomainError::NodeNotFound(_)) => crate::exitcode::USAGE,
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_length_mismatch_then_data_error_exit_code() {
        let err: CliError =
            ApplicationError::Domain(DomainError::LengthMismatch { keys: 2, values: 1 }).into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(
            err.to_string(),
            "attribute sequences differ in length: 2 keys, 1 values"
        );
    }

    #[test]
    fn given_unknown_path_then_usage_exit_code() {
        let err: CliError =
            ApplicationError::Domain(DomainError::NodeNotFound("/x".into())).into();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }
}
