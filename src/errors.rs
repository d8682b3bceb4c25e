//! Errors raised by the command layer and their process exit codes
use crate::cli::resolver::{ResolveError, EXIT_USAGE};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("too many arguments, only one search query allowed")]
    TooManyQueries,

    #[error("no PostgreSQL installation found, specify a pg_config path or pg version to get more details")]
    NoInstallation,
}

/// Exit code for a failed command, taken from the first cause that carries one
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ResolveError>())
        .map(ResolveError::exit_code)
        .unwrap_or(EXIT_USAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::postgres::ProbeError;
    use crate::cli::resolver::EXIT_PG_CONFIG;
    use anyhow::Context;

    #[test]
    fn exit_code_follows_root_cause() {
        let err: anyhow::Error = ResolveError::PgConfig {
            path: "/nowhere/pg_config".to_string(),
            source: ProbeError::NotFound("/nowhere/pg_config".to_string()),
        }
        .into();
        assert_eq!(exit_code(&err), EXIT_PG_CONFIG);

        let wrapped = Err::<(), _>(ResolveError::ConflictingTarget)
            .context("failed to resolve target")
            .unwrap_err();
        assert_eq!(exit_code(&wrapped), EXIT_USAGE);

        let usage: anyhow::Error = UsageError::TooManyQueries.into();
        assert_eq!(exit_code(&usage), EXIT_USAGE);
    }
}
