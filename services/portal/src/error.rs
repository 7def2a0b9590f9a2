//! services/portal/src/error.rs
//!
//! Errors that can stop the portal from starting or serving.

use crate::config::ConfigError;
use attendance_core::ports::PortError;

/// Everything `main` can fail with. Request handlers never return this; they
/// map failures to a status code themselves.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Raised while building the services, e.g. the start-up dummy hash.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Opening the SQLite pool failed.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Binding the listener or serving connections failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_failures_name_their_cause() {
        let err: ApiError = ConfigError::MissingVar("DATABASE_URL".to_string()).into();
        assert!(err.to_string().starts_with("Configuration error:"));

        let err: ApiError = PortError::Unexpected("Failed to hash password".to_string()).into();
        assert!(err.to_string().contains("Failed to hash password"));
    }
}
