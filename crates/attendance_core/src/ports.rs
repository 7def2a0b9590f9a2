//! crates/attendance_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the store or the
//! password hashing scheme.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AbsenceSummary, AttendanceRecord, GradeTable, User, UserCredentials, UserId};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, hashing).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact, case-sensitive lookup. `Ok(None)` when no row matches.
    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>>;

    async fn email_exists(&self, email: &str) -> PortResult<bool>;

    /// Inserts a user unless the email is already taken, in which case
    /// `PortError::Conflict` is returned and the store is left untouched.
    async fn insert_user(&self, email: &str, password_hash: &str) -> PortResult<User>;
}

/// The three fixed reporting queries.
#[async_trait]
pub trait RecordsQuery: Send + Sync {
    async fn grades(&self) -> PortResult<GradeTable>;

    async fn attendance_log(&self) -> PortResult<Vec<AttendanceRecord>>;

    async fn absence_summary(&self) -> PortResult<Vec<AbsenceSummary>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a live token to its user. Unknown or expired tokens yield
    /// `PortError::Unauthorized`.
    async fn validate_session(&self, token: &str) -> PortResult<UserId>;

    async fn delete_session(&self, token: &str) -> PortResult<()>;
}

/// Salted, slow password hashing.
pub trait CredentialHasher: Send + Sync {
    /// Hashes with a fresh random salt; the result embeds salt and parameters.
    fn hash(&self, plaintext: &str) -> PortResult<String>;

    /// `false` for a mismatch and for a hash that cannot be parsed.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}
