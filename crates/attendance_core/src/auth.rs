//! crates/attendance_core/src/auth.rs
//!
//! Credential verification and user registration.
//!
//! Login failures are collapsed into a single `None` so callers cannot tell an
//! unknown email from a wrong password, and an unknown email still pays for one
//! hash verification.

use std::sync::Arc;

use crate::domain::User;
use crate::ports::{CredentialHasher, PortError, PortResult, UserRepository};

/// Result of a registration form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    PasswordMismatch,
    MissingFields,
    EmailTaken,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    dummy_hash: String,
}

impl AuthService {
    /// Builds the service. Hashes a throwaway password once so that lookups of
    /// unknown emails can verify against something.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> PortResult<Self> {
        let dummy_hash = hasher.hash("timing-equaliser")?;
        Ok(Self {
            users,
            hasher,
            dummy_hash,
        })
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> PortResult<Option<User>> {
        if password.is_empty() {
            return Ok(None);
        }

        match self.users.find_by_email(email).await? {
            Some(creds) if self.hasher.verify(password, &creds.password_hash) => {
                Ok(Some(creds.to_user()))
            }
            Some(_) => Ok(None),
            None => {
                let _ = self.hasher.verify(password, &self.dummy_hash);
                Ok(None)
            }
        }
    }

    /// Returns `false` when the email is already registered.
    pub async fn register_user(&self, email: &str, password: &str) -> PortResult<bool> {
        if self.users.email_exists(email).await? {
            return Ok(false);
        }

        let password_hash = self.hasher.hash(password)?;
        match self.users.insert_user(email, &password_hash).await {
            Ok(_) => Ok(true),
            // Lost a race against a concurrent registration of the same email.
            Err(PortError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Full registration form flow. Input checks run before any store access.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> PortResult<RegistrationOutcome> {
        if password != confirm_password {
            return Ok(RegistrationOutcome::PasswordMismatch);
        }
        if email.trim().is_empty() || password.is_empty() {
            return Ok(RegistrationOutcome::MissingFields);
        }

        if self.register_user(email, password).await? {
            Ok(RegistrationOutcome::Registered)
        } else {
            Ok(RegistrationOutcome::EmailTaken)
        }
    }
}
