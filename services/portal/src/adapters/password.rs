//! services/portal/src/adapters/password.rs
//!
//! Argon2id implementation of the `CredentialHasher` port. Hashes are stored as
//! PHC strings, which carry the salt and cost parameters alongside the digest.
//!
//! Accounts created before the switch to Argon2id still hold bcrypt hashes
//! (`$2a$`, `$2b$`, `$2y$`). Those are verified with bcrypt; new hashes are
//! always Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use attendance_core::ports::{CredentialHasher, PortError, PortResult};
use tracing::{debug, error, warn};

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

fn is_bcrypt(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}

#[derive(Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| {
                error!("Failed to hash password: {:?}", e);
                PortError::Unexpected("Failed to hash password".to_string())
            })?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        if is_bcrypt(hash) {
            debug!("Verifying legacy bcrypt hash");
            return bcrypt::verify(plaintext, hash).unwrap_or_else(|e| {
                warn!("Stored bcrypt hash could not be checked: {:?}", e);
                false
            });
        }

        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stored password hash could not be parsed: {:?}", e);
                return false;
            }
        };
        // Cost parameters come from the PHC string, not from `self.params`.
        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
