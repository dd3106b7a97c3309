//! Password hashing for user accounts.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`), so the parameters travel
//! with each hash and can be raised later without invalidating old ones.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use quill_core::domain::UNUSABLE_PASSWORD;
use quill_core::ports::{AuthError, PasswordService};

pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// An account marked with [`UNUSABLE_PASSWORD`] never matches.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        if hash.starts_with(UNUSABLE_PASSWORD) {
            return Ok(false);
        }

        let stored = PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingError(e.to_string())),
        }
    }
}
