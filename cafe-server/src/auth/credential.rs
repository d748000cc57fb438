//! Staff credentials
//!
//! One admin account whose password is kept as an argon2 PHC string.

use thiserror::Error;

use crate::core::Config;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("ADMIN_PASSWORD_HASH is not a valid PHC string: {0}")]
    InvalidHash(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("ADMIN_PASSWORD_HASH must be set in production")]
    MissingHash,
}

/// Checks staff logins
pub trait CredentialStore: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> bool;
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Single admin account from configuration
pub struct StaticCredentialStore {
    email: String,
    password_hash: String,
}

impl StaticCredentialStore {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Result<Self, CredentialError> {
        let password_hash = password_hash.into();
        argon2::PasswordHash::new(&password_hash)
            .map_err(|e| CredentialError::InvalidHash(e.to_string()))?;
        Ok(Self {
            email: email.into(),
            password_hash,
        })
    }

    /// Hash a plain password now
    pub fn from_password(email: impl Into<String>, password: &str) -> Result<Self, CredentialError> {
        let password_hash =
            hash_password(password).map_err(|e| CredentialError::Hashing(e.to_string()))?;
        Ok(Self {
            email: email.into(),
            password_hash,
        })
    }

    /// `ADMIN_PASSWORD_HASH`, else `ADMIN_PASSWORD` (development only), else a
    /// generated development password printed to the log
    pub fn from_config(config: &Config) -> Result<Self, CredentialError> {
        if let Some(hash) = &config.admin_password_hash {
            return Self::new(&config.admin_email, hash.as_str());
        }
        if config.is_production() {
            return Err(CredentialError::MissingHash);
        }
        match &config.admin_password {
            Some(password) => Self::from_password(&config.admin_email, password),
            None => {
                let password = shared::util::numeric_code(8);
                tracing::warn!(
                    email = %config.admin_email,
                    "No admin password configured, generated development password: {password}"
                );
                Self::from_password(&config.admin_email, &password)
            }
        }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn verify(&self, email: &str, password: &str) -> bool {
        // hash check runs even on email mismatch
        let password_ok = verify_password(password, &self.password_hash);
        email.trim().eq_ignore_ascii_case(&self.email) && password_ok
    }
}
