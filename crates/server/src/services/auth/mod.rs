//! Admin authentication.
//!
//! Passwords are hashed with Argon2id. Logged-in admins carry a signed token
//! (see [`token`]) rather than a server-side session.

mod error;
pub mod token;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{info, instrument};

pub use error::AuthError;
pub use token::{TOKEN_TTL_SECS, TokenSigner};

use crate::db::AdminUserRepository;
use crate::models::{AdminUser, NewAdminUser};
use sentra_core::AdminRole;

/// Authentication service.
pub struct AuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(users: AdminUserRepository<'a>) -> Self {
        Self { users }
    }

    /// Check a username/password pair.
    ///
    /// Unknown users, deactivated users and wrong passwords are
    /// indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the login is rejected.
    /// Returns `AuthError::Repository` if the lookup fails.
    #[instrument(skip(self, password))]
    pub async fn validate_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let hash = self
            .users
            .get_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &hash)?;

        Ok(user)
    }

    /// Create the first super admin when no admin accounts exist.
    ///
    /// Returns the created account, or `None` if admins already exist.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::Repository` if the database calls fail.
    #[instrument(skip(self, password))]
    pub async fn bootstrap_super_admin(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<Option<AdminUser>, AuthError> {
        if self.users.count().await? > 0 {
            return Ok(None);
        }

        let user = self
            .users
            .create(&NewAdminUser {
                username: username.to_string(),
                password_hash: hash_password(password)?,
                name: name.to_string(),
                role: AdminRole::SuperAdmin,
                allowed_offices: Vec::new(),
                is_active: true,
            })
            .await?;

        info!(username = %user.username, "Bootstrapped first super admin");
        Ok(Some(user))
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC-format hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or unparseable hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("rahasia-kasir").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("rahasia-kasir", &hash).is_ok());
        assert!(matches!(
            verify_password("salah", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_legacy_encoded_password_is_rejected() {
        // Base64 of "admin123", as stored by older deployments.
        assert!(matches!(
            verify_password("admin123", "YWRtaW4xMjM="),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
