//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin user
//! sentra-cli admin create -u kasir1 -n "Kasir Satu" -r admin -o "Kantor A,Kantor B"
//!
//! # Reset a password (also reactivates the account)
//! sentra-cli admin reset-password -u admin -p 'new password'
//! ```
//!
//! # Environment Variables
//!
//! - `SENTRA_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `ADMIN_PASSWORD` - Password used when `-p` is omitted

use secrecy::{ExposeSecret, SecretString};
use sentra_core::AdminRole;
use sentra_server::db::{AdminUserRepository, RepositoryError};
use sentra_server::models::NewAdminUser;
use sentra_server::services::auth::{AuthError, hash_password};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Neither `-p` nor `ADMIN_PASSWORD` was given.
    #[error("No password given: pass -p or set ADMIN_PASSWORD")]
    MissingPassword,

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin")]
    InvalidRole(String),

    /// User already exists.
    #[error("Admin user already exists with username: {0}")]
    UserExists(String),

    /// No user with this username.
    #[error("No admin user with username: {0}")]
    UserNotFound(String),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] AuthError),
}

fn resolve_password(password: Option<String>) -> Result<SecretString, AdminError> {
    password
        .or_else(|| std::env::var("ADMIN_PASSWORD").ok())
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
        .ok_or(AdminError::MissingPassword)
}

/// Create a new admin user.
///
/// # Returns
///
/// The ID of the created admin user.
pub async fn create_user(
    username: &str,
    name: &str,
    role: &str,
    password: Option<String>,
    offices: Vec<String>,
) -> Result<i32, AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;

    let pool = connect().await?;
    let password = resolve_password(password)?;
    let repo = AdminUserRepository::new(&pool);

    tracing::info!("Creating admin user: {} ({})", username, role);

    let user = repo
        .create(&NewAdminUser {
            username: username.to_owned(),
            password_hash: hash_password(password.expose_secret())?,
            name: name.to_owned(),
            role,
            allowed_offices: offices,
            is_active: true,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(username.to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Username: {}, Role: {}",
        user.id,
        user.username,
        user.role
    );

    Ok(user.id.as_i32())
}

/// Replace an admin's password and reactivate the account.
pub async fn reset_password(username: &str, password: Option<String>) -> Result<(), AdminError> {
    let pool = connect().await?;
    let password = resolve_password(password)?;

    AdminUserRepository::new(&pool)
        .reset_password(username, &hash_password(password.expose_secret())?)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UserNotFound(username.to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(username, "Password reset; account is active");
    Ok(())
}
