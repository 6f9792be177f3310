//! Admin user repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use sentra_core::{AdminRole, AdminUserId};

use super::{RepositoryError, map_unique_violation};
use crate::models::{AdminUser, AdminUserChanges, NewAdminUser};

const ADMIN_COLUMNS: &str =
    "id, username, name, role, allowed_offices, is_active, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    username: String,
    name: String,
    role: AdminRole,
    allowed_offices: Option<Json<Vec<String>>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AdminUserRow> for AdminUser {
    fn from(row: AdminUserRow) -> Self {
        Self {
            id: AdminUserId::new(row.id),
            username: row.username,
            name: row.name,
            role: row.role,
            allowed_offices: row.allowed_offices.map(|Json(o)| o).unwrap_or_default(),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all admin users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_users ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an admin user by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the stored password hash for a username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(&self, username: &str) -> Result<Option<String>, RepositoryError> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT password FROM admin_users WHERE username = $1")
                .bind(username)
                .fetch_optional(self.pool)
                .await?;

        Ok(hash)
    }

    /// Create a new admin user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn create(&self, user: &NewAdminUser) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            r"
            INSERT INTO admin_users (username, password, name, role, allowed_offices, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ADMIN_COLUMNS}
            "
        ))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .bind(Json(&user.allowed_offices))
        .bind(user.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username"))?;

        Ok(row.into())
    }

    /// Apply a partial update. Returns `None` when no admin has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new username is taken.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        id: AdminUserId,
        changes: &AdminUserChanges,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            r"
            UPDATE admin_users
            SET username = COALESCE($2, username),
                password = COALESCE($3, password),
                name = COALESCE($4, name),
                role = COALESCE($5, role),
                allowed_offices = COALESCE($6, allowed_offices),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ADMIN_COLUMNS}
            "
        ))
        .bind(id.as_i32())
        .bind(changes.username.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.name.as_deref())
        .bind(changes.role)
        .bind(changes.allowed_offices.as_ref().map(Json))
        .bind(changes.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username"))?;

        Ok(row.map(Into::into))
    }

    /// Delete an admin user. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: AdminUserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of admin accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Replace the password hash for a username and reactivate the account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no admin has this username.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn reset_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE admin_users
            SET password = $2, is_active = TRUE, updated_at = NOW()
            WHERE username = $1
            ",
        )
        .bind(username)
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
