//! Settings repository.
//!
//! Settings are a flat key/value table. Values are stored as text and
//! interpreted by [`crate::models::StoreSettings`].

use std::collections::BTreeMap;

use sqlx::PgPool;

use super::RepositoryError;

/// Repository for settings database operations.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All settings as a key/value map. NULL values read as empty strings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_all(&self) -> Result<BTreeMap<String, String>, RepositoryError> {
        let rows: Vec<(String, Option<String>)> =
            sqlx::query_as("SELECT key, value FROM settings ORDER BY key")
                .fetch_all(self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(key, value)| (key, value.unwrap_or_default()))
            .collect())
    }

    /// Insert or overwrite a setting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO settings (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Upsert several settings, one statement per key.
    ///
    /// Keys are written in order and independently: on failure the keys
    /// before the failing one stay written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on the first failing upsert.
    pub async fn set_many(&self, entries: &[(String, String)]) -> Result<(), RepositoryError> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }

    /// Insert a setting only if the key is not present yet.
    ///
    /// Returns whether a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_if_absent(&self, key: &str, value: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
