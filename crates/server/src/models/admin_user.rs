//! Admin user domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sentra_core::{AdminRole, AdminUserId};

/// An admin account. The password hash is never part of this type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: AdminUserId,
    pub username: String,
    pub name: String,
    pub role: AdminRole,
    /// Offices this admin may see. Ignored for super admins.
    pub allowed_offices: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new admin account.
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: AdminRole,
    pub allowed_offices: Vec<String>,
    pub is_active: bool,
}

/// Partial update of an admin account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AdminUserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub role: Option<AdminRole>,
    pub allowed_offices: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
