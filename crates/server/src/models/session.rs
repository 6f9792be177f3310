//! Authenticated admin identity.

use serde::{Deserialize, Serialize};

use sentra_core::{AdminRole, AdminUserId};

use super::admin_user::AdminUser;

/// Identity carried in the admin token.
///
/// Minimal data to identify the logged-in admin and decide what they may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub username: String,
    pub name: String,
    pub role: AdminRole,
    #[serde(default)]
    pub allowed_offices: Vec<String>,
}

impl CurrentAdmin {
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }

    /// Whether this admin may act on orders from `office`.
    #[must_use]
    pub fn can_access_office(&self, office: &str) -> bool {
        self.is_super_admin() || self.allowed_offices.iter().any(|o| o == office)
    }

    /// Offices this admin is limited to, or `None` when unrestricted.
    #[must_use]
    pub fn allowed_offices(&self) -> Option<&[String]> {
        if self.is_super_admin() {
            None
        } else {
            Some(&self.allowed_offices)
        }
    }
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            allowed_offices: user.allowed_offices.clone(),
        }
    }
}
