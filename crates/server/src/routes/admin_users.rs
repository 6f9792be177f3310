//! Admin account management. Super admins only.

use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use sentra_core::{AdminRole, AdminUserId};

use crate::db::{AdminUserRepository, RepositoryError};
use crate::error::{ApiJson, AppError, Result};
use crate::middleware::RequireSuperAdmin;
use crate::models::{AdminUserChanges, CurrentAdmin, NewAdminUser};
use crate::services::auth::hash_password;
use crate::state::AppState;

const USERNAME_TAKEN: &str = "Username sudah digunakan";
const NOT_FOUND: &str = "Admin tidak ditemukan";

/// Build the admin users router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/admin-users",
        get(list_admins)
            .post(create_admin)
            .put(update_admin)
            .delete(delete_admin),
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn map_conflict(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::Conflict(_) => AppError::Conflict(USERNAME_TAKEN.to_string()),
        other => other.into(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAdminRequest {
    username: Option<String>,
    password: Option<String>,
    name: Option<String>,
    role: Option<AdminRole>,
    allowed_offices: Option<Vec<String>>,
    is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAdminRequest {
    id: Option<AdminUserId>,
    username: Option<String>,
    password: Option<String>,
    name: Option<String>,
    role: Option<AdminRole>,
    allowed_offices: Option<Vec<String>>,
    is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DeleteAdminRequest {
    id: Option<AdminUserId>,
}

/// A super admin may not take away their own super admin role.
fn is_self_demotion(current: &CurrentAdmin, id: AdminUserId, role: Option<AdminRole>) -> bool {
    current.id == id && role.is_some_and(|r| r != AdminRole::SuperAdmin)
}

/// GET /api/admin-users - All admin accounts, without password hashes.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn list_admins(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
) -> Result<Json<Value>> {
    let users = AdminUserRepository::new(state.pool()).list_all().await?;
    Ok(Json(json!({ "success": true, "data": users })))
}

/// POST /api/admin-users - Create an admin account.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn create_admin(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    ApiJson(body): ApiJson<CreateAdminRequest>,
) -> Result<Json<Value>> {
    let (Some(username), Some(password), Some(name)) = (
        non_blank(body.username),
        non_blank(body.password),
        non_blank(body.name),
    ) else {
        return Err(AppError::BadRequest(
            "Username, password, dan nama wajib diisi".to_string(),
        ));
    };

    let users = AdminUserRepository::new(state.pool());
    if users.get_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let created = users
        .create(&NewAdminUser {
            username,
            password_hash: hash_password(&password)?,
            name,
            role: body.role.unwrap_or_default(),
            allowed_offices: body.allowed_offices.unwrap_or_default(),
            is_active: body.is_active.unwrap_or(true),
        })
        .await
        .map_err(map_conflict)?;

    info!(new_admin_id = %created.id, username = %created.username, role = %created.role, "Admin user created");
    Ok(Json(json!({ "success": true, "message": "Admin berhasil ditambahkan" })))
}

/// PUT /api/admin-users - Partially update an admin account.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn update_admin(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    ApiJson(body): ApiJson<UpdateAdminRequest>,
) -> Result<Json<Value>> {
    let id = body
        .id
        .ok_or_else(|| AppError::BadRequest("ID wajib diisi".to_string()))?;

    if is_self_demotion(&admin, id, body.role) {
        return Err(AppError::BadRequest(
            "Tidak bisa mengubah role diri sendiri".to_string(),
        ));
    }

    let users = AdminUserRepository::new(state.pool());
    let username = non_blank(body.username);
    if let Some(username) = &username
        && let Some(existing) = users.get_by_username(username).await?
        && existing.id != id
    {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let password_hash = non_blank(body.password)
        .map(|p| hash_password(&p))
        .transpose()?;

    let changes = AdminUserChanges {
        username,
        password_hash,
        name: non_blank(body.name),
        role: body.role,
        allowed_offices: body.allowed_offices,
        is_active: body.is_active,
    };

    let updated = users
        .update(id, &changes)
        .await
        .map_err(map_conflict)?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    info!(target_admin_id = %updated.id, "Admin user updated");
    Ok(Json(json!({ "success": true, "message": "Admin berhasil diperbarui" })))
}

/// DELETE /api/admin-users - Delete an admin account other than your own.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn delete_admin(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    ApiJson(body): ApiJson<DeleteAdminRequest>,
) -> Result<Json<Value>> {
    let id = body
        .id
        .ok_or_else(|| AppError::BadRequest("ID wajib diisi".to_string()))?;

    if id == admin.id {
        return Err(AppError::BadRequest(
            "Tidak bisa menghapus akun sendiri".to_string(),
        ));
    }

    if !AdminUserRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    info!(target_admin_id = %id, "Admin user deleted");
    Ok(Json(json!({ "success": true, "message": "Admin berhasil dihapus" })))
}
