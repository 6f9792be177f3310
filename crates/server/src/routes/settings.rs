//! Admin settings endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::db::SettingsRepository;
use crate::error::{ApiJson, AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(get_settings).put(update_settings))
}

/// Text stored for a submitted JSON value.
///
/// Strings are stored as-is. Arrays are joined with commas and objects
/// are stored as JSON.
fn setting_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(setting_text).collect::<Vec<_>>().join(","),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
    }
}

/// GET /api/settings - All settings as a key/value object.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn get_settings(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<Value>> {
    let settings = SettingsRepository::new(state.pool()).get_all().await?;
    Ok(Json(json!({ "success": true, "data": settings })))
}

/// PUT /api/settings - Upsert every key in the body. Last write wins.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn update_settings(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>> {
    let Value::Object(map) = body else {
        return Err(AppError::BadRequest(
            "Format pengaturan tidak valid".to_string(),
        ));
    };

    let entries: Vec<(String, String)> = map
        .iter()
        .map(|(key, value)| (key.clone(), setting_text(value)))
        .collect();

    SettingsRepository::new(state.pool())
        .set_many(&entries)
        .await?;

    info!(keys = ?entries.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(), "Settings updated");
    Ok(Json(json!({ "success": true })))
}
