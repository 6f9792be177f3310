//! Batch window status.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use sentra_core::BatchStatus;

use crate::db::SettingsRepository;
use crate::error::Result;
use crate::models::StoreSettings;
use crate::state::AppState;

/// Build the batch status router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/batch-status", get(batch_status))
}

#[derive(Debug, Serialize)]
struct BatchStatusResponse {
    success: bool,
    data: BatchStatusData,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct BatchStatusData {
    active: bool,
    name: String,
    /// Stored values, echoed back as written.
    start: String,
    end: String,
    status: BatchStatus,
    is_open: bool,
}

impl BatchStatusData {
    fn from_settings(settings: StoreSettings, now: chrono::DateTime<Utc>) -> Self {
        let status = settings.batch.status_at(now);
        Self {
            active: settings.batch.active,
            name: settings.batch_name,
            start: settings.batch_start_raw,
            end: settings.batch_end_raw,
            status,
            is_open: status.is_open(),
        }
    }
}

/// GET /api/batch-status - Current state of the checkout window.
#[instrument(skip(state))]
async fn batch_status(State(state): State<AppState>) -> Result<Json<BatchStatusResponse>> {
    let map = SettingsRepository::new(state.pool()).get_all().await?;
    let settings = StoreSettings::from_map(&map, state.config().utc_offset);

    Ok(Json(BatchStatusResponse {
        success: true,
        data: BatchStatusData::from_settings(settings, Utc::now()),
    }))
}
