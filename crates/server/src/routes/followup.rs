//! Payment reminders for existing orders.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use sentra_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{ApiJson, AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::services::whatsapp::format_follow_up_message;
use crate::state::AppState;

const SEND_FAILED: &str = "Gagal mengirim pesan. Pastikan WhatsApp Gateway terhubung.";

/// Build the follow-up router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/followup", post(send_follow_up))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FollowUpRequest {
    order_id: Option<OrderId>,
}

/// POST /api/followup - Re-send the order as a payment reminder.
///
/// Works for any status and leaves the order unchanged.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn send_follow_up(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(body): ApiJson<FollowUpRequest>,
) -> Result<Json<Value>> {
    let order_id = body
        .order_id
        .filter(|id| id.as_i32() != 0)
        .ok_or_else(|| AppError::BadRequest("Order ID diperlukan".to_string()))?;

    let order = OrderRepository::new(state.pool())
        .get_by_id(order_id, admin.allowed_offices())
        .await?
        .ok_or_else(|| AppError::NotFound("Pesanan tidak ditemukan".to_string()))?;

    let settings = state.store_settings().await;
    let message = format_follow_up_message(&order);
    let sent = state
        .whatsapp()
        .send_message(
            state.gateway_for(&settings),
            &order.whatsapp_number,
            &message,
        )
        .await;

    if !sent {
        warn!(order_number = %order.order_number, "Follow-up not delivered");
        return Err(AppError::Gateway(SEND_FAILED.to_string()));
    }

    info!(order_number = %order.order_number, "Follow-up sent");
    Ok(Json(json!({
        "success": true,
        "message": "Pesan follow up berhasil dikirim",
        "customerName": order.customer_name,
    })))
}
