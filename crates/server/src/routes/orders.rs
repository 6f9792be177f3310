//! Admin order management.
//!
//! Non-super admins only see and touch orders from their allowed offices.
//! Orders outside that scope behave as if they did not exist.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tracing::{info, instrument};

use sentra_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{ApiJson, AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/orders",
        get(list_orders).put(update_order).delete(delete_orders),
    )
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct UpdateOrderRequest {
    id: Option<OrderId>,
    status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "double_option")]
    notes: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct DeleteOrdersRequest {
    id: Option<OrderId>,
    ids: Option<Vec<OrderId>>,
}

impl DeleteOrdersRequest {
    /// Bulk ids win over a single id. `None` when neither is usable.
    fn targets(self) -> Option<Vec<OrderId>> {
        match (self.ids, self.id) {
            (Some(ids), _) if !ids.is_empty() => Some(ids),
            (_, Some(id)) if id.as_i32() != 0 => Some(vec![id]),
            _ => None,
        }
    }
}

/// GET /api/orders - Orders visible to this admin, newest first.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn list_orders(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<Value>> {
    let orders = OrderRepository::new(state.pool())
        .list(admin.allowed_offices())
        .await?;
    Ok(Json(json!({ "success": true, "data": orders })))
}

/// PUT /api/orders - Change status and/or notes.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn update_order(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(body): ApiJson<UpdateOrderRequest>,
) -> Result<Json<Value>> {
    let id = body
        .id
        .ok_or_else(|| AppError::BadRequest("ID wajib diisi".to_string()))?;

    let updated = OrderRepository::new(state.pool())
        .update(id, body.status, body.notes, admin.allowed_offices())
        .await?;
    if !updated {
        return Err(AppError::NotFound("Pesanan tidak ditemukan".to_string()));
    }

    info!(order_id = %id, status = ?body.status, "Order updated");
    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/orders - Delete one order (`id`) or several (`ids`).
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn delete_orders(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(body): ApiJson<DeleteOrdersRequest>,
) -> Result<Json<Value>> {
    let ids = body
        .targets()
        .ok_or_else(|| AppError::BadRequest("No order ID provided".to_string()))?;

    let deleted = OrderRepository::new(state.pool())
        .delete(&ids, admin.allowed_offices())
        .await?;

    info!(requested = ids.len(), deleted, "Orders deleted");
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}
