//! Public checkout.
//!
//! The order row is the authoritative result. Sending the WhatsApp
//! confirmation and flagging `wa_sent` happen afterwards as separate steps
//! and never fail the request.

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use sentra_core::{OrderNumber, Rupiah};

use crate::db::OrderRepository;
use crate::error::{ApiJson, AppError, Result};
use crate::models::{NewOrder, OrderItem};
use crate::services::whatsapp::format_order_message;
use crate::state::AppState;

const INCOMPLETE: &str = "Data tidak lengkap";
const BATCH_CLOSED: &str = "Pembelian sedang ditutup. Tidak bisa checkout di luar periode batch.";

/// Build the checkout router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkout", post(checkout))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub kelompok: Option<String>,
    pub items: Option<Vec<OrderItem>>,
    pub total_amount: Option<Rupiah>,
}

/// Validated checkout fields.
#[derive(Debug, PartialEq, Eq)]
struct CheckoutInput {
    customer_name: String,
    whatsapp_number: String,
    kelompok: String,
    items: Vec<OrderItem>,
    total_amount: Rupiah,
}

fn required(value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(INCOMPLETE.to_string()))
}

impl CheckoutRequest {
    fn validate(self) -> Result<CheckoutInput> {
        let customer_name = required(self.customer_name)?;
        let whatsapp_number = required(self.whatsapp_number)?;
        let kelompok = required(self.kelompok)?;
        let items = self
            .items
            .filter(|items| !items.is_empty())
            .ok_or_else(|| AppError::BadRequest(INCOMPLETE.to_string()))?;
        let total_amount = self
            .total_amount
            .ok_or_else(|| AppError::BadRequest(INCOMPLETE.to_string()))?;

        Ok(CheckoutInput {
            customer_name,
            whatsapp_number,
            kelompok,
            items,
            total_amount,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutResponse {
    success: bool,
    order_number: String,
    wa_sent: bool,
    message: &'static str,
}

/// POST /api/checkout - Place an order and try to send the confirmation.
#[instrument(skip_all)]
async fn checkout(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let input = body.validate()?;

    let settings = state.store_settings().await;
    if !settings.batch.permits_checkout_at(Utc::now()) {
        warn!("Checkout rejected outside the batch window");
        return Err(AppError::Forbidden(BATCH_CLOSED.to_string()));
    }

    let order_number = OrderNumber::generate(&state.local_now(), rand::random_range(0..100));
    let orders = OrderRepository::new(state.pool());

    let order = orders
        .create(&NewOrder {
            order_number,
            customer_name: input.customer_name,
            whatsapp_number: input.whatsapp_number,
            kelompok: input.kelompok,
            items: input.items,
            total_amount: input.total_amount,
        })
        .await?;
    info!(order_number = %order.order_number, total = %order.total_amount, "Order created");

    let message = format_order_message(&order, settings.payment_info.as_deref());
    let wa_sent = state
        .whatsapp()
        .send_message(
            state.gateway_for(&settings),
            &order.whatsapp_number,
            &message,
        )
        .await;

    if wa_sent && let Err(e) = orders.mark_wa_sent(&order.order_number).await {
        error!(error = %e, order_number = %order.order_number, "Failed to flag order as notified");
    }

    Ok(Json(CheckoutResponse {
        success: true,
        order_number: order.order_number,
        wa_sent,
        message: if wa_sent {
            "Pesanan berhasil! Detail dikirim ke WhatsApp."
        } else {
            "Pesanan berhasil disimpan."
        },
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(value: serde_json::Value) -> CheckoutRequest {
        serde_json::from_value(value).unwrap_or_else(|e| panic!("{e}"))
    }

    fn complete() -> serde_json::Value {
        json!({
            "customerName": " Budi ",
            "whatsappNumber": "081234567890",
            "kelompok": "Kantor Pusat",
            "items": [{
                "productId": 1,
                "productName": "Paket A",
                "productType": "paket",
                "quantity": 1,
                "price": 50000,
                "items": ["INDOMIE GORENG"]
            }],
            "totalAmount": 50000
        })
    }

    #[test]
    fn test_complete_request_is_trimmed() {
        let input = request(complete()).validate().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(input.customer_name, "Budi");
        assert_eq!(input.total_amount, Rupiah::new(50_000));
        assert_eq!(input.items.len(), 1);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        for field in ["customerName", "whatsappNumber", "kelompok", "items", "totalAmount"] {
            let mut body = complete();
            body.as_object_mut().map(|o| o.remove(field));
            let result = request(body).validate();
            assert!(
                matches!(&result, Err(AppError::BadRequest(m)) if m == INCOMPLETE),
                "missing {field} should be rejected"
            );
        }
    }

    #[test]
    fn test_blank_and_empty_are_rejected() {
        let mut body = complete();
        body["kelompok"] = json!("   ");
        assert!(request(body).validate().is_err());

        let mut body = complete();
        body["items"] = json!([]);
        assert!(request(body).validate().is_err());
    }
}
