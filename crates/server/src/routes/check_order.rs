//! Public order lookup by order number or WhatsApp number.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use sentra_core::{OrderNumber, PhoneQuery};

use crate::db::OrderRepository;
use crate::error::{ApiJson, AppError, Result};
use crate::models::{Order, OrderSummary};
use crate::state::AppState;

const QUERY_TOO_SHORT: &str = "Masukkan minimal 3 karakter untuk mencari pesanan";
const MIN_QUERY_CHARS: usize = 3;

/// Build the order lookup router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/check-order", post(check_order))
}

#[derive(Debug, Deserialize)]
struct CheckOrderRequest {
    /// Kept loose so a non-string query gets the same 400 as a short one.
    #[serde(default)]
    query: Value,
}

#[derive(Debug, Serialize)]
struct CheckOrderResponse {
    success: bool,
    orders: Vec<OrderSummary>,
    message: String,
}

/// How a lookup query is interpreted.
#[derive(Debug, PartialEq, Eq)]
enum Lookup {
    OrderNumber(String),
    Phone(PhoneQuery),
}

fn parse_query(raw: &Value) -> Result<Lookup> {
    let query = raw
        .as_str()
        .map(str::trim)
        .filter(|q| q.chars().count() >= MIN_QUERY_CHARS)
        .ok_or_else(|| AppError::BadRequest(QUERY_TOO_SHORT.to_string()))?;

    Ok(if OrderNumber::looks_like(query) {
        Lookup::OrderNumber(OrderNumber::normalize_query(query))
    } else {
        Lookup::Phone(PhoneQuery::parse(query))
    })
}

/// Orders matching a phone query, keeping the input order.
fn filter_by_phone(orders: Vec<Order>, query: &PhoneQuery) -> Vec<Order> {
    orders
        .into_iter()
        .filter(|order| query.matches(&order.whatsapp_number))
        .collect()
}

/// POST /api/check-order - Find orders by number or phone.
#[instrument(skip_all)]
async fn check_order(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckOrderRequest>,
) -> Result<Json<CheckOrderResponse>> {
    let lookup = parse_query(&body.query)?;
    let repo = OrderRepository::new(state.pool());

    let matched = match lookup {
        Lookup::OrderNumber(number) => {
            debug!(order_number = %number, "Looking up order by number");
            repo.find_by_order_number(&number)
                .await?
                .into_iter()
                .collect()
        }
        Lookup::Phone(query) => {
            debug!("Looking up orders by phone");
            filter_by_phone(repo.list(None).await?, &query)
        }
    };

    let message = if matched.is_empty() {
        "Pesanan tidak ditemukan".to_string()
    } else {
        format!("Ditemukan {} pesanan", matched.len())
    };

    Ok(Json(CheckOrderResponse {
        success: true,
        orders: matched.into_iter().map(OrderSummary::from).collect(),
        message,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use sentra_core::{OrderId, OrderStatus, Rupiah};

    use super::*;

    fn order(id: i32, phone: &str) -> Order {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 5, 0, 0).unwrap();
        Order {
            id: OrderId::new(id),
            order_number: format!("SDK-20250101-1200000{id}"),
            customer_name: "Budi".to_string(),
            whatsapp_number: phone.to_string(),
            kelompok: "Kantor Pusat".to_string(),
            items: Vec::new(),
            total_amount: Rupiah::new(0),
            status: OrderStatus::Pending,
            notes: None,
            wa_sent: false,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_short_or_non_string_query_rejected() {
        for query in [json!(null), json!("ab"), json!("  ab  "), json!(12345), json!([])] {
            assert!(
                matches!(parse_query(&query), Err(AppError::BadRequest(m)) if m == QUERY_TOO_SHORT),
                "{query} should be rejected"
            );
        }
    }

    #[test]
    fn test_order_number_query_is_upper_cased() {
        assert_eq!(
            parse_query(&json!(" sdk-20250101-12000001 ")).unwrap(),
            Lookup::OrderNumber("SDK-20250101-12000001".to_string())
        );
    }

    #[test]
    fn test_other_queries_are_phone_lookups() {
        assert!(matches!(
            parse_query(&json!("6281234567890")).unwrap(),
            Lookup::Phone(_)
        ));
    }

    #[test]
    fn test_phone_variants_find_stored_number() {
        let orders = vec![
            order(1, "081234567890"),
            order(2, "0899 1111 2222"),
            order(3, "+62 812-3456-7890"),
        ];

        let Lookup::Phone(query) = parse_query(&json!("6281234567890")).unwrap() else {
            panic!("expected phone lookup");
        };
        let ids: Vec<i32> = filter_by_phone(orders, &query)
            .iter()
            .map(|o| o.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
