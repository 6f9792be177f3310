//! Public endpoints that reject bad input before touching the database.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use sentra_integration_tests::{empty_request, json_request, send, test_app};

#[tokio::test]
async fn test_health_is_ok() {
    let app = test_app();
    let res = send(&app, empty_request("GET", "/health", None)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "ok");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let app = test_app();
    let res = send(&app, empty_request("GET", "/health/ready", None)).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = test_app();

    let mut request = empty_request("GET", "/health", None);
    request
        .headers_mut()
        .insert("x-request-id", "req-123".parse().unwrap());
    let res = send(&app, request).await;
    assert_eq!(res.headers["x-request-id"], "req-123");

    let res = send(&app, empty_request("GET", "/health", None)).await;
    assert!(res.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_checkout_requires_all_fields() {
    let app = test_app();
    let body = json!({
        "customerName": "Budi",
        "whatsappNumber": "081234567890",
        "kelompok": "",
        "items": [{"productName": "Paket A", "productType": "paket", "quantity": 1, "price": 50000}],
        "totalAmount": 50000
    });

    let res = send(&app, json_request("POST", "/api/checkout", &body, None)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["message"], "Data tidak lengkap");
}

#[tokio::test]
async fn test_checkout_rejects_empty_items() {
    let app = test_app();
    let body = json!({
        "customerName": "Budi",
        "whatsappNumber": "081234567890",
        "kelompok": "Kantor A",
        "items": [],
        "totalAmount": 0
    });

    let res = send(&app, json_request("POST", "/api/checkout", &body, None)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Data tidak lengkap");
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = test_app();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/checkout")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let res = send(&app, request).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
}

#[tokio::test]
async fn test_check_order_needs_three_characters() {
    let app = test_app();

    for query in [json!("ab"), json!("  a  "), json!(12345), json!(null)] {
        let res = send(
            &app,
            json_request("POST", "/api/check-order", &json!({ "query": query }), None),
        )
        .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "query {query}");
        assert_eq!(res.body["success"], false);
    }
}

#[tokio::test]
async fn test_logout_clears_cookie_and_redirects() {
    let app = test_app();
    let res = send(&app, empty_request("GET", "/api/auth/logout", None)).await;

    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), Some("/admin/login"));

    let cookie = res.headers["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("admin_token="));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_login_page_is_public() {
    let app = test_app();
    let res = send(&app, empty_request("GET", "/admin/login", None)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.as_str().unwrap().contains("/api/auth/login"));
}
