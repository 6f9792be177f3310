//! HTTP route handlers.
//!
//! ## Public
//!
//! - `GET /api/products`, `GET /api/batch-status`
//! - `POST /api/checkout`, `POST /api/check-order`
//! - `POST /api/auth/login`, `GET /api/auth/logout`
//!
//! ## Admin (cookie token)
//!
//! - `POST/PUT/DELETE /api/products`
//! - `GET/PUT/DELETE /api/orders`, `POST /api/followup`
//! - `GET/PUT /api/settings`
//! - `GET/POST/PUT/DELETE /api/admin-users` (super admin)
//! - `/admin/*` pages

pub mod admin_pages;
pub mod admin_users;
pub mod auth;
pub mod batch;
pub mod check_order;
pub mod checkout;
pub mod followup;
pub mod health;
pub mod orders;
pub mod products;
pub mod settings;

use axum::{Router, middleware::from_fn};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
        .merge(batch::router())
        .merge(checkout::router())
        .merge(check_order::router())
        .merge(orders::router())
        .merge(followup::router())
        .merge(settings::router())
        .merge(admin_users::router())
}

/// Build the full application: health checks, API, admin pages and optional
/// public assets, wrapped in request-id and trace layers.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let config = state.config();

    let mut router = Router::new()
        .merge(health::router())
        .merge(routes())
        .merge(admin_pages::router(&config.admin_dir, state.clone()));

    if let Some(public_dir) = &config.public_dir {
        router = router.fallback_service(ServeDir::new(public_dir));
    }

    router
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        surface = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
