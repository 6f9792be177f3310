//! Request correlation.
//!
//! Every request gets an `x-request-id`. A well-formed upstream ID (from the
//! reverse proxy) is kept; anything else is replaced by a fresh UUID v4. The
//! ID and the store surface the path belongs to are recorded on the span,
//! tagged on the Sentry scope and echoed in the response headers.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID accepted as-is.
const MAX_UPSTREAM_LEN: usize = 64;

/// Which part of the store a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Admin HTML pages under `/admin`.
    AdminPage,
    /// Admin-only JSON endpoints.
    AdminApi,
    /// Public storefront JSON endpoints.
    StoreApi,
    /// Health checks.
    Health,
    /// Static storefront assets.
    Static,
}

impl Surface {
    const ADMIN_API_PREFIXES: [&'static str; 4] = [
        "/api/orders",
        "/api/followup",
        "/api/admin-users",
        "/api/settings",
    ];

    /// Classify a request path.
    ///
    /// Product writes share `/api/products` with the public catalog and are
    /// tagged as storefront traffic.
    #[must_use]
    pub fn of(path: &str) -> Self {
        if path == "/admin" || path.starts_with("/admin/") {
            Self::AdminPage
        } else if path.starts_with("/health") {
            Self::Health
        } else if Self::ADMIN_API_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
        {
            Self::AdminApi
        } else if path.starts_with("/api/") {
            Self::StoreApi
        } else {
            Self::Static
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdminPage => "admin_page",
            Self::AdminApi => "admin_api",
            Self::StoreApi => "store_api",
            Self::Health => "health",
            Self::Static => "static",
        }
    }
}

/// The upstream request ID if it is short printable ASCII, else a new UUID.
#[must_use]
pub fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_UPSTREAM_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that ensures every request carries a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());
    let surface = Surface::of(request.uri().path());

    let span = Span::current();
    span.record("request_id", request_id.as_str());
    span.record("surface", surface.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
        scope.set_tag("surface", surface.as_str());
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
