//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (propagate or generate `x-request-id`)
//! 4. Admin page guard (only on `/admin` routes)

pub mod auth;
pub mod request_id;

pub use auth::{RequireAdminAuth, RequireSuperAdmin, admin_guard};
pub use request_id::request_id_middleware;
