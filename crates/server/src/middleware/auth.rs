//! Authentication middleware and extractors for admin.
//!
//! The admin token travels in the `admin_token` cookie. API handlers use the
//! [`RequireAdminAuth`] and [`RequireSuperAdmin`] extractors. Admin pages are
//! protected by [`admin_guard`], which redirects instead of returning JSON.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::models::CurrentAdmin;
use crate::services::auth::{TOKEN_TTL_SECS, TokenSigner};
use crate::state::AppState;

/// Cookie holding the signed admin token.
pub const ADMIN_TOKEN_COOKIE: &str = "admin_token";

/// Admin pages live under this prefix.
pub const ADMIN_PREFIX: &str = "/admin";

/// Login page. Always reachable.
pub const LOGIN_PATH: &str = "/admin/login";

/// Pages only super admins may open. Matches the path and anything below it.
pub const SUPER_ADMIN_PATHS: &[&str] = &["/admin/users"];

/// Build the cookie set on login.
#[must_use]
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((ADMIN_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(TOKEN_TTL_SECS))
        .build()
}

/// Build the cookie that clears the token on logout.
#[must_use]
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((ADMIN_TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Resolve the admin from the request cookie, if the token is valid.
#[must_use]
pub fn current_admin(headers: &HeaderMap, tokens: &TokenSigner) -> Option<CurrentAdmin> {
    let jar = CookieJar::from_headers(headers);
    let token = jar.get(ADMIN_TOKEN_COOKIE)?.value();
    if token.is_empty() {
        return None;
    }

    match tokens.validate(token, Utc::now()) {
        Ok(admin) => Some(admin),
        Err(e) => {
            debug!(error = %e, "Rejected admin token");
            None
        }
    }
}

/// `302 Found` redirect.
#[must_use]
pub fn redirect_found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

fn json_rejection(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

/// Extractor that requires admin authentication.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but no valid token was sent.
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        json_rejection(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let admin = current_admin(&parts.headers, state.tokens()).ok_or(AdminAuthRejection)?;
        crate::error::set_sentry_user(&admin.id, &admin.username);
        Ok(Self(admin))
    }
}

/// Extractor that requires super admin authentication.
///
/// Missing or invalid token gives 401; a valid token without the
/// `super_admin` role gives 403.
pub struct RequireSuperAdmin(pub CurrentAdmin);

/// Error returned when super admin authentication is required.
pub enum SuperAdminRejection {
    /// No valid token.
    Unauthorized,
    /// Admin is not a super admin.
    Forbidden,
}

impl IntoResponse for SuperAdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => json_rejection(StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::Forbidden => json_rejection(StatusCode::FORBIDDEN, "Akses ditolak"),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SuperAdminRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let admin = current_admin(&parts.headers, state.tokens())
            .ok_or(SuperAdminRejection::Unauthorized)?;

        if !admin.is_super_admin() {
            return Err(SuperAdminRejection::Forbidden);
        }

        crate::error::set_sentry_user(&admin.id, &admin.username);
        Ok(Self(admin))
    }
}

/// Outcome of the admin page guard for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccess {
    /// Not an admin page, or the login page.
    PassThrough,
    /// No valid token.
    RedirectLogin,
    /// Authenticated but not allowed on this page.
    RedirectHome,
    /// Authenticated and allowed.
    Allow,
}

fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Decide what the admin page guard does for `path`.
#[must_use]
pub fn admin_access(path: &str, admin: Option<&CurrentAdmin>) -> AdminAccess {
    if !is_under(path, ADMIN_PREFIX) || path.trim_end_matches('/') == LOGIN_PATH {
        return AdminAccess::PassThrough;
    }

    let Some(admin) = admin else {
        return AdminAccess::RedirectLogin;
    };

    let super_only = SUPER_ADMIN_PATHS.iter().any(|prefix| is_under(path, prefix));
    if super_only && !admin.is_super_admin() {
        return AdminAccess::RedirectHome;
    }

    AdminAccess::Allow
}

/// Middleware protecting the admin pages.
///
/// Redirects to the login page without a valid token and to the admin home
/// for super-admin pages opened by a regular admin. On success the resolved
/// [`CurrentAdmin`] is inserted into the request extensions.
pub async fn admin_guard(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let admin = current_admin(request.headers(), state.tokens());

    match admin_access(&path, admin.as_ref()) {
        AdminAccess::PassThrough => next.run(request).await,
        AdminAccess::RedirectLogin => redirect_found(LOGIN_PATH),
        AdminAccess::RedirectHome => redirect_found(ADMIN_PREFIX),
        AdminAccess::Allow => {
            if let Some(admin) = admin {
                request.extensions_mut().insert(admin);
            }
            next.run(request).await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sentra_core::{AdminRole, AdminUserId};

    use super::*;

    fn admin(role: AdminRole) -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::new(1),
            username: "ops".to_string(),
            name: "Ops".to_string(),
            role,
            allowed_offices: Vec::new(),
        }
    }

    #[test]
    fn test_non_admin_paths_pass_through() {
        for path in ["/", "/api/products", "/administrator", "/admins"] {
            assert_eq!(admin_access(path, None), AdminAccess::PassThrough, "{path}");
        }
    }

    #[test]
    fn test_login_page_is_public() {
        assert_eq!(admin_access("/admin/login", None), AdminAccess::PassThrough);
        assert_eq!(admin_access("/admin/login/", None), AdminAccess::PassThrough);
    }

    #[test]
    fn test_admin_pages_require_token() {
        for path in ["/admin", "/admin/", "/admin/orders", "/admin/users"] {
            assert_eq!(admin_access(path, None), AdminAccess::RedirectLogin, "{path}");
        }
    }

    #[test]
    fn test_users_page_is_super_admin_only() {
        let regular = admin(AdminRole::Admin);
        assert_eq!(
            admin_access("/admin/users", Some(&regular)),
            AdminAccess::RedirectHome
        );
        assert_eq!(
            admin_access("/admin/users/3", Some(&regular)),
            AdminAccess::RedirectHome
        );
        assert_eq!(
            admin_access("/admin/orders", Some(&regular)),
            AdminAccess::Allow
        );
        assert_eq!(
            admin_access("/admin/usersettings", Some(&regular)),
            AdminAccess::Allow
        );

        let super_admin = admin(AdminRole::SuperAdmin);
        assert_eq!(
            admin_access("/admin/users", Some(&super_admin)),
            AdminAccess::Allow
        );
    }

    #[test]
    fn test_session_cookie_attributes() {
        let header = session_cookie("abc.def".to_string()).to_string();
        assert!(header.starts_with("admin_token=abc.def"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Strict"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=604800"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let header = removal_cookie().to_string();
        assert!(header.starts_with("admin_token="));
        assert!(header.contains("Max-Age=0"));
    }

    #[test]
    fn test_current_admin_from_cookie_header() {
        let tokens = TokenSigner::new(secrecy::SecretString::from(
            "kT9#mQ2$vX7!pL4@wR8&nB3*cF6^hJ1%",
        ));
        let token = tokens.generate(&admin(AdminRole::Admin), Utc::now()).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            format!("theme=dark; admin_token={token}").parse().unwrap(),
        );
        assert_eq!(
            current_admin(&headers, &tokens),
            Some(admin(AdminRole::Admin))
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            "admin_token=forged.0000".parse().unwrap(),
        );
        assert_eq!(current_admin(&headers, &tokens), None);
        assert_eq!(current_admin(&HeaderMap::new(), &tokens), None);
    }
}
