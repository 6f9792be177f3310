//! Admin login and logout.

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use sentra_core::{AdminRole, AdminUserId};

use crate::db::AdminUserRepository;
use crate::error::{ApiJson, AppError, Result};
use crate::middleware::auth::{LOGIN_PATH, redirect_found, removal_cookie, session_cookie};
use crate::models::CurrentAdmin;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

const INVALID_LOGIN: &str = "Username atau password salah";

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", get(logout))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    success: bool,
    user: LoginUser,
}

#[derive(Debug, Serialize)]
struct LoginUser {
    id: AdminUserId,
    username: String,
    name: String,
    role: AdminRole,
}

/// POST /api/auth/login - Check credentials and set the admin cookie.
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response> {
    let auth = AuthService::new(AdminUserRepository::new(state.pool()));

    let user = match auth.validate_credentials(&body.username, &body.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            return Err(AppError::Unauthorized(INVALID_LOGIN.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let admin = CurrentAdmin::from(&user);
    let token = state.tokens().generate(&admin, Utc::now())?;

    info!(admin_id = %user.id, username = %user.username, "Admin logged in");

    let jar = jar.add(session_cookie(token));
    let body = LoginResponse {
        success: true,
        user: LoginUser {
            id: user.id,
            username: user.username,
            name: user.name,
            role: user.role,
        },
    };

    Ok((jar, ApiJson(body)).into_response())
}

/// GET /api/auth/logout - Clear the cookie and go back to the login page.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(removal_cookie()), redirect_found(LOGIN_PATH))
}
