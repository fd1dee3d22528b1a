use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::{resume_session, unauthenticated},
    models::session::UserIdentity,
    state::AppState,
};

/// The request payload for admin login.
///
/// Both fields are optional here so that an absent field is reported as
/// missing credentials rather than a body rejection.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserIdentity,
}

/// The response payload for a live session.
#[derive(Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: UserIdentity,
}

/// The response payload for logout.
#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Handles admin login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(|e| {
        tracing::debug!("Login body rejected: {}", e);
        AppError::Validation("Invalid request body".to_string())
    })?;

    tracing::info!("🔐 Admin login attempt");

    let identity = state
        .verifier
        .verify(payload.email.as_deref(), payload.password.as_deref())
        .await?;

    let record = state.sessions.issue(identity.clone(), Utc::now())?;
    state.cookies.set(
        &cookies,
        state.sessions.encode(&record),
        state.config.session_ttl_seconds,
    );

    tracing::info!("✅ Admin logged in: {}", identity.user_id);

    let response = LoginResponse {
        success: true,
        user: identity,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Reports whether the caller holds a live admin session, renewing it if so.
#[axum::debug_handler]
pub async fn session(State(state): State<AppState>, cookies: Cookies) -> Response {
    match resume_session(&state, &cookies) {
        Some(user) => {
            let response = SessionResponse {
                authenticated: true,
                user,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => unauthenticated(),
    }
}

/// Handles admin logout.
///
/// Only the cookie is cleared. There is no server-side session to revoke,
/// so a copy of the token keeps working until it expires.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Response {
    state.cookies.clear(&cookies);

    tracing::info!("👋 Admin session cookie cleared");

    (StatusCode::OK, Json(LogoutResponse { success: true })).into_response()
}
