//! Shared fixtures for handler and middleware tests.

use axum::{Router, body::Body, http::Response};
use chrono::Utc;
use http::header;
use tower_cookies::Cookie;
use zeroize::Zeroizing;

use crate::config::{AdminSecret, Config};
use crate::crypto::signing::SigningKey;
use crate::models::session::{ADMIN_ROLE, UserIdentity};
use crate::services::credentials::tests::{PASSWORD, admin};
use crate::services::cookie::SESSION_COOKIE;
use crate::state::AppState;

pub fn config(cookie_secure: bool) -> Config {
    Config {
        admin: admin(AdminSecret::Plain(Zeroizing::new(PASSWORD.into()))),
        session_ttl_seconds: crate::config::DEFAULT_SESSION_TTL_SECONDS,
        session_signing_key: SigningKey::new(Zeroizing::new(vec![0x42; 32])),
        cookie_secure,
        bind_addr: ([127, 0, 0, 1], 0).into(),
        allowed_origins: vec!["http://localhost:3000".into()],
        public_dir: "does-not-exist/public".into(),
        admin_dir: "does-not-exist/admin".into(),
    }
}

pub fn state(cookie_secure: bool) -> AppState {
    AppState::new(&config(cookie_secure))
}

pub fn app(state: AppState) -> Router {
    crate::routes::router(state)
}

/// A freshly issued, encoded session token.
pub fn valid_token(state: &AppState) -> String {
    let admin = &state.config.admin;
    let identity = UserIdentity {
        user_id: admin.user_id.clone(),
        email: admin.email.clone(),
        role: ADMIN_ROLE.to_string(),
        display_name: admin.display_name.clone(),
    };
    let record = state.sessions.issue(identity, Utc::now()).unwrap();
    state.sessions.encode(&record)
}

/// The `admin_session` cookie set by a response, if any.
pub fn session_cookie_from(res: &Response<Body>) -> Option<Cookie<'static>> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value.to_string()).ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE)
}
