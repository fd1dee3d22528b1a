use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tower_cookies::Cookies;

use crate::{
    models::session::UserIdentity,
    services::session::SessionState,
    state::AppState,
};

/// Validates the session cookie and, on success, writes back the renewed token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
///
/// # Returns
///
/// The admin identity if the session is live, `None` otherwise. Why a
/// session was rejected is deliberately not exposed.
pub fn resume_session(state: &AppState, cookies: &Cookies) -> Option<UserIdentity> {
    let token = state.cookies.read(cookies);

    match state.sessions.validate(token.as_deref(), Utc::now()) {
        SessionState::Authenticated { identity, renewed } => {
            state.cookies.set(
                cookies,
                state.sessions.encode(&renewed),
                state.config.session_ttl_seconds,
            );
            Some(identity)
        }
        SessionState::Unauthenticated => None,
    }
}

/// The uniform response for any request without a live session.
pub fn unauthenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(sonic_rs::json!({ "authenticated": false })),
    )
        .into_response()
}

/// A middleware that requires a valid admin session to be present.
///
/// The renewed session cookie is set on the way through and the
/// [`UserIdentity`] is inserted into the request extensions.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking admin session...");

    let Some(identity) = resume_session(&state, &cookies) else {
        tracing::debug!("❌ No live admin session for {}", request.uri().path());
        return unauthenticated();
    };

    tracing::debug!("✅ Admin session renewed for user: {}", identity.user_id);

    request.extensions_mut().insert(identity);

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{session_cookie_from, state, valid_token};
    use axum::{Extension, Router, middleware::from_fn_with_state, routing::get};
    use http::header;
    use tower::ServiceExt;
    use tower_cookies::CookieManagerLayer;

    async fn whoami(Extension(identity): Extension<UserIdentity>) -> String {
        identity.email
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/admin/whoami", get(whoami))
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
            .layer(CookieManagerLayer::new())
    }

    fn request(cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/admin/whoami");
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("admin_session={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn rejects_requests_without_a_session() {
        let state = state(true);
        for cookie in [None, Some("garbage")] {
            let res = app(state.clone()).oneshot(request(cookie)).await.unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            assert!(res.headers().get(header::SET_COOKIE).is_none());

            let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body, serde_json::json!({ "authenticated": false }));
        }
    }

    #[tokio::test]
    async fn passes_identity_and_renews_cookie() {
        let state = state(true);
        let token = valid_token(&state);

        let res = app(state).oneshot(request(Some(&token))).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let cookie = session_cookie_from(&res).expect("renewed session cookie");
        assert!(!cookie.value().is_empty());
        assert_eq!(cookie.max_age().map(|d| d.whole_seconds()), Some(28_800));

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"admin@example.com");
    }
}
