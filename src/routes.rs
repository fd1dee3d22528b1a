use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// The largest login body accepted.
const AUTH_BODY_LIMIT: usize = 16 * 1024;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️  Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Builds the application router.
///
/// # Arguments
///
/// * `state` - The application state.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/session", get(handlers::auth::session))
        .route("/auth/logout", post(handlers::auth::logout))
        .layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .nest_service("/admin", ServeDir::new(&state.config.admin_dir))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    Router::new()
        .merge(auth_routes)
        .merge(admin_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors_layer(&state.config.allowed_origins))
        .fallback_service(ServeDir::new(&state.config.public_dir))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{app, session_cookie_from, state, valid_token};
    use axum::body::Body;
    use http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn admin_page(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/admin/index.html");
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("admin_session={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn admin_pages_are_gated() {
        let res = app(state(true)).oneshot(admin_page(None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_pages_pass_with_a_session() {
        let state = state(true);
        let token = valid_token(&state);

        let res = app(state).oneshot(admin_page(Some(&token))).await.unwrap();
        // The fixture directory is empty, so the gate is passed and the file is missing.
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(session_cookie_from(&res).is_some());
    }

    #[tokio::test]
    async fn public_site_needs_no_session() {
        let res = app(state(true))
            .oneshot(Request::builder().uri("/about").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(session_cookie_from(&res).is_none());
    }

    #[tokio::test]
    async fn login_body_is_capped() {
        let body = format!(r#"{{"email":"{}","password":"x"}}"#, "a".repeat(32 * 1024));
        let res = app(state(true))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(res.status().is_client_error());
        assert!(session_cookie_from(&res).is_none());
    }
}
