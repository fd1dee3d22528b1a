use std::sync::Arc;
use crate::config::Config;
use crate::services::cookie::CookieTransport;
use crate::services::credentials::CredentialVerifier;
use crate::services::session::SessionManager;
use crate::services::token::TokenCodec;

/// The application's state.
///
/// Nothing in here is mutable: every request carries its own session state
/// in the cookie.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// Checks login attempts against the admin identity.
    pub verifier: CredentialVerifier,
    /// Issues and validates sessions.
    pub sessions: SessionManager,
    /// Reads and writes the session cookie.
    pub cookies: CookieTransport,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    pub fn new(config: &Config) -> Self {
        let codec = match &config.session_signing_key {
            Some(key) => {
                tracing::info!("✅ Session tokens are signed (HMAC-SHA256)");
                TokenCodec::Signed(key.clone())
            }
            None => {
                tracing::warn!(
                    "⚠️  SESSION_SIGNING_KEY not set: session tokens are NOT tamper-evident"
                );
                TokenCodec::Plain
            }
        };

        if !config.cookie_secure {
            tracing::warn!("⚠️  COOKIE_SECURE=false: session cookie will be sent over plain HTTP");
        }

        let sessions = SessionManager::new(
            codec,
            chrono::Duration::seconds(config.session_ttl_seconds),
        );

        AppState {
            config: Arc::new(config.clone()),
            verifier: CredentialVerifier::new(config.admin.clone()),
            sessions,
            cookies: CookieTransport::new(config.cookie_secure),
        }
    }
}
