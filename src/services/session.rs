//! Admin session lifecycle: issue on login, validate-and-renew on every
//! authenticated request, lapse on anything else.
//!
//! There is no server-side session table. All state lives in the token, so
//! validation is a pure function of the token and the current time.

use chrono::{DateTime, Duration, Utc};

use crate::crypto::session_id::generate_session_id;
use crate::error::{AppError, Result};
use crate::models::session::{SessionRecord, UserIdentity};
use crate::services::token::TokenCodec;

/// Result of presenting a (possibly absent) token.
///
/// Absent, undecodable and expired tokens all collapse into
/// `Unauthenticated`; the reason is only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated {
        identity: UserIdentity,
        renewed: SessionRecord,
    },
}

#[derive(Clone, Debug)]
pub struct SessionManager {
    codec: TokenCodec,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(codec: TokenCodec, ttl: Duration) -> Self {
        Self { codec, ttl }
    }

    /// Starts a new session for a verified identity.
    pub fn issue(&self, identity: UserIdentity, now: DateTime<Utc>) -> Result<SessionRecord> {
        let record = SessionRecord::new(identity, generate_session_id(), now, self.ttl)
            .ok_or_else(|| AppError::Internal("Session expiry out of range".to_string()))?;
        tracing::debug!("🔑 Issued session for user {}", record.user_id);
        Ok(record)
    }

    /// Checks a presented token and slides its expiry on success.
    pub fn validate(&self, token: Option<&str>, now: DateTime<Utc>) -> SessionState {
        let Some(token) = token else {
            tracing::debug!("No session cookie presented");
            return SessionState::Unauthenticated;
        };

        let record = match self.codec.decode(token) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("❌ Session token rejected: {}", e);
                return SessionState::Unauthenticated;
            }
        };

        if record.is_expired(now) {
            tracing::debug!("❌ Session expired for user {}", record.user_id);
            return SessionState::Unauthenticated;
        }

        let Some(renewed) = record.renewed(now, self.ttl) else {
            tracing::debug!("❌ Session expiry cannot be extended for user {}", record.user_id);
            return SessionState::Unauthenticated;
        };

        SessionState::Authenticated {
            identity: renewed.identity(),
            renewed,
        }
    }

    /// Encodes a record for the cookie.
    pub fn encode(&self, record: &SessionRecord) -> String {
        self.codec.encode(record)
    }
}
