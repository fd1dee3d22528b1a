use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The only role the admin principal can hold.
pub const ADMIN_ROLE: &str = "admin";

/// The identity handed to callers once a session is authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub display_name: String,
}

/// Represents an admin session.
///
/// The record is self-contained: its encoded form travels in the session
/// cookie and no copy is kept server-side. Logging out therefore only tells
/// the client to drop the cookie; a copied token stays valid until
/// `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionRecord {
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub display_name: String,
    /// Random correlation value assigned at login, kept across renewals.
    pub session_id: String,
    /// Absolute expiry instant. Only ever moved forward.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Creates a record for `identity` expiring `ttl` after `now`.
    ///
    /// `None` if the expiry falls outside the representable date range.
    pub fn new(
        identity: UserIdentity,
        session_id: String,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        Some(Self {
            user_id: identity.user_id,
            email: identity.email,
            role: identity.role,
            display_name: identity.display_name,
            session_id,
            expires_at: now.checked_add_signed(ttl)?,
        })
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            display_name: self.display_name.clone(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Returns the record with its expiry slid to `now + ttl`.
    ///
    /// The new expiry is always strictly later than the old one, even if the
    /// clock has not advanced (or went backwards) since the last renewal.
    /// `None` once that expiry can no longer be represented.
    pub fn renewed(&self, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let floor = self.expires_at.checked_add_signed(Duration::milliseconds(1))?;
        let slid = now.checked_add_signed(ttl)?;
        Some(Self {
            expires_at: slid.max(floor),
            ..self.clone()
        })
    }

    /// A well-formed record carries a non-empty identity and session id.
    pub fn is_well_formed(&self) -> bool {
        !self.user_id.is_empty()
            && !self.email.is_empty()
            && !self.role.is_empty()
            && !self.session_id.is_empty()
    }
}
