//! Reversible encoding of a [`SessionRecord`] into the cookie value.
//!
//! `Plain` is base64url of the JSON record and carries no integrity check:
//! anyone who knows the format can mint a token. `Signed` appends an
//! HMAC-SHA256 tag over the payload and is verified before anything is parsed.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use thiserror::Error;

use crate::crypto::signing::SigningKey;
use crate::models::session::SessionRecord;

/// Cookies larger than this are rejected by browsers anyway.
pub const MAX_TOKEN_LEN: usize = 4096;

/// Why a token could not be turned back into a session.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token is empty or too long")]
    BadLength,

    #[error("token structure is malformed")]
    Malformed,

    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token tag does not match its payload")]
    BadSignature,

    #[error("token payload is not a session record: {0}")]
    Payload(String),

    #[error("token payload is missing identity fields")]
    Incomplete,
}

/// Encodes and decodes session tokens.
#[derive(Clone, Debug)]
pub enum TokenCodec {
    /// Unauthenticated encoding. Not tamper-evident.
    Plain,
    /// Payload followed by an HMAC tag: `<payload>.<tag>`.
    Signed(SigningKey),
}

impl TokenCodec {
    /// Serializes `record` into a cookie-safe string. Deterministic.
    pub fn encode(&self, record: &SessionRecord) -> String {
        // A record is plain strings and a timestamp; serializing it cannot fail.
        let json = sonic_rs::to_vec(record).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);

        match self {
            TokenCodec::Plain => payload,
            TokenCodec::Signed(key) => {
                let tag = key.sign(payload.as_bytes());
                format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(tag))
            }
        }
    }

    /// Parses a token back into the record it was built from.
    pub fn decode(&self, token: &str) -> Result<SessionRecord, DecodeError> {
        if token.is_empty() || token.len() > MAX_TOKEN_LEN {
            return Err(DecodeError::BadLength);
        }

        let payload = match self {
            TokenCodec::Plain => token,
            TokenCodec::Signed(key) => {
                let (payload, tag) = token.split_once('.').ok_or(DecodeError::Malformed)?;
                let tag = URL_SAFE_NO_PAD.decode(tag)?;
                if !key.verify(payload.as_bytes(), &tag) {
                    return Err(DecodeError::BadSignature);
                }
                payload
            }
        };

        let json = URL_SAFE_NO_PAD.decode(payload)?;
        let record: SessionRecord = sonic_rs::from_slice(&json)
            .map_err(|e| DecodeError::Payload(e.to_string()))?;

        if !record.is_well_formed() {
            return Err(DecodeError::Incomplete);
        }

        Ok(record)
    }
}
