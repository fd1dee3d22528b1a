use rand::RngCore;
use rand::rngs::OsRng;
use base64::{Engine as _, engine::general_purpose};

/// The size of a session id in bytes.
const SESSION_ID_SIZE: usize = 32;

/// Generates a new random session id.
///
/// # Returns
///
/// A URL-safe base64-encoded session id.
pub fn generate_session_id() -> String {
    let mut id = [0u8; SESSION_ID_SIZE];
    OsRng.fill_bytes(&mut id);

    general_purpose::URL_SAFE_NO_PAD.encode(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_url_safe_and_unique() {
        let a = generate_session_id();
        let b = generate_session_id();

        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
