use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// The minimum length of a signing key in bytes.
pub const MIN_KEY_SIZE: usize = 32;
/// The size of an HMAC-SHA256 tag in bytes.
pub const TAG_SIZE: usize = 32;

/// A secret key used to authenticate session tokens.
#[derive(Clone)]
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    /// Creates a new `SigningKey`.
    ///
    /// Returns `None` when the key is shorter than [`MIN_KEY_SIZE`].
    pub fn new(key: Zeroizing<Vec<u8>>) -> Option<Self> {
        (key.len() >= MIN_KEY_SIZE).then_some(Self(key))
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.0).expect("HMAC can accept any key length")
    }

    /// Computes the tag of `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; TAG_SIZE] {
        let mut mac = self.mac();
        mac.update(message);
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        tag
    }

    /// Checks `tag` against `message` in constant time.
    pub fn verify(&self, message: &[u8], tag: &[u8]) -> bool {
        let mut mac = self.mac();
        mac.update(message);
        mac.verify_slice(tag).is_ok()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> SigningKey {
        SigningKey::new(Zeroizing::new(vec![byte; MIN_KEY_SIZE])).unwrap()
    }

    #[test]
    fn rejects_short_keys() {
        assert!(SigningKey::new(Zeroizing::new(vec![0u8; MIN_KEY_SIZE - 1])).is_none());
    }

    #[test]
    fn verifies_own_tags_only() {
        let tag = key(1).sign(b"payload");

        assert!(key(1).verify(b"payload", &tag));
        assert!(!key(1).verify(b"payloae", &tag));
        assert!(!key(2).verify(b"payload", &tag));
        assert!(!key(1).verify(b"payload", &tag[..TAG_SIZE - 1]));
    }
}
