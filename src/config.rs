use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use anyhow::{Context, Result};
use argon2::password_hash::PasswordHash;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::signing::{MIN_KEY_SIZE, SigningKey};

/// The default session lifetime: 8 hours.
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 8 * 60 * 60;

/// The longest accepted session lifetime: 365 days.
pub const MAX_SESSION_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

/// The admin secret, as provided by the secret store.
#[derive(Clone)]
pub enum AdminSecret {
    /// An Argon2 PHC string.
    Argon2(String),
    /// A plaintext secret.
    Plain(Zeroizing<String>),
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminSecret::Argon2(_) => f.write_str("Argon2(..)"),
            AdminSecret::Plain(_) => f.write_str("Plain(..)"),
        }
    }
}

/// The single administrative identity.
#[derive(Clone, Debug)]
pub struct AdminIdentityConfig {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub secret: AdminSecret,
}

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The admin identity logins are checked against.
    pub admin: AdminIdentityConfig,
    /// The session lifetime in seconds.
    pub session_ttl_seconds: i64,
    /// The key authenticating session tokens. Unsigned tokens when absent.
    pub session_signing_key: Option<SigningKey>,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// The address the server listens on.
    pub bind_addr: SocketAddr,
    /// The origins allowed to make credentialed requests.
    pub allowed_origins: Vec<String>,
    /// The root of the public content site.
    pub public_dir: PathBuf,
    /// The root of the admin pages.
    pub admin_dir: PathBuf,
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} must be a boolean, got {:?}", name, other),
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Creates a new `Config` from an arbitrary variable source.
    ///
    /// # Arguments
    ///
    /// * `var` - Returns the value of a variable, or `None` if unset.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let email = var("ADMIN_EMAIL")
            .filter(|v| !v.trim().is_empty())
            .context("ADMIN_EMAIL must be set")?;

        let secret = match (var("ADMIN_PASSWORD_HASH"), var("ADMIN_PASSWORD")) {
            (Some(hash), _) => {
                PasswordHash::new(&hash)
                    .map_err(|e| anyhow::anyhow!("{}", e))
                    .context("ADMIN_PASSWORD_HASH must be an Argon2 PHC string")?;
                AdminSecret::Argon2(hash)
            }
            (None, Some(password)) if !password.is_empty() => {
                AdminSecret::Plain(Zeroizing::new(password))
            }
            _ => anyhow::bail!("ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set"),
        };

        let session_ttl_seconds: i64 = match var("SESSION_TTL_SECONDS") {
            Some(v) => v.parse().context("Invalid SESSION_TTL_SECONDS")?,
            None => DEFAULT_SESSION_TTL_SECONDS,
        };
        if !(1..=MAX_SESSION_TTL_SECONDS).contains(&session_ttl_seconds) {
            anyhow::bail!(
                "SESSION_TTL_SECONDS must be between 1 and {}",
                MAX_SESSION_TTL_SECONDS
            );
        }

        let session_signing_key = match var("SESSION_SIGNING_KEY") {
            Some(mut key_hex) => {
                let key_bytes = hex::decode(key_hex.trim())
                    .context("SESSION_SIGNING_KEY must be valid hexadecimal");
                key_hex.zeroize();
                let key = SigningKey::new(Zeroizing::new(key_bytes?)).with_context(|| {
                    format!(
                        "SESSION_SIGNING_KEY must be at least {} bytes (generate with: openssl rand -hex 32)",
                        MIN_KEY_SIZE
                    )
                })?;
                Some(key)
            }
            None => None,
        };

        let cookie_secure = match var("COOKIE_SECURE") {
            Some(v) => parse_bool("COOKIE_SECURE", &v)?,
            None => true,
        };

        let allowed_origins: Vec<String> = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
        if allowed_origins.iter().any(|o| o == "*") {
            anyhow::bail!(
                "ALLOWED_ORIGINS must list explicit origins (`*` is not allowed with credentials)"
            );
        }

        Ok(Self {
            admin: AdminIdentityConfig {
                user_id: var("ADMIN_USER_ID").unwrap_or_else(|| "1".to_string()),
                email,
                display_name: var("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                secret,
            },
            session_ttl_seconds,
            session_signing_key,
            cookie_secure,
            bind_addr: var("BIND_ADDR")
                .unwrap_or_else(|| "127.0.0.1:3000".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            allowed_origins,
            public_dir: var("PUBLIC_DIR")
                .unwrap_or_else(|| "files/public".to_string())
                .into(),
            admin_dir: var("ADMIN_DIR")
                .unwrap_or_else(|| "files/admin".to_string())
                .into(),
        })
    }
}
