use crate::config::{AdminIdentityConfig, AdminSecret};
use crate::error::{AppError, Result};
use crate::models::session::{ADMIN_ROLE, UserIdentity};
use crate::validation::auth::require_credentials;
use argon2::{
    password_hash::{self, PasswordHash, PasswordVerifier},
    Argon2,
};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Verifies a password against an Argon2 PHC hash.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The hash to verify against.
///
/// # Returns
///
/// `Ok(false)` on a mismatch. Any other Argon2 failure is an internal error.
fn verify_password(password: &[u8], hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;

    match Argon2::default().verify_password(password, &parsed_hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!("Argon2 verify error: {}", e))),
    }
}

/// Checks submitted credentials against the configured admin identity.
#[derive(Clone, Debug)]
pub struct CredentialVerifier {
    admin: AdminIdentityConfig,
}

impl CredentialVerifier {
    /// Creates a new `CredentialVerifier`.
    pub fn new(admin: AdminIdentityConfig) -> Self {
        Self { admin }
    }

    /// Verifies an email/password pair.
    ///
    /// # Arguments
    ///
    /// * `email` - The submitted email, if any.
    /// * `password` - The submitted password, if any.
    ///
    /// # Returns
    ///
    /// The admin `UserIdentity` if the pair matches.
    pub async fn verify(&self, email: Option<&str>, password: Option<&str>) -> Result<UserIdentity> {
        let (email, password) = require_credentials(email, password)?;

        let email_matches: bool = email.as_bytes().ct_eq(self.admin.email.as_bytes()).into();

        // The secret is always checked so a wrong email costs as much as a wrong password.
        let password_matches = match &self.admin.secret {
            AdminSecret::Argon2(hash) => {
                let hash = hash.clone();
                let password = Zeroizing::new(password.as_bytes().to_vec());
                tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                    .await
                    .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))??
            }
            AdminSecret::Plain(secret) => password.as_bytes().ct_eq(secret.as_bytes()).into(),
        };

        if !(email_matches && password_matches) {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("✅ Admin authenticated: {}", self.admin.user_id);

        Ok(UserIdentity {
            user_id: self.admin.user_id.clone(),
            email: self.admin.email.clone(),
            role: ADMIN_ROLE.to_string(),
            display_name: self.admin.display_name.clone(),
        })
    }
}
