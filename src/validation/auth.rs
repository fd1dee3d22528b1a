use crate::error::{AppError, Result};

/// Checks that both login fields were supplied.
///
/// # Arguments
///
/// * `email` - The submitted email, if any.
/// * `password` - The submitted password, if any.
///
/// # Returns
///
/// The two fields, or `AppError::MissingCredentials`.
pub fn require_credentials<'a>(
    email: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    match (email, password) {
        (Some(email), Some(password))
            if !email.trim().is_empty() && !password.trim().is_empty() =>
        {
            Ok((email, password))
        }
        _ => Err(AppError::MissingCredentials),
    }
}
