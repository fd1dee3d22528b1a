use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

/// The name of the cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "admin_session";

/// Writes, reads and clears the session cookie.
#[derive(Clone, Copy, Debug)]
pub struct CookieTransport {
    secure: bool,
}

impl CookieTransport {
    /// Creates a new `CookieTransport`.
    ///
    /// `secure` controls the `Secure` attribute and should only be off for
    /// local development over plain HTTP.
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    fn build(&self, value: String, max_age_secs: i64) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, value);
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_max_age(Duration::seconds(max_age_secs));
        cookie
    }

    /// Returns the raw token presented by the client, if any.
    pub fn read(&self, cookies: &Cookies) -> Option<String> {
        cookies
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Sets the session cookie to `token`.
    pub fn set(&self, cookies: &Cookies, token: String, ttl_secs: i64) {
        cookies.add(self.build(token, ttl_secs));
    }

    /// Tells the client to drop the session cookie.
    ///
    /// The token value itself stays valid until it expires.
    pub fn clear(&self, cookies: &Cookies) {
        cookies.add(self.build(String::new(), 0));
    }
}
