/*!
The persisted session: one opaque bearer token in one cookie.

There is no client-side expiry tracking; a token lives until logout or
until the API rejects it, at which point whoever observed the rejection
clears it.
*/
use axum_extra::extract::cookie::{Cookie, CookieJar};

/// Name of the cookie the token is stored under.
pub const TOKEN_COOKIE: &str = "aduni_token";

/// Explicit handle on the session, built per request from the cookie jar
/// and passed by reference to whatever needs to read it. Only the login,
/// logout, and auth-failure paths write it.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    token: Option<String>,
}

impl SessionStore {
    pub fn from_jar(jar: &CookieJar) -> SessionStore {
        let token = jar.get(TOKEN_COOKIE).map(|c| c.value().to_owned());
        SessionStore { token }
    }

    pub fn get(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Jar with the token cookie set; created on successful login.
    pub fn set(jar: CookieJar, token: &str) -> CookieJar {
        let mut cookie = Cookie::new(TOKEN_COOKIE, token.to_owned());
        cookie.set_path("/");
        cookie.set_http_only(true);
        jar.add(cookie)
    }

    /// Jar with the token cookie removed; logout and observed auth
    /// failures both land here.
    pub fn clear(jar: CookieJar) -> CookieJar {
        let mut cookie = Cookie::new(TOKEN_COOKIE, "");
        cookie.set_path("/");
        jar.remove(cookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    #[test]
    fn token_lifecycle() {
        ensure_logging();

        let jar = CookieJar::new();
        assert!(SessionStore::from_jar(&jar).get().is_none());

        let jar = SessionStore::set(jar, "opaque-token-value");
        assert_eq!(
            SessionStore::from_jar(&jar).get(),
            Some("opaque-token-value")
        );

        let jar = SessionStore::clear(jar);
        assert!(SessionStore::from_jar(&jar).get().is_none());
    }
}
