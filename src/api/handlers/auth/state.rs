//! Auth configuration, fixed at startup and shared across handlers.

use secrecy::{ExposeSecret, SecretString};

const DEFAULT_ACCESS_TTL_SECONDS: i64 = 24 * 60 * 60;
/// Refresh tokens live for 7 days from issuance.
pub(crate) const REFRESH_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    jwt_secret: SecretString,
    access_ttl_seconds: i64,
    cookie_secure: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_secret: SecretString) -> Self {
        Self {
            jwt_secret,
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_access_ttl_hours(mut self, hours: i64) -> Self {
        self.access_ttl_seconds = hours * 60 * 60;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub(crate) fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }

    pub(crate) fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    pub(super) fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new(SecretString::from("secret".to_string()));
        assert_eq!(config.access_ttl_seconds(), DEFAULT_ACCESS_TTL_SECONDS);
        assert!(!config.cookie_secure());
        assert_eq!(config.jwt_secret(), b"secret");

        let config = config.with_access_ttl_hours(6).with_cookie_secure(true);
        assert_eq!(config.access_ttl_seconds(), 6 * 60 * 60);
        assert!(config.cookie_secure());
    }

    #[test]
    fn refresh_ttl_is_seven_days() {
        assert_eq!(REFRESH_TOKEN_TTL_SECONDS, 604_800);
    }
}
