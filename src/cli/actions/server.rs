use crate::api::{self, handlers::auth::AuthConfig, seed::SeedUser};
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_secret: String,
    pub access_ttl_hours: i64,
    pub cors_origins: Vec<String>,
    pub seed_username: Option<String>,
    pub seed_password: Option<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable, migrations fail, or the
/// server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    // Browsers only send the refresh cookie cross-site over HTTPS; mark it
    // Secure only when every allowed origin is HTTPS, so local HTTP frontends
    // keep working.
    let cookie_secure = !args.cors_origins.is_empty()
        && args
            .cors_origins
            .iter()
            .all(|origin| origin.starts_with("https://"));

    let auth_config = AuthConfig::new(SecretString::from(args.jwt_secret))
        .with_access_ttl_hours(args.access_ttl_hours)
        .with_cookie_secure(cookie_secure);

    let seed_user = match (args.seed_username, args.seed_password) {
        (Some(username), Some(password)) => Some(SeedUser { username, password }),
        _ => None,
    };

    api::new(args.port, args.dsn, auth_config, args.cors_origins, seed_user).await
}
