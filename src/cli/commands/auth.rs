use anyhow::{Context, Result};
use clap::{Arg, Command};

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_JWT_EXPIRES_HOURS: &str = "jwt-expires-hours";
pub const ARG_SEED_USERNAME: &str = "seed-username";
pub const ARG_SEED_PASSWORD: &str = "seed-password";

const DEFAULT_ACCESS_TTL_HOURS: i64 = 24;

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long("jwt-secret")
                .help("Symmetric signing key for access tokens")
                .env("JWT_SECRET")
                .required(true),
        )
        .arg(
            Arg::new(ARG_JWT_EXPIRES_HOURS)
                .long("jwt-expires-hours")
                .help("Access token TTL in hours (default: 24, also on unparsable values)")
                .env("JWT_EXPIRES_HOURS")
                .allow_hyphen_values(true)
                .default_value("24"),
        )
        .arg(
            Arg::new(ARG_SEED_USERNAME)
                .long("seed-username")
                .help("Username for the first user, created only when the users table is empty")
                .env("REGISTRO_SEED_USERNAME"),
        )
        .arg(
            Arg::new(ARG_SEED_PASSWORD)
                .long("seed-password")
                .help("Password for the seed user")
                .env("REGISTRO_SEED_PASSWORD"),
        )
}

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: String,
    pub access_ttl_hours: i64,
    pub seed_username: Option<String>,
    pub seed_password: Option<String>,
}

impl Options {
    /// Extract auth options from parsed CLI matches.
    ///
    /// # Errors
    /// Returns an error if the JWT secret is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .cloned()
            .context("missing required argument: --jwt-secret")?;

        // Unparsable or non-positive TTLs fall back to the default rather than
        // refusing to start.
        let access_ttl_hours = matches
            .get_one::<String>(ARG_JWT_EXPIRES_HOURS)
            .and_then(|hours| hours.trim().parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_ACCESS_TTL_HOURS);

        Ok(Self {
            jwt_secret,
            access_ttl_hours,
            seed_username: matches.get_one::<String>(ARG_SEED_USERNAME).cloned(),
            seed_password: matches.get_one::<String>(ARG_SEED_PASSWORD).cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_from(args: &[&str]) -> clap::ArgMatches {
        let mut argv = vec![
            "registro",
            "--dsn",
            "postgres://localhost/registro",
            "--jwt-secret",
            "secret",
        ];
        argv.extend_from_slice(args);
        crate::cli::commands::new().get_matches_from(argv)
    }

    #[test]
    fn ttl_defaults_to_24_hours() {
        temp_env::with_vars([("JWT_EXPIRES_HOURS", None::<&str>)], || {
            let options = Options::parse(&matches_from(&[])).expect("options");
            assert_eq!(options.access_ttl_hours, 24);
        });
    }

    #[test]
    fn ttl_unparsable_falls_back_to_default() {
        temp_env::with_vars([("JWT_EXPIRES_HOURS", None::<&str>)], || {
            let options =
                Options::parse(&matches_from(&["--jwt-expires-hours", "not-a-number"]))
                    .expect("options");
            assert_eq!(options.access_ttl_hours, 24);

            let options = Options::parse(&matches_from(&["--jwt-expires-hours", "-3"]))
                .expect("options");
            assert_eq!(options.access_ttl_hours, 24);
        });
    }

    #[test]
    fn ttl_parses_custom_hours() {
        temp_env::with_vars([("JWT_EXPIRES_HOURS", None::<&str>)], || {
            let options =
                Options::parse(&matches_from(&["--jwt-expires-hours", "48"])).expect("options");
            assert_eq!(options.access_ttl_hours, 48);
        });
    }

    #[test]
    fn seed_credentials_default_to_none() {
        temp_env::with_vars(
            [
                ("REGISTRO_SEED_USERNAME", None::<&str>),
                ("REGISTRO_SEED_PASSWORD", None::<&str>),
            ],
            || {
                let options = Options::parse(&matches_from(&[])).expect("options");
                assert_eq!(options.seed_username, None);
                assert_eq!(options.seed_password, None);
            },
        );
    }
}
