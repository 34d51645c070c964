use clap::{Arg, Command};

pub const ARG_CORS_ORIGIN: &str = "cors-origin";

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_CORS_ORIGIN)
            .long("cors-origin")
            .help("Comma-separated list of allowed browser origins")
            .env("REGISTRO_CORS_ORIGINS")
            .default_value(DEFAULT_ORIGINS),
    )
}

#[derive(Debug)]
pub struct Options {
    pub origins: Vec<String>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &clap::ArgMatches) -> Self {
        let origins = matches
            .get_one::<String>(ARG_CORS_ORIGIN)
            .map(String::as_str)
            .unwrap_or(DEFAULT_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        Self { origins }
    }
}
