//! dotsync - keep local secrets in sync with a team vault.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dotsync::cli::output;
use dotsync::cli::{execute, Cli, Globals};
use dotsync::error::{ConfigError, Error, StoreError, VaultError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("DOTSYNC_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("dotsync=debug")
        } else {
            EnvFilter::new("dotsync=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let globals = Globals {
        connection: cli.connection,
        timeout: cli.timeout,
    };

    if let Err(e) = execute(cli.command, globals) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

fn suggestion(error: &Error) -> Option<&'static str> {
    match error {
        Error::Config(ConfigError::NotInitialized)
        | Error::Config(ConfigError::MissingField { field: "folder" }) => {
            Some("run: dotsync init")
        }
        Error::Config(ConfigError::MissingField {
            field: "server" | "token",
        })
        | Error::Vault(VaultError::Auth(_)) => Some("run: dotsync configure"),
        Error::Config(ConfigError::MissingField { field: "team" }) => {
            Some("pass --team or set team in .dotsync.toml")
        }
        Error::Store(StoreError::ToolMissing { .. }) => {
            Some("install the .NET SDK or use --type env")
        }
        Error::Vault(VaultError::AmbiguousFolder { .. }) => {
            Some("rename the duplicate folders in the vault")
        }
        Error::Timeout { .. } => Some("raise the budget with --timeout"),
        _ => None,
    }
}
