//! Configure command - save vault credentials.

use std::io::{self, IsTerminal};

use dialoguer::{Input, Password};
use tracing::info;

use crate::cli::{output, ConnectionArgs};
use crate::core::config::Credentials;
use crate::error::Result;

/// Save server, token and key to the user credentials file.
///
/// Values given as flags or environment variables are used as-is; anything
/// missing is prompted for when stdin is a terminal.
pub fn execute(connection: &ConnectionArgs) -> Result<()> {
    let path = Credentials::default_path()?;
    let mut credentials = Credentials::load_from(&path)?;
    let interactive = io::stdin().is_terminal();

    let server = match connection.server.clone() {
        Some(server) => Some(server),
        None if interactive => Some(
            Input::<String>::new()
                .with_prompt("Vault server URL")
                .with_initial_text(credentials.server.clone().unwrap_or_default())
                .interact_text()?,
        ),
        None => None,
    };

    let token = match connection.token.clone() {
        Some(token) => Some(token),
        None if interactive => {
            let token = Password::new()
                .with_prompt("Session token (leave empty to keep)")
                .allow_empty_password(true)
                .interact()?;
            Some(token)
        }
        None => None,
    };

    let key = match connection.key.clone() {
        Some(key) => Some(key),
        None if interactive => Some(
            Input::<String>::new()
                .with_prompt("gpg key id or fingerprint")
                .with_initial_text(credentials.key.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()?,
        ),
        None => None,
    };

    credentials.apply(server, token, key);
    credentials.vault_settings()?;
    credentials.save_to(&path)?;

    info!(path = %path.display(), "credentials saved");
    output::success(&format!(
        "saved credentials to {}",
        output::path(&path.display().to_string())
    ));
    Ok(())
}
