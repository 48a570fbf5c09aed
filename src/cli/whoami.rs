//! Whoami command - show the credentials in use.

use crate::cli::{context, output, ConnectionArgs};
use crate::core::config::Credentials;
use crate::error::Result;

/// Print the server, masked token and key dotsync would connect with.
pub fn execute(connection: &ConnectionArgs) -> Result<()> {
    let path = Credentials::default_path()?;
    let credentials = context::credentials(connection)?;
    let not_set = "(not set)".to_string();

    output::kv("server", credentials.server.as_ref().unwrap_or(&not_set));
    output::kv(
        "token",
        credentials
            .token
            .as_deref()
            .map(output::mask)
            .unwrap_or_else(|| not_set.clone()),
    );
    output::kv("key", credentials.key.as_ref().unwrap_or(&not_set));
    output::kv("config", path.display());

    if credentials.server.is_none() {
        output::hint("run: dotsync configure");
    }
    Ok(())
}
