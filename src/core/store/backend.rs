//! Store selection from the project configuration.

use tracing::debug;

use super::{EnvFile, SecretStore, UserSecrets};
use crate::core::config::{ProjectConfig, SecretsKind};
use crate::core::constants;

/// Store for a resolved project configuration.
///
/// `env` uses the configured path or `.env`; `dotnet` passes the configured
/// path to the tool as `--project`.
pub fn for_project(config: &ProjectConfig) -> Box<dyn SecretStore> {
    match config.kind {
        SecretsKind::Env => {
            let path = config
                .local_path()
                .unwrap_or_else(|| constants::ENV_FILE.into());
            debug!(path = %path.display(), "using env file store");
            Box::new(EnvFile::new(path))
        }
        SecretsKind::Dotnet => {
            debug!(project = ?config.local_path(), "using user-secrets store");
            Box::new(UserSecrets::new(config.local_path()))
        }
    }
}
