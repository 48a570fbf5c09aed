//! Env file store.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::SecretStore;
use crate::core::domain::SecretSet;
use crate::core::env;
use crate::error::Result;

/// Secrets kept in an env file.
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SecretStore for EnvFile {
    fn fetch_all(&self) -> Result<SecretSet> {
        let secrets = env::read_secrets(&self.path)?;
        debug!(path = %self.path.display(), count = secrets.len(), "read env file");
        Ok(secrets)
    }

    fn apply(&self, secrets: &SecretSet) -> Result<()> {
        let summary = env::merge(&self.path, secrets)?;
        info!(
            path = %self.path.display(),
            updated = summary.updated,
            appended = summary.appended,
            unchanged = summary.unchanged,
            "env file merged"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
