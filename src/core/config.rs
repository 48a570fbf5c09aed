//! Configuration file management.
//!
//! Two files are involved:
//!
//! - `.dotsync.toml` in the project directory: which vault folder to sync,
//!   which local store to use, its path, and the team name
//! - `<config dir>/dotsync/config.toml`: the user's vault server, session
//!   token and gpg key
//!
//! Command-line overrides are applied here by the CLI layer; the core only
//! ever receives a resolved [`ProjectConfig`] value.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Which local store a project keeps its secrets in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretsKind {
    /// `dotnet user-secrets` for the project
    #[default]
    Dotnet,
    /// A .env file
    Env,
}

impl SecretsKind {
    /// Name as used in config files and flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dotnet => "dotnet",
            Self::Env => "env",
        }
    }
}

impl FromStr for SecretsKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dotnet" => Ok(Self::Dotnet),
            "env" => Ok(Self::Env),
            _ => Err(ConfigError::UnsupportedType(s.to_string())),
        }
    }
}

impl std::fmt::Display for SecretsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Project configuration stored in `.dotsync.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Vault folder holding the project's secrets
    #[serde(default)]
    pub folder: String,
    /// Local store type
    #[serde(rename = "type", default)]
    pub kind: SecretsKind,
    /// Env file path (`env`) or project path (`dotnet`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Vault group the project is shared with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// Values given on the command line, applied over the project file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub folder: Option<String>,
    pub kind: Option<SecretsKind>,
    /// Env file, only used with the `env` type
    pub file: Option<String>,
    /// Project path, only used with the `dotnet` type
    pub project: Option<String>,
    pub team: Option<String>,
}

impl ProjectConfig {
    /// Path to the project file in the current directory
    pub fn config_path() -> PathBuf {
        PathBuf::from(constants::PROJECT_FILE)
    }

    /// Check if a project file exists in the current directory
    pub fn exists() -> bool {
        Self::config_path().exists()
    }

    /// Load `.dotsync.toml` from the current directory, if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the file is malformed.
    pub fn load() -> Result<Option<Self>> {
        let path = Self::config_path();
        if !path.exists() {
            debug!("no project file");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Load a project file from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading project config");
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        debug!(folder = %config.folder, kind = %config.kind, "project config loaded");
        Ok(config)
    }

    /// Save to `.dotsync.toml` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving project config");
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply command-line overrides over an optional project file.
    ///
    /// `file` only replaces the path for the `env` type and `project` only
    /// for the `dotnet` type.
    pub fn resolve(file: Option<Self>, overrides: Overrides) -> Self {
        let mut config = file.unwrap_or_default();

        if let Some(team) = overrides.team.filter(|t| !t.is_empty()) {
            config.team = Some(team);
        }
        if let Some(kind) = overrides.kind {
            config.kind = kind;
        }
        let path = match config.kind {
            SecretsKind::Dotnet => overrides.project,
            SecretsKind::Env => overrides.file,
        };
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            config.path = Some(path);
        }
        if let Some(folder) = overrides.folder.filter(|f| !f.is_empty()) {
            config.folder = folder;
        }

        config
    }

    /// Folder name, required by every vault command.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when no folder was configured.
    pub fn require_folder(&self) -> Result<&str> {
        if self.folder.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "folder" }.into());
        }
        Ok(&self.folder)
    }

    /// Team name, required by team and migration commands.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when no team was configured.
    pub fn require_team(&self) -> Result<&str> {
        match self.team.as_deref() {
            Some(team) if !team.trim().is_empty() => Ok(team),
            _ => Err(ConfigError::MissingField { field: "team" }.into()),
        }
    }

    /// Path the local store operates on.
    ///
    /// The `env` type defaults to `.env`; the `dotnet` type defaults to none
    /// (the tool's current directory).
    pub fn local_path(&self) -> Option<PathBuf> {
        match (&self.path, self.kind) {
            (Some(path), _) if !path.is_empty() => Some(PathBuf::from(path)),
            (_, SecretsKind::Env) => Some(PathBuf::from(constants::ENV_FILE)),
            (_, SecretsKind::Dotnet) => None,
        }
    }
}

/// User credentials stored in the user config directory.
#[derive(Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Vault server URL, or `file://<path>` for a local vault
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    /// Pre-issued session token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// gpg key id or fingerprint used for the user's own secrets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("server", &self.server)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("key", &self.key)
            .finish()
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.token.zeroize();
    }
}

/// Settings needed to open a vault connection.
pub struct VaultSettings {
    pub server: String,
    pub token: Zeroizing<String>,
    pub key: Option<String>,
}

impl Credentials {
    /// Default credentials file location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no config dir.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir
            .join(constants::CONFIG_DIR)
            .join(constants::CREDENTIALS_FILE))
    }

    /// Load credentials; a missing file yields empty credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no credentials file");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let credentials: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(credentials)
    }

    /// Save credentials, creating the parent directory. The file is private
    /// to the user on Unix.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = Zeroizing::new(toml::to_string_pretty(self).map_err(ConfigError::Serialize)?);
        std::fs::write(path, contents.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %path.display(), "credentials saved");
        Ok(())
    }

    /// Replace fields with any non-empty override.
    pub fn apply(&mut self, server: Option<String>, token: Option<String>, key: Option<String>) {
        if let Some(server) = server.filter(|s| !s.is_empty()) {
            self.server = Some(server);
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.key = Some(key);
        }
    }

    /// Validate and extract what a vault connection needs.
    ///
    /// A token is required unless the server is a local `file://` vault.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for a missing server or token.
    pub fn vault_settings(&self) -> Result<VaultSettings> {
        let server = self
            .server
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingField { field: "server" })?;

        let token = self.token.clone().unwrap_or_default();
        if token.is_empty() && !server.starts_with(constants::LOCAL_VAULT_SCHEME) {
            return Err(ConfigError::MissingField { field: "token" }.into());
        }

        Ok(VaultSettings {
            server,
            token: Zeroizing::new(token),
            key: self.key.clone(),
        })
    }
}

/// Ensure `.gitignore` lists the given entries.
///
/// # Errors
///
/// Returns error if file operations fail.
pub fn ensure_gitignore(entries: &[&str]) -> Result<()> {
    let gitignore = Path::new(".gitignore");

    let existing = if gitignore.exists() {
        std::fs::read_to_string(gitignore)?
    } else {
        String::new()
    };

    let mut updated = existing.clone();
    for entry in entries {
        if !existing.lines().any(|l| l.trim() == *entry) {
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(entry);
            updated.push('\n');
        }
    }

    if updated != existing {
        std::fs::write(gitignore, updated)?;
    }

    Ok(())
}
