//! Error types.
//!
//! Every fallible operation in dotsync returns [`Result`]. Errors are grouped
//! by the layer they come from so `main` can attach a hint to the ones a user
//! can fix.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("{operation} timed out after {budget:?}")]
    Timeout { operation: String, budget: Duration },

    #[error("push finished with {failed} failed secret(s)")]
    PushIncomplete { failed: usize },

    #[error("cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Configuration loading and resolution errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no .dotsync.toml found in the current directory")]
    NotInitialized,

    #[error("already initialized: .dotsync.toml exists")]
    AlreadyInitialized,

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unsupported secrets type '{0}' (expected 'env' or 'dotnet')")]
    UnsupportedType(String),

    #[error("unable to determine the user configuration directory")]
    NoConfigDir,

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Local secret store errors (env files and the user-secrets tool).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} not found on PATH")]
    ToolMissing { program: String },

    #[error("failed to run {program} {verb}: {source}")]
    Spawn {
        program: String,
        verb: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} {verb} failed: {stderr}")]
    Command {
        program: String,
        verb: &'static str,
        stderr: String,
    },
}

/// Vault errors.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("folder not found: {0}")]
    FolderNotFound(String),

    #[error("folder name '{name}' is ambiguous: {count} folders match")]
    AmbiguousFolder { name: String, count: usize },

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("vault request failed: {0}")]
    Request(String),

    #[error("unexpected vault response: {0}")]
    Decode(String),

    #[error("secret payload error: {0}")]
    Crypto(String),
}

impl VaultError {
    /// Whether the error means the vault has no such object.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FolderNotFound(_)
                | Self::GroupNotFound(_)
                | Self::UserNotFound(_)
                | Self::ResourceNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
