//! Constants used throughout dotsync.
//!
//! Centralizes file names, defaults and protocol strings.

/// Project configuration file name (.dotsync.toml).
pub const PROJECT_FILE: &str = ".dotsync.toml";

/// Default env file for the `env` secrets type.
pub const ENV_FILE: &str = ".env";

/// Directory under the user config dir holding credentials.
pub const CONFIG_DIR: &str = "dotsync";

/// Credentials file name inside [`CONFIG_DIR`].
pub const CREDENTIALS_FILE: &str = "config.toml";

/// Vault folder that migrated project folders are moved under.
pub const PARENT_FOLDER: &str = "dotsync";

/// Overall budget for one command's vault work, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Program providing the `user-secrets` verbs.
pub const USER_SECRETS_PROGRAM: &str = "dotnet";

/// First line printed by `user-secrets list` for an empty project.
pub const NO_SECRETS_SENTINEL: &str = "No secrets configured";

/// Permissions for env files written by dotsync.
pub const ENV_FILE_MODE: u32 = 0o600;

/// Permissions for the `file://` vault, which holds plaintext values.
pub const VAULT_FILE_MODE: u32 = 0o600;

/// Server URL scheme selecting the file-backed local vault.
pub const LOCAL_VAULT_SCHEME: &str = "file://";
