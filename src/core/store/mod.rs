//! Local secret stores.
//!
//! A project keeps its secrets either in an env file or in the
//! `dotnet user-secrets` store. Both sit behind [`SecretStore`] so pull and
//! push never care which one is in use.
//!
//! ## Adding a New Store
//!
//! 1. Implement the `SecretStore` trait in a new file
//! 2. Add a `SecretsKind` variant and select it in [`for_project`]

use crate::core::domain::SecretSet;
use crate::error::Result;

mod backend;
mod env;
mod user_secrets;

pub use backend::for_project;
pub use env::EnvFile;
pub use user_secrets::{parse_list, UserSecrets};

/// Local secret store trait.
pub trait SecretStore {
    /// Read every secret the store currently holds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    fn fetch_all(&self) -> Result<SecretSet>;

    /// Write the given secrets, leaving any other entries alone.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be written.
    fn apply(&self, secrets: &SecretSet) -> Result<()>;

    /// Human-readable description for output, e.g. `.env`.
    fn describe(&self) -> String;
}
