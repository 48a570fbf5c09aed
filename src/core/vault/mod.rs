//! Remote vault access.
//!
//! [`VaultClient`] is the only way the rest of the crate talks to the vault.
//! It wraps a [`Backend`], resolves names to objects and re-authenticates
//! once when the backend rejects the session.

mod backend;
mod http;
mod local;
mod secrets;
mod team;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::config::VaultSettings;
use crate::core::constants;
use crate::core::gpg::Gpg;
use crate::error::{Error, Result, VaultError};

pub use backend::Backend;
pub use http::HttpBackend;
pub use local::{Failure, LocalBackend};

/// Handle on a vault. Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct VaultClient {
    backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl VaultClient {
    /// Wrap an existing backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Open the vault described by the user's settings.
    ///
    /// A `file://<path>` server opens a local vault file; anything else is
    /// treated as the base URL of an HTTP vault.
    ///
    /// # Errors
    ///
    /// Returns error if the local vault file is unreadable or the HTTP
    /// client cannot be built.
    pub fn connect(settings: &VaultSettings) -> Result<Self> {
        if let Some(path) = settings.server.strip_prefix(constants::LOCAL_VAULT_SCHEME) {
            debug!(path, "opening local vault");
            let backend = LocalBackend::open(path)?;
            return Ok(Self::new(Arc::new(backend)));
        }

        debug!(server = %settings.server, "opening http vault");
        let backend = HttpBackend::new(
            &settings.server,
            settings.token.clone(),
            Gpg::new(settings.key.clone()),
        )?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Log in explicitly. Commands call this once before their first request.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Auth` if the vault rejects the credentials.
    pub async fn login(&self) -> Result<()> {
        self.backend.login().await
    }

    /// Run a backend call, logging in again and retrying once if the session
    /// was rejected.
    async fn guarded<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Fn(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match call(Arc::clone(&self.backend)).await {
            Err(Error::Vault(VaultError::Auth(reason))) => {
                warn!(operation, %reason, "session rejected, logging in again");
                self.backend.login().await?;
                call(Arc::clone(&self.backend)).await
            }
            other => other,
        }
    }
}

/// Case-insensitive name comparison, Unicode-aware.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
