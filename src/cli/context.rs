//! Per-command context: resolved configuration and a vault session.

use std::cell::Cell;
use std::future::Future;
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cli::{ConnectionArgs, Globals, ProjectArgs};
use crate::core::config::{Credentials, Overrides, ProjectConfig, SecretsKind};
use crate::core::vault::VaultClient;
use crate::error::{Error, Result};

/// Project configuration from `.dotsync.toml` with command-line overrides.
///
/// # Errors
///
/// Returns error if the project file is malformed or `--type` is unknown.
pub fn project_config(folder: Option<String>, args: ProjectArgs) -> Result<ProjectConfig> {
    let kind: Option<SecretsKind> = args.kind.as_deref().map(str::parse).transpose()?;
    let overrides = Overrides {
        folder,
        kind,
        file: args.file,
        project: args.project,
        team: args.team,
    };
    let config = ProjectConfig::resolve(ProjectConfig::load()?, overrides);
    debug!(folder = %config.folder, kind = %config.kind, "project config resolved");
    Ok(config)
}

/// Stored credentials with command-line and environment overrides applied.
///
/// # Errors
///
/// Returns error if the credentials file is malformed.
pub fn credentials(connection: &ConnectionArgs) -> Result<Credentials> {
    let mut credentials = Credentials::load_from(&Credentials::default_path()?)?;
    credentials.apply(
        connection.server.clone(),
        connection.token.clone(),
        connection.key.clone(),
    );
    Ok(credentials)
}

/// A vault client plus the runtime its calls run on.
pub struct Session {
    client: VaultClient,
    runtime: Runtime,
    timeout: Duration,
    deadline: Cell<Option<Instant>>,
    logged_in: Cell<bool>,
}

impl Session {
    /// Open the configured vault.
    ///
    /// # Errors
    ///
    /// Returns error if credentials are incomplete or the vault cannot be
    /// opened.
    pub fn open(globals: &Globals) -> Result<Self> {
        let settings = credentials(&globals.connection)?.vault_settings()?;
        let client = VaultClient::connect(&settings)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client,
            runtime,
            timeout: Duration::from_secs(globals.timeout),
            deadline: Cell::new(None),
            logged_in: Cell::new(false),
        })
    }

    /// The vault client, for building futures passed to [`Session::run`].
    pub fn client(&self) -> &VaultClient {
        &self.client
    }

    /// Run vault work to completion within the time budget.
    ///
    /// The budget covers the whole session: the deadline is fixed by the
    /// first call and later calls only get what is left of it. Logs in before
    /// the first call. When the deadline passes, in-flight requests are
    /// dropped and nothing partial is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::Timeout` when the budget is exceeded, or whatever the
    /// work returns.
    pub fn run<T, F>(&self, operation: &str, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        info!(operation, "starting");
        let needs_login = !self.logged_in.get();
        let client = &self.client;

        let result = self.runtime.block_on(async {
            let deadline = match self.deadline.get() {
                Some(deadline) => deadline,
                None => {
                    let deadline = Instant::now() + self.timeout;
                    self.deadline.set(Some(deadline));
                    deadline
                }
            };
            let guarded = async {
                if needs_login {
                    client.login().await?;
                }
                work.await
            };
            tokio::time::timeout_at(deadline, guarded).await
        });

        match result {
            Ok(outcome) => {
                if outcome.is_ok() {
                    self.logged_in.set(true);
                }
                outcome
            }
            Err(_) => Err(Error::Timeout {
                operation: operation.to_string(),
                budget: self.timeout,
            }),
        }
    }
}
