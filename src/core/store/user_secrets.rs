//! `dotnet user-secrets` store.
//!
//! Shells out to the tool for every operation:
//!
//! ```text
//! dotnet user-secrets list [--project <path>]
//! dotnet user-secrets set <key> <value> [--project <path>]
//! dotnet user-secrets init [--project <path>]
//! ```
//!
//! The program name is configurable so tests can substitute a script.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use super::SecretStore;
use crate::core::constants;
use crate::core::domain::SecretSet;
use crate::error::{Result, StoreError};

/// Secrets kept by the `user-secrets` tool for one project.
pub struct UserSecrets {
    program: String,
    project: Option<PathBuf>,
}

impl UserSecrets {
    /// Store for a project path, or the tool's working directory when `None`.
    pub fn new(project: Option<PathBuf>) -> Self {
        Self {
            program: constants::USER_SECRETS_PROGRAM.to_string(),
            project,
        }
    }

    /// Use a different program instead of `dotnet`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Raw output lines of `user-secrets list`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the tool is missing or exits non-zero.
    pub fn list(&self) -> Result<Vec<String>> {
        let stdout = self.run("list", &[])?;
        Ok(stdout.lines().map(str::to_string).collect())
    }

    /// Set a single key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the tool is missing or exits non-zero.
    pub fn set_one(&self, key: &str, value: &str) -> Result<()> {
        self.run("set", &[key, value])?;
        Ok(())
    }

    /// Initialize user secrets for the project. Safe to repeat.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the tool is missing or exits non-zero.
    pub fn init_project(&self) -> Result<()> {
        self.run("init", &[])?;
        Ok(())
    }

    fn run(&self, verb: &'static str, args: &[&str]) -> Result<String> {
        which::which(&self.program).map_err(|_| StoreError::ToolMissing {
            program: self.program.clone(),
        })?;

        let mut cmd = Command::new(&self.program);
        cmd.arg("user-secrets").arg(verb).args(args);
        if let Some(project) = &self.project {
            cmd.arg("--project").arg(project);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // args may hold a secret value; only the verb is traced
        trace!(program = %self.program, verb, "running user-secrets");

        let output = cmd.output().map_err(|source| StoreError::Spawn {
            program: self.program.clone(),
            verb,
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stderr = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(StoreError::Command {
                program: self.program.clone(),
                verb,
                stderr,
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SecretStore for UserSecrets {
    fn fetch_all(&self) -> Result<SecretSet> {
        let secrets = parse_list(self.list()?);
        debug!(count = secrets.len(), "listed user secrets");
        Ok(secrets)
    }

    fn apply(&self, secrets: &SecretSet) -> Result<()> {
        self.init_project()?;
        for record in secrets.sorted() {
            self.set_one(record.key(), record.value())?;
            debug!(key = record.key(), "user secret set");
        }
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.project {
            Some(project) => format!("{} user-secrets ({})", self.program, project.display()),
            None => format!("{} user-secrets", self.program),
        }
    }
}

/// Parse the output of `user-secrets list`.
///
/// A first line containing "No secrets configured" means an empty store.
/// Otherwise each `Key = Value` line becomes a secret.
pub fn parse_list<I, S>(lines: I) -> SecretSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = lines.into_iter().peekable();
    if let Some(first) = lines.peek() {
        if first.as_ref().contains(constants::NO_SECRETS_SENTINEL) {
            return SecretSet::new();
        }
    }
    SecretSet::from_lines(lines.filter(|l| !l.as_ref().trim().is_empty()))
}
