//! OpenPGP payloads through the `gpg` CLI.
//!
//! Vault secrets travel as ASCII-armored OpenPGP messages. Decryption relies
//! on the user's keyring and gpg-agent; encryption targets the fingerprints
//! the vault reports for each user with access.
//!
//! ## Requirements
//!
//! - `gpg` must be installed and on PATH
//! - the private key for the configured key id must be in the keyring

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::trace;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

/// Handle on the local gpg installation.
#[derive(Debug, Clone)]
pub struct Gpg {
    program: String,
    /// Key used to decrypt, when the keyring holds several.
    key: Option<String>,
}

impl Default for Gpg {
    fn default() -> Self {
        Self {
            program: "gpg".to_string(),
            key: None,
        }
    }
}

impl Gpg {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    /// Configured key id, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn check(&self) -> Result<()> {
        which::which(&self.program).map_err(|_| {
            VaultError::Crypto(
                "gpg not found. Install GnuPG from https://gnupg.org/download/".to_string(),
            )
        })?;
        Ok(())
    }

    /// Encrypt `plaintext` for every recipient fingerprint.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Crypto` if there are no recipients or gpg fails.
    pub fn encrypt(&self, plaintext: &str, recipients: &[String]) -> Result<String> {
        trace!(recipients = recipients.len(), "encrypting with gpg");
        self.check()?;

        if recipients.is_empty() {
            return Err(VaultError::Crypto("no recipients".to_string()).into());
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(["--encrypt", "--armor", "--trust-model", "always", "--batch", "--yes"]);
        for recipient in recipients {
            cmd.args(["--recipient", recipient]);
        }

        let stdout = self.pipe(cmd, plaintext.as_bytes(), "encrypt")?;
        String::from_utf8(stdout.to_vec())
            .map_err(|e| VaultError::Crypto(format!("gpg output is not UTF-8: {}", e)).into())
    }

    /// Decrypt an armored message.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Crypto` if gpg fails or the plaintext is not UTF-8.
    pub fn decrypt(&self, armored: &str) -> Result<Zeroizing<String>> {
        trace!(len = armored.len(), "decrypting with gpg");
        self.check()?;

        let mut cmd = Command::new(&self.program);
        cmd.args(["--decrypt", "--batch", "--yes", "--quiet"]);
        if let Some(key) = &self.key {
            cmd.args(["--local-user", key]);
        }

        let stdout = self.pipe(cmd, armored.as_bytes(), "decrypt")?;
        let plaintext = String::from_utf8(stdout.to_vec())
            .map_err(|e| VaultError::Crypto(format!("plaintext is not UTF-8: {}", e)))?;
        Ok(Zeroizing::new(plaintext))
    }

    fn pipe(&self, mut cmd: Command, input: &[u8], verb: &str) -> Result<Zeroizing<Vec<u8>>> {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| VaultError::Crypto(format!("failed to spawn gpg: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input)
                .map_err(|e| VaultError::Crypto(format!("failed to write to gpg: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| VaultError::Crypto(format!("gpg {} failed: {}", verb, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VaultError::Crypto(format!("gpg {} failed: {}", verb, stderr.trim())).into());
        }

        Ok(Zeroizing::new(output.stdout))
    }
}
