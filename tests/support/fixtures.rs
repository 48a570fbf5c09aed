//! Vault and project fixtures.

use super::Test;
use dotsync::core::domain::{Group, Holder, PermissionLevel, User};
use dotsync::core::types::FolderId;
use dotsync::core::vault::{LocalBackend, VaultClient};
use std::sync::Arc;

/// Env file with comments, blank lines and loose spacing.
pub const SAMPLE_ENV: &str = "\
# database
DB_HOST=localhost
DB_PORT = 5432

API_KEY=\"old\"
";

impl Test {
    /// Open the vault file. Changes made through it are saved immediately.
    pub fn vault(&self) -> LocalBackend {
        LocalBackend::open(self.vault_path()).expect("failed to open test vault")
    }

    /// Seed a folder with secrets.
    pub fn seed_folder(&self, name: &str, secrets: &[(&str, &str)]) -> FolderId {
        self.vault()
            .seed_folder(name, secrets)
            .expect("failed to seed folder")
    }

    /// Seed a user.
    pub fn seed_user(&self, email: &str, first: &str, last: &str) -> User {
        self.vault()
            .seed_user(email, first, last)
            .expect("failed to seed user")
    }

    /// Seed a group with `(user, is_manager)` members.
    pub fn seed_group(&self, name: &str, members: &[(&User, bool)]) -> Group {
        self.vault()
            .seed_group(name, members)
            .expect("failed to seed group")
    }

    /// Grant a user access to a folder.
    pub fn grant(&self, folder_id: &str, user: &User, level: PermissionLevel) {
        self.vault()
            .seed_permission(folder_id, Holder::User(user.id.clone()), level)
            .expect("failed to seed permission");
    }

    /// Make every fetch of a secret fail, for this and later processes.
    pub fn fail_secret(&self, folder: &str, key: &str) {
        let vault = self.vault();
        let id = vault
            .resource_id(folder, key)
            .expect("secret to fail does not exist");
        vault.fail_resource(&id).expect("failed to mark secret as failing");
    }

    /// Value of a secret in the vault.
    pub fn vault_secret(&self, folder: &str, key: &str) -> Option<String> {
        self.vault().secret(folder, key)
    }

    /// Look a group up through the vault client.
    pub fn vault_group(&self, name: &str) -> Option<Group> {
        let client = VaultClient::new(Arc::new(self.vault()));
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build runtime")
            .block_on(client.resolve_group(name))
            .ok()
    }

    /// Write a file into the project dir.
    pub fn write(&self, name: &str, contents: &str) {
        let path = self.project_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create dir");
        }
        std::fs::write(path, contents).expect("failed to write file");
    }

    /// Read a file from the project dir.
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.project_path(name)).expect("failed to read file")
    }
}
