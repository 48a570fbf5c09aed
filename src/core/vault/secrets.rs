//! Folder and resource operations.

use tracing::debug;

use super::{same_name, VaultClient};
use crate::core::domain::{Folder, SecretRecord};
use crate::core::types::ResourceId;
use crate::error::{Result, VaultError};

impl VaultClient {
    /// Find a folder by name, with its resources and permissions.
    ///
    /// Names are compared case-insensitively. When several folders match,
    /// the one whose name matches exactly wins; without a single exact match
    /// the name is ambiguous.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::FolderNotFound` or `VaultError::AmbiguousFolder`.
    pub async fn resolve_folder(&self, name: &str) -> Result<Folder> {
        let found = self
            .guarded("resolve folder", |backend| async move {
                backend.search_folders(name).await
            })
            .await?;
        debug!(name, candidates = found.len(), "folder search");
        select_folder(name, found)
    }

    /// Fetch and decrypt one resource.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::ResourceNotFound` or a request/crypto error.
    pub async fn fetch_resource_value(&self, id: &str) -> Result<SecretRecord> {
        let (name, value) = self
            .guarded("fetch resource", |backend| async move {
                backend.fetch_resource(id).await
            })
            .await?;
        Ok(SecretRecord::new(name, value))
    }

    /// Create a resource named `key` in a folder.
    ///
    /// # Errors
    ///
    /// Returns error if the vault rejects the request.
    pub async fn create_resource(&self, folder_id: &str, key: &str, value: &str) -> Result<ResourceId> {
        let id = self
            .guarded("create resource", |backend| async move {
                backend.create_resource(folder_id, key, value).await
            })
            .await?;
        debug!(key, id = %id, "resource created");
        Ok(id)
    }

    /// Replace the value of a resource.
    ///
    /// # Errors
    ///
    /// Returns error if the vault rejects the request.
    pub async fn update_resource(&self, resource_id: &str, value: &str) -> Result<()> {
        self.guarded("update resource", |backend| async move {
            backend.update_resource(resource_id, value).await
        })
        .await?;
        debug!(id = resource_id, "resource updated");
        Ok(())
    }

    /// Move a folder under another folder.
    ///
    /// # Errors
    ///
    /// Returns error if either folder is missing or the move is refused.
    pub async fn move_folder(&self, folder_id: &str, parent_id: Option<&str>) -> Result<()> {
        self.guarded("move folder", |backend| async move {
            backend.move_folder(folder_id, parent_id).await
        })
        .await
    }
}

fn select_folder(name: &str, folders: Vec<Folder>) -> Result<Folder> {
    let mut matches: Vec<Folder> = folders
        .into_iter()
        .filter(|f| same_name(&f.name, name))
        .collect();

    match matches.len() {
        0 => Err(VaultError::FolderNotFound(name.to_string()).into()),
        1 => Ok(matches.remove(0)),
        count => {
            let exact: Vec<usize> = matches
                .iter()
                .enumerate()
                .filter(|(_, f)| f.name == name)
                .map(|(i, _)| i)
                .collect();
            match exact.as_slice() {
                [index] => Ok(matches.swap_remove(*index)),
                _ => Err(VaultError::AmbiguousFolder {
                    name: name.to_string(),
                    count,
                }
                .into()),
            }
        }
    }
}
