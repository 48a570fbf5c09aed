//! Vault backend trait.
//!
//! A backend speaks to one kind of vault. The client layers session
//! handling and name resolution on top, so backends stay thin: every method
//! maps to a single remote call or a small fixed sequence of them.

use async_trait::async_trait;

use crate::core::domain::{Folder, Group, GroupMember, MembershipChange, User};
use crate::core::types::ResourceId;
use crate::error::Result;

/// Remote vault operations.
///
/// Authentication failures must be reported as `VaultError::Auth` so the
/// client can log in again and retry.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name for logs, e.g. `http` or `local`.
    fn name(&self) -> &'static str;

    /// Establish or refresh the session.
    async fn login(&self) -> Result<()>;

    /// Folders whose name contains `query`, with resources and permissions.
    async fn search_folders(&self, query: &str) -> Result<Vec<Folder>>;

    /// Name and decrypted value of a resource.
    async fn fetch_resource(&self, id: &str) -> Result<(String, String)>;

    /// Create a resource named `name` inside a folder.
    async fn create_resource(&self, folder_id: &str, name: &str, value: &str)
        -> Result<ResourceId>;

    /// Replace the value of an existing resource.
    async fn update_resource(&self, id: &str, value: &str) -> Result<()>;

    /// All groups with their members.
    async fn list_groups(&self) -> Result<Vec<Group>>;

    /// Create a group. At least one member must be a manager.
    async fn create_group(&self, name: &str, members: &[GroupMember]) -> Result<Group>;

    /// Apply membership changes to a group.
    async fn update_group(&self, group_id: &str, changes: &[MembershipChange]) -> Result<()>;

    /// Move a folder under `parent_id`, or to the root when `None`.
    async fn move_folder(&self, folder_id: &str, parent_id: Option<&str>) -> Result<()>;

    /// All active users.
    async fn list_users(&self) -> Result<Vec<User>>;
}
