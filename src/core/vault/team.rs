//! Group and user operations.

use std::collections::BTreeMap;

use tracing::debug;

use super::{same_name, VaultClient};
use crate::core::domain::{
    Group, GroupMember, Holder, MembershipChange, Permission, PermissionLevel, User, UserPermission,
};
use crate::error::{Result, VaultError};

impl VaultClient {
    /// Find a group by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `VaultError::GroupNotFound` if no group has that name.
    pub async fn resolve_group(&self, name: &str) -> Result<Group> {
        let groups = self.list_groups().await?;
        groups
            .into_iter()
            .find(|g| same_name(&g.name, name))
            .ok_or_else(|| VaultError::GroupNotFound(name.to_string()).into())
    }

    /// All groups with their members.
    ///
    /// # Errors
    ///
    /// Returns error if the vault request fails.
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.guarded("list groups", |backend| async move { backend.list_groups().await })
            .await
    }

    /// Create a group with the given members.
    ///
    /// # Errors
    ///
    /// Returns error if the vault rejects the group.
    pub async fn create_group(&self, name: &str, members: &[GroupMember]) -> Result<Group> {
        let group = self
            .guarded("create group", |backend| async move {
                backend.create_group(name, members).await
            })
            .await?;
        debug!(name, id = %group.id, members = members.len(), "group created");
        Ok(group)
    }

    /// Apply membership changes to an existing group.
    ///
    /// # Errors
    ///
    /// Returns error if the vault rejects the update.
    pub async fn update_group_membership(
        &self,
        group: &Group,
        changes: &[MembershipChange],
    ) -> Result<()> {
        if changes.is_empty() {
            debug!(group = %group.name, "no membership changes");
            return Ok(());
        }
        let group_id = group.id.as_str();
        self.guarded("update group", |backend| async move {
            backend.update_group(group_id, changes).await
        })
        .await?;
        debug!(group = %group.name, changes = changes.len(), "group updated");
        Ok(())
    }

    /// All active users.
    ///
    /// # Errors
    ///
    /// Returns error if the vault request fails.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.guarded("list users", |backend| async move { backend.list_users().await })
            .await
    }

    /// Find a user by username/email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `VaultError::UserNotFound` if no user matches.
    pub async fn resolve_user(&self, email: &str) -> Result<User> {
        let users = self.list_users().await?;
        users
            .into_iter()
            .find(|u| same_name(&u.username, email))
            .ok_or_else(|| VaultError::UserNotFound(email.to_string()).into())
    }

    /// Users who hold the given permissions.
    ///
    /// User holders map directly; group holders expand to their members.
    /// Each user appears once at the strongest level they hold, sorted by
    /// username. Holders the vault no longer knows are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if users or groups cannot be listed.
    pub async fn list_users_from_permissions(
        &self,
        permissions: &[Permission],
    ) -> Result<Vec<UserPermission>> {
        let users = self.list_users().await?;
        let needs_groups = permissions
            .iter()
            .any(|p| matches!(p.holder, Holder::Group(_)));
        let groups = if needs_groups {
            self.list_groups().await?
        } else {
            Vec::new()
        };

        Ok(collect_user_permissions(permissions, &users, &groups))
    }
}

fn collect_user_permissions(
    permissions: &[Permission],
    users: &[User],
    groups: &[Group],
) -> Vec<UserPermission> {
    let by_id: BTreeMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();
    let mut levels: BTreeMap<&str, PermissionLevel> = BTreeMap::new();

    let mut grant = |user_id: &str, level: PermissionLevel| {
        if let Some(&user) = by_id.get(user_id) {
            let entry = levels.entry(user.id.as_str()).or_insert(level);
            *entry = (*entry).max(level);
        } else {
            debug!(user_id, "permission holder is not an active user");
        }
    };

    for permission in permissions {
        match &permission.holder {
            Holder::User(id) => grant(id, permission.level),
            Holder::Group(id) => {
                let members = groups
                    .iter()
                    .find(|g| &g.id == id)
                    .map(|g| g.members.as_slice())
                    .unwrap_or_default();
                for member in members {
                    grant(&member.user_id, permission.level);
                }
            }
        }
    }

    let mut result: Vec<UserPermission> = levels
        .into_iter()
        .filter_map(|(id, level)| {
            by_id.get(id).map(|user| UserPermission {
                user: (*user).clone(),
                level,
            })
        })
        .collect();
    result.sort_by(|a, b| a.user.username.cmp(&b.user.username));
    result
}
