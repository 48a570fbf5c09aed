//! Vault object model.
//!
//! Folders, resources, groups, users and permissions as the core consumes
//! them. Backends map their wire formats onto these types.

use serde::{Deserialize, Serialize};

use crate::core::types::{FolderId, GroupId, ResourceId, UserId};

/// A remote secret. The name is the secret key; the value is fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
}

/// A named container of resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Folder {
    /// Child resource whose name equals `name` exactly (case-sensitive).
    pub fn find_resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }
}

/// A vault user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Login, usually the email address.
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    /// "First Last", falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Membership of a user in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_manager: bool,
}

impl GroupMember {
    /// Membership entry for a user.
    pub fn from_user(user: &User, is_manager: bool) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_manager,
        }
    }
}

/// A named team of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

impl Group {
    /// Whether the user already belongs to the group.
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }
}

/// A change to a group's membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    /// Add the user, or change their manager flag if already a member.
    Add { user_id: UserId, is_manager: bool },
    /// Remove the user.
    Remove { user_id: UserId },
}

/// Access level granted by a permission. Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Read,
    Update,
    Owner,
}

impl PermissionLevel {
    /// Numeric code used by Passbolt-style APIs (1, 7, 15).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Read),
            7 => Some(Self::Update),
            15 => Some(Self::Owner),
            _ => None,
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Read => "read",
            Self::Update => "update",
            Self::Owner => "owner",
        };
        write!(f, "{}", name)
    }
}

/// What a permission applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Target {
    Resource(ResourceId),
    Folder(FolderId),
}

/// Who a permission is granted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Holder {
    User(UserId),
    Group(GroupId),
}

/// An access grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub target: Target,
    pub holder: Holder,
    pub level: PermissionLevel,
}

/// A user together with the strongest level they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPermission {
    pub user: User,
    pub level: PermissionLevel,
}

impl UserPermission {
    /// Owners are made group managers during migration.
    pub fn is_owner(&self) -> bool {
        self.level == PermissionLevel::Owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: "u1".into(),
            username: "alice@example.com".into(),
            first_name: first.into(),
            last_name: last.into(),
        }
    }

    #[test]
    fn test_find_resource_is_case_sensitive() {
        let folder = Folder {
            id: "f1".into(),
            name: "api".into(),
            resources: vec![Resource {
                id: "r1".into(),
                name: "API_KEY".into(),
            }],
            permissions: vec![],
        };

        assert_eq!(folder.find_resource("API_KEY").map(|r| r.id.as_str()), Some("r1"));
        assert!(folder.find_resource("api_key").is_none());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user("Alice", "Smith").display_name(), "Alice Smith");
        assert_eq!(user("", "").display_name(), "alice@example.com");
    }

    #[test]
    fn test_permission_level_order() {
        assert!(PermissionLevel::Owner > PermissionLevel::Update);
        assert!(PermissionLevel::Update > PermissionLevel::Read);
        assert_eq!(PermissionLevel::from_code(15), Some(PermissionLevel::Owner));
        assert_eq!(PermissionLevel::from_code(3), None);
    }

    #[test]
    fn test_group_has_member() {
        let group = Group {
            id: "g1".into(),
            name: "devs".into(),
            members: vec![GroupMember::from_user(&user("A", "B"), true)],
        };

        assert!(group.has_member("u1"));
        assert!(!group.has_member("u2"));
    }
}
