//! Push plan actions.

use crate::core::types::{FolderId, ResourceId, SecretKey};

/// One remote mutation decided by the reconciler.
#[derive(Clone, PartialEq, Eq)]
pub enum Action {
    /// The folder has no resource with this name yet.
    Create {
        folder_id: FolderId,
        key: SecretKey,
        value: String,
    },
    /// A resource with this name exists and gets the local value.
    Update {
        resource_id: ResourceId,
        key: SecretKey,
        value: String,
    },
}

impl Action {
    /// Secret key the action writes.
    pub fn key(&self) -> &str {
        match self {
            Self::Create { key, .. } | Self::Update { key, .. } => key,
        }
    }

    /// Value the action writes.
    pub fn value(&self) -> &str {
        match self {
            Self::Create { value, .. } | Self::Update { value, .. } => value,
        }
    }

    /// Whether this creates a new resource.
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create { .. })
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create { folder_id, key, .. } => f
                .debug_struct("Create")
                .field("folder_id", folder_id)
                .field("key", key)
                .finish_non_exhaustive(),
            Self::Update {
                resource_id, key, ..
            } => f
                .debug_struct("Update")
                .field("resource_id", resource_id)
                .field("key", key)
                .finish_non_exhaustive(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create { key, .. } => write!(f, "create {}", key),
            Self::Update { key, .. } => write!(f, "update {}", key),
        }
    }
}
