//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A secret key name (e.g., DATABASE_URL, ConnectionStrings:Default).
///
/// Case-sensitive, never empty.
pub type SecretKey = String;

/// Opaque vault identifier of a resource.
pub type ResourceId = String;

/// Opaque vault identifier of a folder.
pub type FolderId = String;

/// Opaque vault identifier of a group.
pub type GroupId = String;

/// Opaque vault identifier of a user.
pub type UserId = String;
