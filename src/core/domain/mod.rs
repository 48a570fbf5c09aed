//! Domain types.

mod env;
mod plan;
mod report;
mod secret;
mod vault;

pub use env::{format_assignment, strip_quotes, Assignment, EnvLine};
pub use plan::Action;
pub use report::{MergeSummary, PullReport, PushReport};
pub use secret::{SecretRecord, SecretSet};
pub use vault::{
    Folder, Group, GroupMember, Holder, MembershipChange, Permission, PermissionLevel, Resource,
    Target, User, UserPermission,
};
