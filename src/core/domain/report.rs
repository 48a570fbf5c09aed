//! Results of pull, push and merge operations.

use crate::core::types::{ResourceId, SecretKey};

/// Outcome of merging a secret set into an env file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Existing lines rewritten with a new value
    pub updated: usize,
    /// Existing lines whose value already matched
    pub unchanged: usize,
    /// Keys appended at the end of the file
    pub appended: usize,
}

impl MergeSummary {
    /// Whether the merge changed any secret.
    pub fn changed(&self) -> bool {
        self.updated > 0 || self.appended > 0
    }
}

/// Outcome of a pull.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullReport {
    /// Secrets handed to the local store
    pub written: usize,
    /// Resources that could not be fetched and were left out
    pub dropped: Vec<(ResourceId, String)>,
}

/// Outcome of applying a push plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    pub created: Vec<SecretKey>,
    pub updated: Vec<SecretKey>,
    /// Keys whose action failed, with the error message
    pub failed: Vec<(SecretKey, String)>,
}

impl PushReport {
    /// Whether every action succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
