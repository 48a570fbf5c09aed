//! Concurrent retrieval of folder resources.
//!
//! Every resource needs its own vault call (and a decrypt). All calls are
//! started at once on a `JoinSet` and collected as they finish. A failed
//! resource is left out and reported; it never fails the batch.

use std::collections::HashMap;

use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::core::domain::{Resource, SecretRecord, SecretSet};
use crate::core::types::ResourceId;
use crate::core::vault::VaultClient;
use crate::error::Result;

/// Result of fetching one resource.
pub type ResourceResult = (ResourceId, Result<SecretRecord>);

/// Secrets that were fetched and resources that were not.
#[derive(Debug, Default)]
pub struct Retrieval {
    pub secrets: SecretSet,
    /// Resource id and error message for every dropped resource
    pub failures: Vec<(ResourceId, String)>,
}

/// Fetch every resource concurrently, keeping failures.
///
/// Output order is undefined. A panicking fetch counts as a failure.
pub async fn collect(client: &VaultClient, resources: &[Resource]) -> Retrieval {
    let mut set = JoinSet::new();
    let mut spawned: HashMap<tokio::task::Id, ResourceId> = HashMap::new();

    for resource in resources {
        let client = client.clone();
        let id = resource.id.clone();
        let handle = set.spawn(async move {
            let result = client.fetch_resource_value(&id).await;
            (id, result)
        });
        spawned.insert(handle.id(), resource.id.clone());
    }
    debug!(tasks = resources.len(), "fetching resources");

    let mut retrieval = Retrieval::default();
    while let Some(joined) = set.join_next().await {
        let (id, result): ResourceResult = match joined {
            Ok(done) => done,
            Err(e) => {
                let id = spawned.remove(&e.id()).unwrap_or_default();
                error!(resource = %id, "fetch task panicked: {}", e);
                retrieval.failures.push((id, format!("task failed: {}", e)));
                continue;
            }
        };

        match result {
            Ok(record) => {
                retrieval.secrets.insert(record);
            }
            Err(e) => {
                warn!(resource = %id, "dropping resource: {}", e);
                retrieval.failures.push((id, e.to_string()));
            }
        }
    }

    debug!(
        fetched = retrieval.secrets.len(),
        failed = retrieval.failures.len(),
        "resources fetched"
    );
    retrieval
}

/// Fetch every resource concurrently. Never fails as a whole; failed
/// resources are logged and left out.
pub async fn fetch_all(client: &VaultClient, resources: &[Resource]) -> SecretSet {
    collect(client, resources).await.secrets
}
