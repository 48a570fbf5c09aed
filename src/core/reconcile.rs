//! Push reconciliation.
//!
//! Local secrets are matched against a folder's resources by name: a match
//! becomes an update, anything else a create. Remote resources with no local
//! counterpart are never touched.

use tracing::{debug, warn};

use crate::core::domain::{Action, Folder, PushReport, SecretSet};
use crate::core::vault::VaultClient;

/// Decide what pushing `local` into `folder` has to do, sorted by key.
pub fn plan(local: &SecretSet, folder: &Folder) -> Vec<Action> {
    let actions: Vec<Action> = local
        .sorted()
        .into_iter()
        .map(|record| {
            let (key, value) = record.into_parts();
            match folder.find_resource(&key) {
                Some(resource) => Action::Update {
                    resource_id: resource.id.clone(),
                    key,
                    value,
                },
                None => Action::Create {
                    folder_id: folder.id.clone(),
                    key,
                    value,
                },
            }
        })
        .collect();

    debug!(
        folder = %folder.name,
        creates = actions.iter().filter(|a| a.is_create()).count(),
        updates = actions.iter().filter(|a| !a.is_create()).count(),
        "push planned"
    );
    actions
}

/// Execute a plan one action at a time.
///
/// A failed action is recorded and the rest still run.
pub async fn apply(client: &VaultClient, plan: Vec<Action>) -> PushReport {
    let mut report = PushReport::default();

    for action in plan {
        let outcome = match &action {
            Action::Create {
                folder_id,
                key,
                value,
            } => client.create_resource(folder_id, key, value).await.map(|_| ()),
            Action::Update {
                resource_id,
                value,
                ..
            } => client.update_resource(resource_id, value).await,
        };

        let key = action.key().to_string();
        match outcome {
            Ok(()) if action.is_create() => report.created.push(key),
            Ok(()) => report.updated.push(key),
            Err(e) => {
                warn!(key = %key, "{} failed: {}", action, e);
                report.failed.push((key, e.to_string()));
            }
        }
    }

    report
}
