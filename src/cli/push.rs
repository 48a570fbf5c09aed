//! Push command - local store into the vault folder.

use tracing::info;

use crate::cli::context::{self, Session};
use crate::cli::{output, Globals, ProjectArgs};
use crate::core::domain::Action;
use crate::core::{reconcile, store};
use crate::error::{Error, Result};

/// Create or update a vault resource for every local secret.
///
/// Nothing is deleted. With `dry_run` the plan is printed and not applied.
pub fn execute(
    folder: Option<String>,
    args: ProjectArgs,
    dry_run: bool,
    globals: &Globals,
) -> Result<()> {
    let config = context::project_config(folder, args)?;
    let folder = config.require_folder()?.to_string();
    let store = store::for_project(&config);

    let local = store.fetch_all()?;
    if local.is_empty() {
        output::dimmed(&format!("no secrets in {}", store.describe()));
        return Ok(());
    }

    let session = Session::open(globals)?;
    let client = session.client().clone();
    let remote = session.run("resolve folder", async {
        client.resolve_folder(&folder).await
    })?;

    let plan = reconcile::plan(&local, &remote);
    print_plan(&plan, &remote.name);

    if dry_run {
        output::hint("dry run, nothing pushed");
        return Ok(());
    }

    let report = session.run("push", async move {
        Ok(reconcile::apply(&client, plan).await)
    })?;
    info!(
        created = report.created.len(),
        updated = report.updated.len(),
        failed = report.failed.len(),
        "push finished"
    );

    for (key, reason) in &report.failed {
        output::error(&format!("{}: {}", output::key(key), reason));
    }

    output::success(&format!(
        "pushed to {}: {} created, {} updated",
        remote.name,
        output::count(report.created.len()),
        output::count(report.updated.len())
    ));

    if !report.is_complete() {
        return Err(Error::PushIncomplete {
            failed: report.failed.len(),
        });
    }
    Ok(())
}

fn print_plan(plan: &[Action], folder: &str) {
    output::section(&format!("Push to {}", folder));
    for action in plan {
        let verb = if action.is_create() { "create" } else { "update" };
        output::list_item(&format!("{} {}", verb, output::key(action.key())));
    }
    output::blank();
}
