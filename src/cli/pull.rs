//! Pull command - vault folder into the local store.

use tracing::info;

use crate::cli::context::{self, Session};
use crate::cli::{output, Globals, ProjectArgs};
use crate::core::domain::PullReport;
use crate::core::{retrieve, store};
use crate::error::Result;

/// Fetch every secret in the folder and merge it into the local store.
///
/// Resources that fail to fetch are reported and skipped.
pub fn execute(folder: Option<String>, args: ProjectArgs, globals: &Globals) -> Result<()> {
    let config = context::project_config(folder, args)?;
    let folder = config.require_folder()?.to_string();
    let store = store::for_project(&config);

    let session = Session::open(globals)?;
    let client = session.client().clone();
    let retrieval = session.run("pull", async move {
        let folder = client.resolve_folder(&folder).await?;
        Ok(retrieve::collect(&client, &folder.resources).await)
    })?;

    let secrets = retrieval.secrets;
    let report = PullReport {
        written: secrets.len(),
        dropped: retrieval.failures,
    };

    for (resource, reason) in &report.dropped {
        output::warn(&format!("skipped resource {}: {}", resource, reason));
    }

    if secrets.is_empty() {
        output::dimmed(&format!("no secrets to pull from {}", config.folder));
        return Ok(());
    }

    store.apply(&secrets)?;
    info!(written = report.written, dropped = report.dropped.len(), "pull finished");

    output::success(&format!(
        "pulled {} secrets into {}",
        output::count(report.written),
        output::path(&store.describe())
    ));
    Ok(())
}
