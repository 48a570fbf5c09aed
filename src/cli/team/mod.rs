//! Team management commands.
//!
//! A project's team is a vault group; list shows its members and add puts a
//! user into it.

mod add;
mod list;

use crate::cli::context;
use crate::cli::ProjectArgs;
use crate::error::Result;

pub use add::execute as add;
pub use list::execute as list;

/// Team name from `--team` or the project file.
fn team_name(team: Option<String>) -> Result<String> {
    let config = context::project_config(
        None,
        ProjectArgs {
            team,
            ..ProjectArgs::default()
        },
    )?;
    Ok(config.require_team()?.to_string())
}
