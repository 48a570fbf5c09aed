//! Team list command.

use crate::cli::context::Session;
use crate::cli::{output, Globals};
use crate::error::Result;

/// List the members of the project's team group.
pub fn execute(team: Option<String>, json: bool, globals: &Globals) -> Result<()> {
    let team = super::team_name(team)?;

    let session = Session::open(globals)?;
    let client = session.client().clone();
    let group = session.run("team list", async move { client.resolve_group(&team).await })?;

    if json {
        let members: Vec<_> = group
            .members
            .iter()
            .map(|m| {
                let name = format!("{} {}", m.first_name, m.last_name);
                serde_json::json!({
                    "username": m.username,
                    "name": name.trim(),
                    "manager": m.is_manager,
                })
            })
            .collect();

        let result = serde_json::json!({
            "group": group.name,
            "members": members,
            "count": group.members.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if group.members.is_empty() {
        output::dimmed(&format!("{} has no members", group.name));
    } else {
        output::blank();
        output::header(&format!(
            "{} members of {}",
            output::count(group.members.len()),
            group.name
        ));
        output::rule();
        for member in &group.members {
            let role = if member.is_manager { "manager" } else { "member" };
            output::kv(&member.username, role);
        }
    }

    Ok(())
}
