//! Team add command.

use tracing::info;

use crate::cli::context::Session;
use crate::cli::{output, Globals};
use crate::core::domain::MembershipChange;
use crate::error::Result;

/// Add a user to the project's team group, or change their manager flag.
pub fn execute(email: &str, manager: bool, team: Option<String>, globals: &Globals) -> Result<()> {
    let team = super::team_name(team)?;

    let session = Session::open(globals)?;
    let client = session.client().clone();
    let email = email.to_string();

    let outcome = session.run("team add", async move {
        let group = client.resolve_group(&team).await?;
        let user = client.resolve_user(&email).await?;

        let current = group.members.iter().find(|m| m.user_id == user.id);
        if current.is_some_and(|m| m.is_manager == manager) {
            return Ok((group, user, false));
        }

        let change = MembershipChange::Add {
            user_id: user.id.clone(),
            is_manager: manager,
        };
        client.update_group_membership(&group, &[change]).await?;
        Ok((group, user, true))
    })?;

    let (group, user, changed) = outcome;
    if !changed {
        output::warn(&format!("{} is already in {}", user.username, group.name));
        return Ok(());
    }

    info!(group = %group.name, user = %user.username, manager, "team member added");
    let role = if manager { "manager" } else { "member" };
    output::success(&format!(
        "added {} to {} as {}",
        output::key(&user.username),
        group.name,
        role
    ));
    Ok(())
}
