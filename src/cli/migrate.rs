//! Migrate command - hand a project folder over to its team.
//!
//! Everyone who can already see the folder becomes a member of the team
//! group (owners as managers), and the folder moves under the shared
//! `dotsync` parent folder.

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, Input};
use tracing::info;

use crate::cli::context::{self, Session};
use crate::cli::{output, Globals, ProjectArgs};
use crate::core::config::ProjectConfig;
use crate::core::constants;
use crate::core::domain::{Group, GroupMember, MembershipChange, UserPermission};
use crate::error::{ConfigError, Error, Result, VaultError};

/// Migrate the project folder to a team group.
pub fn execute(
    folder: Option<String>,
    team: Option<String>,
    yes: bool,
    globals: &Globals,
) -> Result<()> {
    let mut config = context::project_config(
        folder,
        ProjectArgs {
            team,
            ..ProjectArgs::default()
        },
    )?;
    let folder_name = config.require_folder()?.to_string();
    let interactive = io::stdin().is_terminal();

    let team = match config.require_team() {
        Ok(team) => team.to_string(),
        Err(_) if interactive => Input::<String>::new()
            .with_prompt("Team group for this project")
            .interact_text()?,
        Err(e) => return Err(e),
    };

    let session = Session::open(globals)?;
    let client = session.client().clone();

    let group_name = team.clone();
    let (existing, folder, parent) = session.run("migrate lookup", async move {
        let existing = match client.resolve_group(&group_name).await {
            Ok(group) => Some(group),
            Err(Error::Vault(VaultError::GroupNotFound(_))) => None,
            Err(e) => return Err(e),
        };
        let folder = client.resolve_folder(&folder_name).await?;
        let parent = client.resolve_folder(constants::PARENT_FOLDER).await?;
        Ok((existing, folder, parent))
    })?;

    if existing.is_none()
        && !confirm(
            yes,
            interactive,
            &format!("Group {} does not exist. Create it?", team),
        )?
    {
        output::dimmed("migration cancelled");
        return Ok(());
    }

    let client = session.client().clone();
    let permissions = folder.permissions.clone();
    let members = session.run("list folder users", async move {
        client.list_users_from_permissions(&permissions).await
    })?;

    print_plan(&folder.name, &team, existing.as_ref(), &members);

    if !confirm(yes, interactive, "Continue with migration?")? {
        output::dimmed("migration cancelled");
        return Ok(());
    }

    let client = session.client().clone();
    let folder_id = folder.id.clone();
    let group_name = team.clone();
    session.run("migrate", async move {
        match &existing {
            None => {
                let new_members: Vec<GroupMember> = members
                    .iter()
                    .map(|m| GroupMember::from_user(&m.user, m.is_owner()))
                    .collect();
                client.create_group(&group_name, &new_members).await?;
            }
            Some(group) => {
                let changes = membership_changes(group, &members);
                client.update_group_membership(group, &changes).await?;
            }
        }

        client.move_folder(&folder_id, Some(&parent.id)).await
    })?;
    info!(folder = %folder.name, team = %team, "folder migrated");

    remember_team(&mut config, &team)?;

    output::success(&format!(
        "moved {} to {}/{} and shared it with {}",
        folder.name,
        constants::PARENT_FOLDER,
        folder.name,
        team
    ));
    Ok(())
}

/// Ask for confirmation. `--yes` answers for the user; without a terminal
/// and without `--yes` the command refuses to guess.
fn confirm(yes: bool, interactive: bool, prompt: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !interactive {
        output::hint("pass --yes to confirm without a terminal");
        return Err(Error::Cancelled);
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn print_plan(folder: &str, team: &str, existing: Option<&Group>, members: &[UserPermission]) {
    output::section(&format!(
        "Migrate {} to {}/{}",
        folder,
        constants::PARENT_FOLDER,
        folder
    ));
    match existing {
        Some(group) => output::kv("group", format!("{} (update)", group.name)),
        None => output::kv("group", format!("{} (create)", team)),
    }
    for member in members {
        let role = if member.is_owner() { "manager" } else { "member" };
        output::list_item(&format!("{} ({})", member.user.display_name(), role));
    }
    output::blank();
}

/// Changes that bring an existing group up to the folder's users.
///
/// Missing users are added; owners who are plain members are promoted.
/// Nobody is removed or demoted.
fn membership_changes(group: &Group, members: &[UserPermission]) -> Vec<MembershipChange> {
    members
        .iter()
        .filter_map(|m| {
            let current = group.members.iter().find(|g| g.user_id == m.user.id);
            let wanted = match current {
                None => true,
                Some(existing) => m.is_owner() && !existing.is_manager,
            };
            wanted.then(|| MembershipChange::Add {
                user_id: m.user.id.clone(),
                is_manager: m.is_owner(),
            })
        })
        .collect()
}

/// Record the team in `.dotsync.toml` when the project has one.
fn remember_team(config: &mut ProjectConfig, team: &str) -> Result<()> {
    if !ProjectConfig::exists() || config.team.as_deref() == Some(team) {
        return Ok(());
    }
    let mut stored = ProjectConfig::load()?.ok_or(ConfigError::NotInitialized)?;
    stored.team = Some(team.to_string());
    stored.save()?;
    config.team = Some(team.to_string());
    Ok(())
}
