//! Init command - write .dotsync.toml.

use std::io::{self, IsTerminal};

use dialoguer::{Input, Select};
use tracing::info;

use crate::cli::{output, ProjectArgs};
use crate::core::config::{self, Overrides, ProjectConfig, SecretsKind};
use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Create the project file in the current directory.
pub fn execute(folder: Option<String>, args: ProjectArgs, force: bool) -> Result<()> {
    if ProjectConfig::exists() && !force {
        return Err(ConfigError::AlreadyInitialized.into());
    }

    let interactive = io::stdin().is_terminal();

    let folder = match folder {
        Some(folder) => folder,
        None if interactive => Input::<String>::new()
            .with_prompt("Vault folder for this project")
            .interact_text()?,
        None => return Err(ConfigError::MissingField { field: "folder" }.into()),
    };

    let kind = match args.kind.as_deref() {
        Some(kind) => kind.parse::<SecretsKind>()?,
        None if interactive => {
            let kinds = [SecretsKind::Dotnet, SecretsKind::Env];
            let choice = Select::new()
                .with_prompt("Where should secrets live locally?")
                .items(&["dotnet user-secrets", ".env file"])
                .default(0)
                .interact()?;
            kinds[choice]
        }
        None => SecretsKind::default(),
    };

    let config = ProjectConfig::resolve(
        None,
        Overrides {
            folder: Some(folder),
            kind: Some(kind),
            file: args.file,
            project: args.project,
            team: args.team,
        },
    );
    config.require_folder()?;
    config.save()?;
    info!(folder = %config.folder, kind = %config.kind, "project initialized");

    if config.kind == SecretsKind::Env {
        if let Some(path) = config.local_path() {
            config::ensure_gitignore(&[&path.display().to_string()])?;
        }
    }

    output::success(&format!("initialized {}", output::path(constants::PROJECT_FILE)));
    output::kv("folder", &config.folder);
    output::kv("type", config.kind);
    if let Some(path) = config.local_path() {
        output::kv("path", path.display());
    }
    if let Some(team) = &config.team {
        output::kv("team", team);
    }
    Ok(())
}
