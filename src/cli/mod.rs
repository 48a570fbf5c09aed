//! Command-line interface.

pub mod completions;
pub mod configure;
pub mod context;
pub mod init;
pub mod migrate;
pub mod output;
pub mod pull;
pub mod push;
pub mod team;
pub mod whoami;

use clap::{Args, Parser, Subcommand};

use crate::core::constants::DEFAULT_TIMEOUT_SECS;

/// dotsync - keep local secrets in sync with a team vault.
#[derive(Parser)]
#[command(
    name = "dotsync",
    about = "Sync secrets between a team vault and your local project",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Time budget for vault operations, in seconds
    #[arg(long, global = true, env = "DOTSYNC_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Vault connection overrides. Each falls back to the credentials file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Vault server URL (file://<path> for a local vault)
    #[arg(long, global = true, env = "DOTSYNC_SERVER")]
    pub server: Option<String>,

    /// Session token
    #[arg(long, global = true, env = "DOTSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// gpg key id or fingerprint
    #[arg(long, global = true, env = "DOTSYNC_KEY")]
    pub key: Option<String>,
}

/// Project overrides. Each falls back to .dotsync.toml.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Secrets type: dotnet or env
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    /// Env file to use with --type env
    #[arg(short, long)]
    pub file: Option<String>,

    /// Project path to use with --type dotnet
    #[arg(short, long)]
    pub project: Option<String>,

    /// Vault group the project is shared with
    #[arg(long)]
    pub team: Option<String>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Save vault server, token and gpg key
    Configure,

    /// Create .dotsync.toml in the current directory
    Init {
        /// Vault folder holding the project's secrets
        folder: Option<String>,
        #[command(flatten)]
        project: ProjectArgs,
        /// Overwrite an existing .dotsync.toml
        #[arg(long)]
        force: bool,
    },

    /// Pull secrets from the vault into the local store
    Pull {
        /// Vault folder (defaults to the configured folder)
        folder: Option<String>,
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Push local secrets into the vault
    Push {
        /// Vault folder (defaults to the configured folder)
        folder: Option<String>,
        #[command(flatten)]
        project: ProjectArgs,
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage the project's team
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },

    /// Share the project folder with its team and move it under dotsync/
    Migrate {
        /// Vault folder (defaults to the configured folder)
        folder: Option<String>,
        /// Team group name
        #[arg(long)]
        team: Option<String>,
        /// Skip confirmation prompts
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the vault credentials in use
    Whoami,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Team subcommands.
#[derive(Subcommand)]
pub enum TeamAction {
    /// List team members
    List {
        /// Team group name
        #[arg(long)]
        team: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a user to the team
    Add {
        /// User email
        email: String,
        /// Make the user a group manager
        #[arg(short, long)]
        manager: bool,
        /// Team group name
        #[arg(long)]
        team: Option<String>,
    },
}

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct Globals {
    pub connection: ConnectionArgs,
    pub timeout: u64,
}

/// Execute a command.
pub fn execute(command: Command, globals: Globals) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Configure => configure::execute(&globals.connection),
        Init {
            folder,
            project,
            force,
        } => init::execute(folder, project, force),
        Pull { folder, project } => pull::execute(folder, project, &globals),
        Push {
            folder,
            project,
            dry_run,
        } => push::execute(folder, project, dry_run, &globals),
        Team { action } => match action {
            TeamAction::List { team, json } => team::list(team, json, &globals),
            TeamAction::Add {
                email,
                manager,
                team,
            } => team::add(&email, manager, team, &globals),
        },
        Migrate { folder, team, yes } => migrate::execute(folder, team, yes, &globals),
        Whoami => whoami::execute(&globals.connection),
        Completions { shell } => completions::execute(shell),
    }
}
