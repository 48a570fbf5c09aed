//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a dotsync command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME and XDG_CONFIG_HOME inside the temporary home directory
    /// - the file vault as server
    /// - the current directory set to the test project directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("dotsync").expect("failed to find dotsync binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        cmd.env("DOTSYNC_SERVER", self.server());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("DOTSYNC_TOKEN");
        cmd.env_remove("DOTSYNC_KEY");
        cmd.env_remove("DOTSYNC_LOG");
        cmd.env_remove("DOTSYNC_TIMEOUT");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run dotsync with arguments and capture the output.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run dotsync")
    }

    /// Shortcut for `dotsync init <folder> --type <kind>`.
    pub fn init_cmd(&self, folder: &str, kind: &str) -> Output {
        self.run(&["init", folder, "--type", kind])
    }

    /// Shortcut for `dotsync pull`.
    pub fn pull(&self) -> Output {
        self.run(&["pull"])
    }

    /// Shortcut for `dotsync push`.
    pub fn push(&self) -> Output {
        self.run(&["push"])
    }

    /// Shortcut for `dotsync push --dry-run`.
    pub fn push_dry_run(&self) -> Output {
        self.run(&["push", "--dry-run"])
    }

    /// Shortcut for `dotsync team list --team <team>`.
    pub fn team_list(&self, team: &str) -> Output {
        self.run(&["team", "list", "--team", team])
    }

    /// Shortcut for `dotsync team list --team <team> --json`.
    pub fn team_list_json(&self, team: &str) -> Output {
        self.run(&["team", "list", "--team", team, "--json"])
    }

    /// Shortcut for `dotsync team add <email> --team <team>`.
    pub fn team_add(&self, email: &str, team: &str) -> Output {
        self.run(&["team", "add", email, "--team", team])
    }

    /// Shortcut for `dotsync migrate --team <team> --yes`.
    pub fn migrate(&self, team: &str) -> Output {
        self.run(&["migrate", "--team", team, "--yes"])
    }
}
