use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::types::{BugStatus, Role, Severity};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

#[derive(Parser)]
#[command(name = "bugtrack")]
#[command(about = "A CLI for the bug tracker", version)]
#[command(after_help = "EXAMPLES:
    bugtrack login -u dana --role developer    Start a session
    bugtrack dashboard                         Bug counts and quick actions
    bugtrack bugs                              List bugs
    bugtrack bug start 12                      Start working on a bug
    bugtrack bug assign 12 7                   Assign a bug (admin)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, compact)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show detailed error information and debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a session for an authenticated user
    #[command(after_help = "EXAMPLES:
    bugtrack login -u dana --role developer --token eyJhbGci...
    BUGTRACK_TOKEN=eyJhbGci... bugtrack login -u root --role admin")]
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show the logged-in user and role
    Whoami,
    /// Bug counts and the actions available to your role
    #[command(alias = "d")]
    Dashboard,
    /// Manage bugs
    #[command(
        alias = "b",
        after_help = "EXAMPLES:
    bugtrack bug list
    bugtrack bug create -t \"Login button not working\" -d \"Nothing happens\" --severity high
    bugtrack bug start 12
    bugtrack bug resolve 12
    bugtrack bug approve 12
    bugtrack bug assign 12 7"
    )]
    Bug {
        #[command(subcommand)]
        action: BugCommands,
    },
    /// List bugs (alias for 'bug list')
    Bugs(BugListArgs),
    /// List developers available for assignment
    Developers,
    /// Bugs with assignees and pending approvals (admin)
    Admin,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    bugtrack completions bash > ~/.bash_completion.d/bugtrack
    bugtrack completions zsh > ~/.zfunc/_bugtrack")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

impl Commands {
    /// Whether the command talks to the API, and so needs the config and a client.
    pub fn needs_api(&self) -> bool {
        !matches!(
            self,
            Commands::Login(_)
                | Commands::Logout
                | Commands::Whoami
                | Commands::Completions { .. }
                | Commands::Init
        )
    }
}

#[derive(Subcommand)]
pub enum BugCommands {
    /// List bugs visible to you
    #[command(alias = "ls")]
    List(BugListArgs),
    /// Show bug details
    #[command(alias = "v")]
    Show {
        /// Bug ID
        id: String,
    },
    /// Submit a new bug report
    #[command(alias = "c")]
    Create(BugCreateArgs),
    /// Start working on an open bug
    Start {
        /// Bug ID
        id: String,
    },
    /// Mark a bug in progress as resolved
    Resolve {
        /// Bug ID
        id: String,
    },
    /// Approve a resolved fix
    Approve {
        /// Bug ID
        id: String,
    },
    /// Move a bug to an explicit status
    Transition {
        /// Bug ID
        id: String,
        /// Requested status
        #[arg(value_enum)]
        status: BugStatus,
    },
    /// Assign a bug to a developer
    Assign {
        /// Bug ID
        id: String,
        /// Developer ID (see 'bugtrack developers')
        developer: String,
    },
}

#[derive(Args, Clone)]
pub struct LoginArgs {
    /// Username
    #[arg(long, short)]
    pub username: String,

    /// Role granted by the server
    #[arg(long, value_enum)]
    pub role: Role,

    /// Bearer token (falls back to BUGTRACK_TOKEN, then a prompt)
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Args, Clone)]
pub struct BugListArgs {
    /// Only show bugs in this status
    #[arg(long, value_enum)]
    pub status: Option<BugStatus>,

    /// Only show bugs you can act on
    #[arg(long)]
    pub actionable: bool,
}

#[derive(Args)]
pub struct BugCreateArgs {
    /// Bug title
    #[arg(long, short)]
    pub title: String,

    /// What happened and what you expected
    #[arg(long, short)]
    pub description: String,

    /// How serious the bug is
    #[arg(long, short, value_enum, default_value = "low")]
    pub severity: Severity,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> Commands {
        Cli::try_parse_from(std::iter::once("bugtrack").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_local_commands_skip_api() {
        for args in [
            &["whoami"][..],
            &["logout"],
            &["init"],
            &["completions", "bash"],
            &["login", "-u", "dana", "--role", "developer", "--token", "t"],
        ] {
            assert!(!command(args).needs_api(), "{args:?}");
        }
    }

    #[test]
    fn test_bug_commands_need_api() {
        for args in [
            &["dashboard"][..],
            &["bugs"],
            &["developers"],
            &["admin"],
            &["bug", "start", "12"],
            &["bug", "assign", "12", "7"],
        ] {
            assert!(command(args).needs_api(), "{args:?}");
        }
    }

    #[test]
    fn test_json_flag_overrides_format() {
        let cli = Cli::try_parse_from(["bugtrack", "--json", "-o", "compact", "bugs"]).unwrap();
        assert!(matches!(cli.output_format(), OutputFormat::Json));
    }
}
