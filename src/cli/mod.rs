pub mod commands;
pub mod output;

use crate::errors::Result;
use crate::git::DiffTool;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "sf")]
#[command(about = "Stackforest - keep stacked git branches in a tree and rebase them together")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Every user command. Aliases resolve to their variant before dispatch.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize the branch tree in the current repository
    Init {
        /// Trunk branch the tree starts from
        #[arg(long)]
        trunk: Option<String>,

        /// Also track existing local branches, linking them by commit parentage
        #[arg(long)]
        adopt: bool,
    },

    /// Show the branch tree with the latest commit of every branch
    #[command(visible_aliases = ["ll", "l"])]
    Xl,

    /// Commit outstanding changes as a new branch on top of the current one
    #[command(visible_alias = "ci")]
    Commit {
        /// Branch name. If not specified, the next available number is used
        #[arg(long)]
        branch_name: Option<String>,
    },

    /// Amend the current branch
    Amend,

    /// Delete a branch, keeping its sub-branches as new roots
    #[command(visible_aliases = ["d", "delete"])]
    Prune {
        /// Branch to delete
        branch_name: String,
    },

    /// Rebase a branch with its sub-branches (the whole chain) on top of another branch
    Rebase {
        /// Branch to move
        #[arg(long, short)]
        source: String,

        /// Branch to move it onto
        #[arg(long, short)]
        dest: String,
    },

    /// Switch the working directory to a branch
    #[command(visible_alias = "up")]
    Update {
        /// Branch to switch to
        branch_name: String,
    },

    /// Pull the trunk branch from its remote
    Sync,

    /// Diff the working tree against the parent branch
    Diff {
        /// Extra arguments passed to git diff
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Diff against the parent branch using git difftool
    Difftool {
        /// Extra arguments passed to git difftool
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Rename the current branch
    ChangeBranchName {
        /// New name. If not specified, the branch's tree index is used
        #[arg(long)]
        new_name: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Set a configuration value
    Set {
        /// Configuration key (trunk_branch, tree_file, verbose_commands)
        key: String,
        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// List all configuration values
    List,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        // Set up logging based on verbosity
        self.setup_logging();

        match self.command {
            Commands::Init { trunk, adopt } => commands::init::run(trunk, adopt),
            Commands::Xl => commands::tree::run(),
            Commands::Commit { branch_name } => commands::branch::commit(branch_name),
            Commands::Amend => commands::branch::amend(),
            Commands::Prune { branch_name } => commands::branch::prune(&branch_name),
            Commands::Rebase { source, dest } => commands::rebase::run(&source, &dest),
            Commands::Update { branch_name } => commands::branch::update(&branch_name),
            Commands::Sync => commands::sync::run(),
            Commands::Diff { args } => commands::diff::run(DiffTool::Diff, &args),
            Commands::Difftool { args } => commands::diff::run(DiffTool::Difftool, &args),
            Commands::ChangeBranchName { new_name } => commands::branch::rename(new_name),
            Commands::Config { action } => commands::config::run(action),
            Commands::Completions { shell } => commands::completions::generate(shell),
        }
    }

    fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .without_time();

        if self.no_color {
            subscriber.with_ansi(false).init();
        } else {
            subscriber.init();
        }
    }
}
