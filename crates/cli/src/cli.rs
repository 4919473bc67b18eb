use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "git-hop",
    version,
    about = "Cycle through your most recently used git branches"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the configuration file
    Setup,

    /// Install the post-checkout git hook in the current repository
    Install,

    /// Manually add a branch to tracking
    Add {
        /// Branch name to track
        branch: String,

        /// Skip checking that the branch exists in the repository
        #[arg(long)]
        no_verify: bool,
    },

    /// List tracked branches for the current project
    List,

    /// Jump to the next branch, or to a specific index from `list`
    Jump {
        /// 1-based index from `git-hop list`; cycles when omitted
        index: Option<i64>,
    },

    /// Clear tracked branches not matching the keep patterns
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show current status and configuration
    Status,

    /// Entry point for installed git hooks
    #[command(hide = true)]
    Hook {
        #[command(subcommand)]
        hook: HookCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum HookCommand {
    /// Invoked by .git/hooks/post-checkout
    PostCheckout {
        prev_head: String,
        new_head: String,
        /// "1" for branch checkouts, "0" for file checkouts
        flag: String,
    },
}
