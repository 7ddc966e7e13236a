use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hisab")]
#[command(about = "Split bills with the people you share expenses with")]
pub struct Cli {
    /// Path to the client config (defaults to ~/.hisab/config.json)
    #[arg(long, env = "HISAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the local data file (overrides the config)
    #[arg(long, env = "HISAB_DATA")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Account commands
    User {
        #[command(subcommand)]
        user_cmd: UserCommand,
    },
    /// List the people and groups you share expenses with
    Contacts,
    /// Group commands
    Group {
        #[command(subcommand)]
        group_cmd: GroupCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register an account in the local data file
    Add {
        /// Account id
        id: String,
        /// Display name
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// List all accounts
    List,
    /// Act as this account from now on
    Use {
        /// Account id
        id: String,
    },
    /// Show the signed-in account
    Whoami,
    /// Search accounts by name or email
    Search {
        /// Search text
        query: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// Create a group with you and the given members
    Create {
        /// Group name
        #[arg(long)]
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Member to add, found by searching name or email (repeatable)
        #[arg(long = "member", short = 'm')]
        members: Vec<String>,
    },
}
