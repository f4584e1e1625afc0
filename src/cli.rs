//! CLI argument parsing.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "catalog",
    about = "Book catalog service with GraphQL and REST APIs",
    version,
    after_help = "Configuration is read from the environment (and a .env file if present)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Create a login user
    CreateUser {
        /// Username (case-insensitive, must be unique)
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long, env = "CATALOG_USER_PASSWORD")]
        password: String,
    },

    /// Print the GraphQL schema (SDL) and exit
    PrintSchema,
}

impl Cli {
    /// The subcommand to run, `serve` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
