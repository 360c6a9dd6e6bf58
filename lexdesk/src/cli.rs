use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lexdesk")]
#[command(about = "Terminal client for the LexDesk legal CRM")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Commands {
    /// Connect to the CRM and read page events from stdin (default)
    Run,
    /// Print config path and create default file if missing
    ConfigPath,
}

impl Cli {
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Run)
    }
}
