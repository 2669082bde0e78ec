use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List cached auth states and their validity.
    AuthList,
    /// Delete the cached auth state for one key.
    AuthClear { key: String },
    /// Delete every cached auth state.
    AuthClearAll,
    /// Send a test message to the configured chat webhook.
    NotifyTest { message: String },
}
