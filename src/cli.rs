use clap::{Parser, Subcommand};

/// Bet tracking backend
#[derive(Parser, Debug)]
#[command(name = "bettracker")]
#[command(author, version, about = "Bet tracking backend: bets, bankrolls, budgets and statistics")]
pub struct Cli {
    /// Directory holding default.toml and per-environment overrides
    #[arg(short, long, global = true, default_value = "config", env = "BETTRACKER_CONFIG_DIR")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run migrations and serve the REST API
    Serve {
        /// Skip running migrations on startup
        #[arg(long)]
        no_migrate: bool,
    },

    /// Apply database migrations and exit
    Migrate,

    /// Create (or find) a user by email and print a bearer token for it
    Token {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: Option<String>,
    },
}
