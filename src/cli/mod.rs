//! Command-line interface, parsed with clap.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::{cmd_leaderboard, cmd_register, cmd_reset, cmd_stats};

/// Upsen - activity leaderboard for Termux tool users
#[derive(Parser)]
#[command(name = "upsen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server and snapshot flush job (default)
    #[command(alias = "daemon", alias = "-d", alias = "--daemon")]
    Serve,

    /// Record one activity for a user
    #[command(alias = "login")]
    Register {
        /// Device user name, as reported by `whoami`
        user_id: String,
    },

    /// Print the current leaderboard
    #[command(alias = "lb", alias = "top")]
    Leaderboard {
        /// Number of users to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print store statistics
    Stats,

    /// Clear usage and active-day counters for every user
    Reset,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}
