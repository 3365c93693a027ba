use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

pub mod manage;

#[derive(Parser)]
#[command(name = "easyvote-web")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Poll server and poll management commands", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Register a user who may vote
    AddUser {
        username: String,
    },

    /// Delete a user together with their votes
    RemoveUser {
        username: String,
    },

    /// Create a poll and its choices
    AddPoll {
        /// The question voters are asked
        #[arg(long)]
        text: String,

        /// When voting opens (RFC 3339); defaults to now
        #[arg(long, value_parser = parse_timestamp)]
        start: Option<DateTime<Utc>>,

        /// When voting closes (RFC 3339)
        #[arg(long, value_parser = parse_timestamp)]
        end: DateTime<Utc>,

        /// A selectable choice; repeat for each one
        #[arg(long = "choice", required = true)]
        choices: Vec<String>,
    },

    /// Delete a poll with its choices and votes
    RemovePoll {
        id: i64,
    },

    /// Print every poll with its state and tally
    ListPolls,
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|v| v.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp such as 2024-05-01T12:00:00Z: {}", e))
}
