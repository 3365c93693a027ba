use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::cli::{manage, Cli, Commands};
use crate::config::Config;
use crate::db::dbclient::DBClient;
use crate::handler::AppState;

mod cli;
mod config;
mod db;
mod error;
mod handler;
mod polls;
mod runtime;
mod support;
mod views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    runtime::init_logging(&config::log_filter());

    let config = Config::load()?;

    let db_client = DBClient::new(&config.database_url, config.max_connections).await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!(version = env!("CARGO_PKG_VERSION"), "Starting easyvote-web.");
            let bind_addr = config.bind_addr;
            handler::serve(AppState::new(db_client, &config), bind_addr).await?;
        }

        Commands::AddUser { username } => {
            let user = manage::add_user(&db_client, &username).await?;
            println!("Added user {} (#{}).", user.username, user.id);
        }

        Commands::RemoveUser { username } => {
            manage::remove_user(&db_client, &username).await?;
            println!("Removed user {}.", username);
        }

        Commands::AddPoll { text, start, end, choices } => {
            let question = manage::add_poll(&db_client, &text, start, end, &choices).await?;
            println!("Added poll #{}.", question.id);
        }

        Commands::RemovePoll { id } => {
            manage::remove_poll(&db_client, id).await?;
            println!("Removed poll #{}.", id);
        }

        Commands::ListPolls => {
            print!("{}", manage::list_polls(&db_client).await?);
        }
    }

    Ok(())
}
