use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::db::dbclient::DBClient;
use crate::views;

#[derive(Clone)]
pub struct AppState {
    pub db_client: Arc<DBClient>,
    pub index_limit: Option<usize>,
    pub identity_header: Arc<str>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: &Config) -> Self {
        let db_client = Arc::new(db_client);

        Self {
            db_client,
            index_limit: config.index_limit,
            identity_header: Arc::from(config.identity_header.as_str()),
        }
    }
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = views::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested.");
    }
}
