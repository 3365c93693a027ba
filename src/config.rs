use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use tracing::info;

pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// Cap on the listing; `None` shows every published poll.
    pub index_limit: Option<usize>,
    pub identity_header: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let index_limit: usize = try_load("EASYVOTE_INDEX_LIMIT", "5")?;

        Ok(Self {
            database_url: try_load("EASYVOTE_DATABASE_URL", "sqlite://easyvote.db")?,
            bind_addr: try_load("EASYVOTE_BIND_ADDR", "0.0.0.0:8000")?,
            max_connections: try_load("EASYVOTE_MAX_CONNECTIONS", "5")?,
            index_limit: (index_limit > 0).then_some(index_limit),
            identity_header: try_load::<String>("EASYVOTE_IDENTITY_HEADER", "x-remote-user")?.to_lowercase(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://easyvote.db".to_owned(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            max_connections: 5,
            index_limit: Some(5),
            identity_header: "x-remote-user".to_owned(),
        }
    }
}

/// Read before logging is initialised, so it cannot go through `try_load`.
pub fn log_filter() -> String {
    env::var("EASYVOTE_LOG").unwrap_or_else(|_| "info".to_owned())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });

    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid value for {key}: {raw:?}"))
}
