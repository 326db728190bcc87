use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://roster.db?mode=rwc";
pub const DEFAULT_MAX_BATCH: i64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("cannot resolve listen address {0}")]
    Address(String),
}

/// Process settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_batch: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_batch = parse_or("ROSTER_MAX_BATCH", lookup("ROSTER_MAX_BATCH"), DEFAULT_MAX_BATCH)?;
        if max_batch <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "ROSTER_MAX_BATCH",
                value: max_batch.to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            database_url,
            max_batch,
        })
    }

    /// `localhost` is not a literal address, so resolve through the system.
    pub fn listen_addr(&self, port: u16) -> Result<SocketAddr, ConfigError> {
        use std::net::ToSocketAddrs;

        let target = format!("{}:{}", self.host, port);
        target
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or(ConfigError::Address(target))
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
