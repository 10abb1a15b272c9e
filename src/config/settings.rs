//! Runtime settings read from the environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/enrollment";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Which `Store` backs the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    /// Process-local tables, lost on exit.
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreKind::Postgres),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => Err(ConfigError::Invalid {
                key: "APP_STORE",
                reason: format!("unknown store '{}' (expected postgres or memory)", other),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub store: StoreKind,
    /// Largest accepted request body in bytes.
    pub body_limit: usize,
}

impl Settings {
    /// DATABASE_URL, BIND_ADDR, DB_MAX_CONNECTIONS, APP_STORE, BODY_LIMIT_BYTES.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR)?;
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => parse("DB_MAX_CONNECTIONS", &v)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }
        let store = match get("APP_STORE") {
            Some(v) => v.parse()?,
            None => StoreKind::Postgres,
        };
        let body_limit = match get("BODY_LIMIT_BYTES") {
            Some(v) => parse("BODY_LIMIT_BYTES", &v)?,
            None => DEFAULT_BODY_LIMIT,
        };

        Ok(Settings {
            database_url,
            bind_addr,
            max_connections,
            store,
            body_limit,
        })
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: format!("'{}': {}", raw, e),
    })
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse(key, raw.as_deref().unwrap_or(default))
}
