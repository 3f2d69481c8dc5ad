//! MySQL connection factory.
//!
//! Builds a `sqlx` connection pool from the captured options. Pool sizing maps
//! onto the pool as follows:
//! - `max_open_conns` becomes the pool's connection cap (0 keeps the default cap).
//! - `max_idle_conns` is an upper bound on idle connections. The pool never
//!   keeps a floor of open connections, and idle ones are closed by the idle
//!   reaper. sqlx has no idle-count cap, so with 0 idle connections allowed
//!   they are reaped after [`DATABASE_NO_IDLE_TIMEOUT`], otherwise after
//!   sqlx's default idle timeout.
//! - `max_conn_lifetime_secs` becomes the maximum lifetime of a connection
//!   (0 disables recycling).
use std::{fmt, time::Duration};

use async_trait::async_trait;
use log::{debug, error};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::{
    constants::{
        DATABASE_CHARSET, DATABASE_NO_IDLE_TIMEOUT, DEFAULT_DATABASE_CONNECT_TIMEOUT_MS,
        DEFAULT_DATABASE_PORT,
    },
    models::{ResourceError, SecretString},
};

use super::ResourceFactory;

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConnectionOptions {
    pub username: String,
    pub password: SecretString,
    pub database: String,
    /// `host` or `host:port`.
    pub host: String,
    pub max_idle_conns: u64,
    pub max_open_conns: u64,
    pub max_conn_lifetime_secs: u64,
    pub connect_timeout: Duration,
}

impl DatabaseConnectionOptions {
    pub fn default_connect_timeout() -> Duration {
        Duration::from_millis(DEFAULT_DATABASE_CONNECT_TIMEOUT_MS)
    }

    /// Connection target, split from `host`.
    pub fn connect_options(&self) -> Result<MySqlConnectOptions, ResourceError> {
        let (host, port) = split_host_port(&self.host)?;
        let password = self.password.to_str();

        Ok(MySqlConnectOptions::new()
            .host(host)
            .port(port)
            .username(&self.username)
            .password(&password)
            .database(&self.database)
            .charset(DATABASE_CHARSET))
    }

    pub fn pool_options(&self) -> MySqlPoolOptions {
        let mut pool = MySqlPoolOptions::new()
            .acquire_timeout(self.connect_timeout)
            .min_connections(0);

        if self.max_open_conns > 0 {
            pool = pool.max_connections(saturating_u32(self.max_open_conns));
        }
        if self.max_idle_conns == 0 {
            pool = pool.idle_timeout(DATABASE_NO_IDLE_TIMEOUT);
        }
        let max_lifetime = (self.max_conn_lifetime_secs > 0)
            .then(|| Duration::from_secs(self.max_conn_lifetime_secs));

        pool.max_lifetime(max_lifetime)
    }

    /// Connection target without the password, for logs and error context.
    pub fn redacted_url(&self) -> String {
        format!("mysql://{}@{}/{}", self.username, self.host, self.database)
    }
}

fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn split_host_port(host: &str) -> Result<(&str, u16), ResourceError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ResourceError::invalid_option("databaseHost", "host is empty"));
    }

    // Bracketed IPv6 literal, e.g. `[::1]:3306`.
    if let Some(rest) = host.strip_prefix('[') {
        let (address, tail) = rest
            .split_once(']')
            .ok_or_else(|| ResourceError::invalid_option("databaseHost", "unclosed '['"))?;
        let port = match tail.strip_prefix(':') {
            Some(port) => parse_port(port)?,
            None if tail.is_empty() => DEFAULT_DATABASE_PORT,
            None => {
                return Err(ResourceError::invalid_option(
                    "databaseHost",
                    format!("unexpected trailing text {:?}", tail),
                ))
            }
        };
        return Ok((address, port));
    }

    match host.rsplit_once(':') {
        // A bare IPv6 address has more than one ':' and carries no port.
        Some((name, _)) if name.contains(':') => Ok((host, DEFAULT_DATABASE_PORT)),
        Some((name, port)) => Ok((name, parse_port(port)?)),
        None => Ok((host, DEFAULT_DATABASE_PORT)),
    }
}

fn parse_port(port: &str) -> Result<u16, ResourceError> {
    port.parse::<u16>().map_err(|e| {
        ResourceError::invalid_option("databaseHost", format!("invalid port {:?}: {}", port, e))
    })
}

/// Deferred constructor for database handles.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseFactory {
    options: DatabaseConnectionOptions,
}

impl DatabaseFactory {
    pub fn new(options: DatabaseConnectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DatabaseConnectionOptions {
        &self.options
    }
}

#[async_trait]
impl ResourceFactory for DatabaseFactory {
    type Resource = Database;

    async fn open(&self) -> Result<Database, ResourceError> {
        let target = self.options.redacted_url();
        let connect_options = self.options.connect_options()?;

        debug!("Opening database pool at {}", target);
        let pool = self
            .options
            .pool_options()
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                error!("Failed to open database pool at {}: {}", target, e);
                ResourceError::Database(e)
            })?;

        Ok(Database { pool })
    }
}

/// Owned database pool returned by [`DatabaseFactory::open`].
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Round-trips a trivial query.
    pub async fn ping(&self) -> Result<(), ResourceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Closes every connection in the pool.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .finish()
    }
}
