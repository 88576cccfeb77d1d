//! PostgreSQL pool setup.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use folio_core::{Error, Result};

/// Sizing and timeouts for the note store's connection pool.
///
/// The server issues one short query per request, so a small pool is plenty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    /// Idle connections above `min_connections` are closed after this long.
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read pool settings from the environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DB_MAX_CONNECTIONS` | `5` |
    /// | `DB_MIN_CONNECTIONS` | `0` |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `10` |
    ///
    /// Unparseable values fall back to the default. `min` is clamped to `max`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max = env_parse::<u32>("DB_MAX_CONNECTIONS")
            .unwrap_or(defaults.max_connections)
            .max(1);
        let min = env_parse::<u32>("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections);
        let acquire = env_parse::<u64>("DB_ACQUIRE_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.acquire_timeout);

        defaults
            .max_connections(max)
            .min_connections(min)
            .acquire_timeout(acquire)
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n.max(1);
        self.min_connections = self.min_connections.min(self.max_connections);
        self
    }

    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n.min(self.max_connections);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
    }
}

/// Open a pool against `database_url`.
pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    let start = Instant::now();
    let pool = config
        .options()
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        pool_size = pool.size(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Database pool ready"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_min_within_max() {
        let config = PoolConfig::new().max_connections(2).min_connections(8);
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.min_connections, 2);

        let config = PoolConfig::new().min_connections(3).max_connections(1);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    fn test_zero_max_is_raised_to_one() {
        assert_eq!(PoolConfig::new().max_connections(0).max_connections, 1);
    }
}
