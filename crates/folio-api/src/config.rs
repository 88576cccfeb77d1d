//! Server configuration read from the environment.

use folio_core::defaults::{DATABASE_URL, MAX_BODY_BYTES, SERVER_HOST, SERVER_PORT};
use folio_core::{Error, Result};

/// Where notes are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(Error::Config(format!(
                "FOLIO_STORAGE must be \"postgres\" or \"memory\", got \"{}\"",
                other
            ))),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub storage: StorageBackend,
    /// Seed the in-memory store with a welcome note.
    pub seed_welcome: bool,
    /// Raw comma-separated CORS origin list.
    pub allowed_origins: String,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: SERVER_HOST.to_string(),
            port: SERVER_PORT,
            database_url: DATABASE_URL.to_string(),
            storage: StorageBackend::Postgres,
            seed_welcome: true,
            allowed_origins: String::new(),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `HOST` | `0.0.0.0` | Bind address |
    /// | `PORT` | `5000` | Bind port |
    /// | `DATABASE_URL` | `postgres://localhost/folio` | PostgreSQL connection |
    /// | `FOLIO_STORAGE` | `postgres` | `postgres` or `memory` |
    /// | `FOLIO_SEED_WELCOME` | `true` | Welcome note in the memory store |
    /// | `ALLOWED_ORIGINS` | localhost origins | Comma-separated CORS whitelist |
    /// | `MAX_BODY_BYTES` | `52428800` | Request body limit |
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let database_url = std::env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let storage = match std::env::var("FOLIO_STORAGE") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.storage,
        };
        let seed_welcome = std::env::var("FOLIO_SEED_WELCOME")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(defaults.seed_welcome);
        let allowed_origins = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let max_body_bytes = std::env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.max_body_bytes);

        Ok(Self {
            host,
            port,
            database_url,
            storage,
            seed_welcome,
            allowed_origins,
            max_body_bytes,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
