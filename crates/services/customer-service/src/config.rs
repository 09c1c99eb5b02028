//! Customer service configuration.

use std::env;
use std::str::FromStr;

use common::{DatabaseConfig, ServiceConfig};

/// Storage backend the customer repository is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StorageBackend {
    /// Mutex-guarded list seeded with sample customers
    #[default]
    Memory,
    /// Relational database reached through `DatabaseConfig::url`
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "list" => Ok(StorageBackend::Memory),
            "postgres" | "database" | "db" => Ok(StorageBackend::Postgres),
            other => Err(format!("unknown storage backend [{}]", other)),
        }
    }
}

/// Customer service configuration.
#[derive(Debug, Clone)]
pub struct CustomerServiceConfig {
    pub service: ServiceConfig,
    pub backend: StorageBackend,
    pub database: DatabaseConfig,
}

impl CustomerServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend = match env::var("CUSTOMER_SERVICE_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|e: String| {
                tracing::warn!("{}, falling back to {:?}", e, defaults.backend);
                defaults.backend
            }),
            Err(_) => defaults.backend,
        };

        Self {
            service: ServiceConfig {
                service_name: defaults.service.service_name,
                log_level: env::var("LOG_LEVEL").unwrap_or(defaults.service.log_level),
            },
            backend,
            database: DatabaseConfig {
                url: env::var("CUSTOMER_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.database.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.database.min_connections),
            },
        }
    }
}

impl Default for CustomerServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "customer-service".to_string(),
                ..ServiceConfig::default()
            },
            backend: StorageBackend::default(),
            database: DatabaseConfig::default(),
        }
    }
}
