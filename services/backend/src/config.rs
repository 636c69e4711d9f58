use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

/// Which store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" => Ok(StorageBackend::Postgres),
            other => anyhow::bail!("unknown storage backend {other:?} (memory|postgres)"),
        }
    }
}

/// Postgres connection settings. The URL may contain credentials; never log
/// it.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

// Backend configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
    /// Interval for the expired-booking sweep; 0 disables it.
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
struct BackendConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<String>,
    database_url: Option<String>,
    sweep_interval_secs: Option<u64>,
}

impl BackendConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("LODGE_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse LODGE_BIND")?;
        let metrics_bind = std::env::var("LODGE_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
            .parse()
            .with_context(|| "parse LODGE_METRICS_BIND")?;
        let storage = StorageBackend::parse(
            &std::env::var("LODGE_STORAGE").unwrap_or_else(|_| "memory".to_string()),
        )?;
        let postgres = match std::env::var("LODGE_DATABASE_URL") {
            Ok(url) => Some(PostgresConfig {
                url,
                max_connections: env_u32("LODGE_PG_MAX_CONNECTIONS", 16)?,
                acquire_timeout_ms: env_u64("LODGE_PG_ACQUIRE_TIMEOUT_MS", 5_000)?,
            }),
            Err(_) => None,
        };
        if storage == StorageBackend::Postgres && postgres.is_none() {
            anyhow::bail!("LODGE_STORAGE=postgres requires LODGE_DATABASE_URL");
        }
        let sweep_interval_secs = env_u64("LODGE_SWEEP_INTERVAL_SECS", 3_600)?;
        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            postgres,
            sweep_interval_secs,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("LODGE_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read LODGE_CONFIG: {path}"))?;
            let override_cfg: BackendConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse backend config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.storage {
                config.storage = StorageBackend::parse(&value)?;
            }
            if let Some(url) = override_cfg.database_url {
                config.postgres = Some(PostgresConfig {
                    url,
                    max_connections: env_u32("LODGE_PG_MAX_CONNECTIONS", 16)?,
                    acquire_timeout_ms: env_u64("LODGE_PG_ACQUIRE_TIMEOUT_MS", 5_000)?,
                });
            }
            if let Some(value) = override_cfg.sweep_interval_secs {
                config.sweep_interval_secs = value;
            }
        }
        Ok(config)
    }
}

fn env_u32(key: &str, default: u32) -> Result<u32> {
    match std::env::var(key) {
        Ok(value) => value.parse().with_context(|| format!("parse {key}")),
        Err(_) => Ok(default),
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(value) => value.parse().with_context(|| format!("parse {key}")),
        Err(_) => Ok(default),
    }
}
