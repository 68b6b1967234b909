//! Configuration loading and resolution.
//!
//! Every setting resolves the same way: explicit CLI flag, then environment
//! variable, then built-in default.

use anyhow::Context;
use fiagro_core::cache::DEFAULT_TTL;
use fiagro_core::fetcher::DEFAULT_SITE_URL;
use fiagro_core::registry::DEFAULT_REGISTRY_URL;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3001";

pub const ENV_ADDR: &str = "FIAGRO_ADDR";
pub const ENV_SITE_URL: &str = "FIAGRO_SITE_URL";
pub const ENV_REGISTRY_URL: &str = "FIAGRO_REGISTRY_URL";
pub const ENV_CACHE_TTL: &str = "FIAGRO_CACHE_TTL";

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub site_url: Option<String>,
    pub registry_url: Option<String>,
    pub cache_ttl_secs: Option<u64>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub site_url: String,
    pub registry_url: String,
    pub cache_ttl: Duration,
}

impl ServerConfig {
    pub fn resolve(overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        Ok(Self {
            addr: resolve_addr(overrides.addr.as_deref())?,
            site_url: resolve_site_url(overrides.site_url.as_deref()),
            registry_url: resolve_registry_url(overrides.registry_url.as_deref()),
            cache_ttl: resolve_cache_ttl(overrides.cache_ttl_secs)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            site_url: DEFAULT_SITE_URL.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            cache_ttl: DEFAULT_TTL,
        }
    }
}

/// Resolve the REST bind address.
pub fn resolve_addr(explicit: Option<&str>) -> anyhow::Result<SocketAddr> {
    let raw = pick(explicit, ENV_ADDR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
    raw.parse()
        .with_context(|| format!("invalid bind address {raw:?}"))
}

/// Resolve the marketing site root.
pub fn resolve_site_url(explicit: Option<&str>) -> String {
    pick(explicit, ENV_SITE_URL).unwrap_or_else(|| DEFAULT_SITE_URL.to_string())
}

/// Resolve the registry listing endpoint.
pub fn resolve_registry_url(explicit: Option<&str>) -> String {
    pick(explicit, ENV_REGISTRY_URL).unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string())
}

/// Resolve the list cache TTL, in seconds.
pub fn resolve_cache_ttl(explicit: Option<u64>) -> anyhow::Result<Duration> {
    if let Some(secs) = explicit {
        return Ok(Duration::from_secs(secs));
    }

    match env_value(ENV_CACHE_TTL) {
        Some(raw) => {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("{ENV_CACHE_TTL} must be a number of seconds, got {raw:?}"))?;
            Ok(Duration::from_secs(secs))
        }
        None => Ok(DEFAULT_TTL),
    }
}

fn pick(explicit: Option<&str>, key: &str) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| env_value(key))
}

/// Blank variables count as unset.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
