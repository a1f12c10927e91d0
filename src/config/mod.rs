//! Configuration module for the presence cache.
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::cache::{CacheConfig, DEFAULT_MAX_CAPACITY, DEFAULT_TTL};
use crate::presence::IdentityKeyPolicy;
use crate::utils::parse_duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Lifetime of every cache entry, from write.
    pub cache_ttl: Duration,

    /// Maximum entries per table.
    pub cache_max_capacity: u64,

    /// Per-call bound on fallback queries. No bound when unset.
    pub fallback_timeout: Option<Duration>,

    /// Username keying of the identity table.
    pub identity_keys: IdentityKeyPolicy,

    /// JSON snapshot seeding the in-memory source (probe binary only).
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            cache_max_capacity: DEFAULT_MAX_CAPACITY,
            fallback_timeout: None,
            identity_keys: IdentityKeyPolicy::default(),
            snapshot_path: None,
        }
    }
}

impl Config {
    /// Load configuration from `.env` and environment variables.
    ///
    /// # Errors
    /// Returns error if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = var("CACHE_TTL") {
            config.cache_ttl = duration("CACHE_TTL", &raw)?;
            if config.cache_ttl.is_zero() {
                bail!("CACHE_TTL must be greater than zero");
            }
        }

        if let Some(raw) = var("CACHE_MAX_CAPACITY") {
            config.cache_max_capacity = raw
                .trim()
                .parse()
                .with_context(|| format!("CACHE_MAX_CAPACITY is not a number: {raw}"))?;
        }

        if let Some(raw) = var("FALLBACK_TIMEOUT") {
            config.fallback_timeout = Some(duration("FALLBACK_TIMEOUT", &raw)?);
        }

        if let Some(raw) = var("IDENTITY_KEYS") {
            config.identity_keys = match raw.trim().to_lowercase().as_str() {
                "probe-raw" => IdentityKeyPolicy::ProbeRaw,
                "lowercase" => IdentityKeyPolicy::Lowercase,
                other => bail!("IDENTITY_KEYS must be probe-raw or lowercase, got {other}"),
            };
        }

        config.snapshot_path = var("PRESENCE_SNAPSHOT").map(PathBuf::from);

        Ok(config)
    }

    /// Table configuration shared by every presence table.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::with_capacity(self.cache_max_capacity).ttl(self.cache_ttl)
    }
}

fn duration(key: &str, raw: &str) -> Result<Duration> {
    parse_duration(raw).with_context(|| format!("{key} is not a duration: {raw}"))
}
