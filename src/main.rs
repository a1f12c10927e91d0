//! Presence Probe - resolve presence lookups against a snapshot.
//!
//! Seeds an in-memory presence store from `PRESENCE_SNAPSHOT`, puts the
//! read-through cache in front of it and answers each query given on the
//! command line (`proxy:<name>`, `server:<name>`, `player:<name|uuid>`),
//! printing one JSON line per query.

use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use presence_cache::config::Config;
use presence_cache::presence::{CacheManager, LookupError, MemorySource};
use presence_cache::utils::{parse_query, Query};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("presence_cache=info,presence_probe=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    let queries: Vec<Query> = std::env::args()
        .skip(1)
        .map(|arg| parse_query(&arg).with_context(|| format!("invalid query: {arg}")))
        .collect::<anyhow::Result<_>>()?;
    if queries.is_empty() {
        bail!("usage: presence-probe <proxy:NAME | server:NAME | player:NAME|UUID>...");
    }

    let Some(path) = &config.snapshot_path else {
        bail!("PRESENCE_SNAPSHOT must be set");
    };
    let source = Arc::new(MemorySource::load(path)?);
    info!("Snapshot loaded from {}", path.display());

    let mut cache = CacheManager::new(source, config.cache_config())
        .with_identity_keys(config.identity_keys);
    if let Some(timeout) = config.fallback_timeout {
        cache = cache.with_fallback_timeout(timeout);
    }

    for query in &queries {
        let line = match resolve(&cache, query).await {
            Ok(value) => json!({ "query": query.kind(), "key": key_of(query), "result": value }),
            Err(e) => {
                warn!("Lookup failed: {}", e);
                json!({ "query": query.kind(), "key": key_of(query), "error": e.to_string() })
            }
        };
        println!("{line}");
    }

    let stats = cache.stats().await;
    info!("Cache entries: {:?}", stats);

    Ok(())
}

/// Run one query; `Value::Null` means not found.
async fn resolve(cache: &CacheManager, query: &Query) -> Result<Value, LookupError> {
    let value = match query {
        Query::Proxy(proxy) => cache
            .online_players(proxy)
            .await?
            .map(|names| {
                let mut names: Vec<_> = names.iter().cloned().collect();
                names.sort();
                json!(names)
            }),
        Query::Server(server) => cache
            .online_players_in_server(server)
            .await?
            .map(|ids| {
                let mut ids: Vec<_> = ids.iter().copied().collect();
                ids.sort();
                json!(ids)
            }),
        Query::PlayerName(name) => cache
            .player_data_by_name(name)
            .await?
            .map(|data| json!(*data)),
        Query::PlayerId(uuid) => cache.player_data(*uuid).await?.map(|data| json!(*data)),
    };

    Ok(value.unwrap_or(Value::Null))
}

fn key_of(query: &Query) -> String {
    match query {
        Query::Proxy(key) | Query::Server(key) | Query::PlayerName(key) => key.clone(),
        Query::PlayerId(uuid) => uuid.to_string(),
    }
}
