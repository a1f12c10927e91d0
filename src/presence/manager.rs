//! Read-through cache over the presence store.
//!
//! Four expiring tables sit in front of a [`PresenceSource`]:
//! - online names by proxy (keys lowercased)
//! - online identities by server (keys as given, absent answers cached)
//! - identity by username (the index behind name lookups)
//! - player data by identity
//!
//! Each table loads through moka's `try_get_with`, so concurrent misses for
//! one key share a single fallback call. Failed calls are never stored.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{CacheConfig, TypedCache};
use super::error::{LookupError, LookupResult, SourceError, SourceResult, Table};
use super::models::{OnlineIds, OnlineNames, PlayerData};
use super::source::PresenceSource;

/// How usernames are keyed in the identity table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityKeyPolicy {
    /// Store lowercased, probe and query with the name as given.
    /// A name with uppercase letters never hits its own entry.
    #[default]
    ProbeRaw,
    /// Probe, store and query lowercased.
    Lowercase,
}

/// Approximate per-table entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub online_by_proxy: u64,
    pub online_by_server: u64,
    pub uuid_by_name: u64,
    pub data_by_uuid: u64,
}

/// Why a single-flight load stored nothing.
enum Miss {
    Absent,
    Failed(SourceError),
}

/// Presence cache manager.
///
/// Cloning is cheap; clones share the same tables and source.
#[derive(Clone)]
pub struct CacheManager {
    source: Arc<dyn PresenceSource>,
    online_by_proxy: TypedCache<String, OnlineNames>,
    online_by_server: TypedCache<String, Option<OnlineIds>>,
    uuid_by_name: TypedCache<String, Uuid>,
    data_by_uuid: TypedCache<Uuid, Arc<PlayerData>>,
    identity_keys: IdentityKeyPolicy,
    fallback_timeout: Option<Duration>,
}

impl CacheManager {
    /// Create a manager with four empty tables sharing `config`.
    pub fn new(source: Arc<dyn PresenceSource>, config: CacheConfig) -> Self {
        info!(
            "Presence cache initialized (ttl {:?}, capacity {} per table)",
            config.ttl, config.max_capacity
        );

        Self {
            source,
            online_by_proxy: TypedCache::new(Table::OnlineByProxy.name(), &config),
            online_by_server: TypedCache::new(Table::OnlineByServer.name(), &config),
            uuid_by_name: TypedCache::new(Table::UuidByName.name(), &config),
            data_by_uuid: TypedCache::new(Table::DataByUuid.name(), &config),
            identity_keys: IdentityKeyPolicy::default(),
            fallback_timeout: None,
        }
    }

    /// Set how usernames are keyed in the identity table.
    #[must_use]
    pub fn with_identity_keys(mut self, policy: IdentityKeyPolicy) -> Self {
        self.identity_keys = policy;
        self
    }

    /// Bound every fallback call by `timeout`.
    #[must_use]
    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = Some(timeout);
        self
    }

    /// Names of the players online on `proxy` (case-insensitive).
    pub async fn online_players(&self, proxy: &str) -> LookupResult<OnlineNames> {
        let key = proxy.to_lowercase();
        let load = async {
            let names = self.source.online_names_for_proxy(&key).await?;
            Ok::<_, SourceError>(names.map(Arc::new))
        };
        self.read_through(Table::OnlineByProxy, &self.online_by_proxy, key.clone(), load)
            .await
    }

    /// Identities of the players online on `server`.
    ///
    /// Unlike the other tables, an absent answer is cached too and served
    /// until it expires.
    pub async fn online_players_in_server(&self, server: &str) -> LookupResult<OnlineIds> {
        let table = Table::OnlineByServer;
        let load = self.fetch(table, server, async {
            let ids = self.source.online_ids_for_server(server).await?;
            Ok::<_, SourceError>(ids.map(Arc::new))
        });

        self.online_by_server
            .get_or_try_insert_with(server.to_string(), load)
            .await
            .map_err(|err| LookupError::Fallback {
                table,
                source: (*err).clone(),
            })
    }

    /// Player data for `uuid`.
    pub async fn player_data(&self, uuid: Uuid) -> LookupResult<Arc<PlayerData>> {
        let load = async {
            let data = self.source.record_for_identity(uuid).await?;
            Ok::<_, SourceError>(data.map(Arc::new))
        };
        self.read_through(Table::DataByUuid, &self.data_by_uuid, uuid, load)
            .await
    }

    /// Player data for `name`, resolved through the identity table.
    pub async fn player_data_by_name(&self, name: &str) -> LookupResult<Arc<PlayerData>> {
        let Some(uuid) = self.uuid_for_name(name).await? else {
            return Ok(None);
        };
        self.player_data(uuid).await
    }

    /// Approximate number of live entries per table.
    pub async fn stats(&self) -> CacheStats {
        self.online_by_proxy.run_pending_tasks().await;
        self.online_by_server.run_pending_tasks().await;
        self.uuid_by_name.run_pending_tasks().await;
        self.data_by_uuid.run_pending_tasks().await;

        CacheStats {
            online_by_proxy: self.online_by_proxy.entry_count(),
            online_by_server: self.online_by_server.entry_count(),
            uuid_by_name: self.uuid_by_name.entry_count(),
            data_by_uuid: self.data_by_uuid.entry_count(),
        }
    }

    async fn uuid_for_name(&self, name: &str) -> LookupResult<Uuid> {
        let table = Table::UuidByName;
        let stored = name.to_lowercase();

        match self.identity_keys {
            IdentityKeyPolicy::Lowercase => {
                let load = self.source.identity_for_name(&stored);
                self.read_through(table, &self.uuid_by_name, stored.clone(), load)
                    .await
            }
            IdentityKeyPolicy::ProbeRaw if stored == name => {
                let load = self.source.identity_for_name(name);
                self.read_through(table, &self.uuid_by_name, stored.clone(), load)
                    .await
            }
            IdentityKeyPolicy::ProbeRaw => {
                // Entries are only ever stored lowercased, so probing a
                // mixed-case name always misses.
                let uuid = self
                    .fetch(table, name, self.source.identity_for_name(name))
                    .await
                    .map_err(|source| LookupError::Fallback { table, source })?;

                if let Some(uuid) = uuid {
                    self.uuid_by_name.insert(stored, uuid).await;
                }
                Ok(uuid)
            }
        }
    }

    /// Load `key` through `cache`, storing only values the source found.
    async fn read_through<K, V, F>(
        &self,
        table: Table,
        cache: &TypedCache<K, V>,
        key: K,
        load: F,
    ) -> LookupResult<V>
    where
        K: Hash + Eq + Send + Sync + std::fmt::Debug + 'static,
        V: Clone + Send + Sync + 'static,
        F: Future<Output = SourceResult<Option<V>>>,
    {
        let label = format!("{key:?}");
        let init = async {
            match self.fetch(table, &label, load).await {
                Ok(Some(value)) => Ok(value),
                Ok(None) => Err(Miss::Absent),
                Err(err) => Err(Miss::Failed(err)),
            }
        };

        match cache.get_or_try_insert_with(key, init).await {
            Ok(value) => Ok(Some(value)),
            Err(miss) => match miss.as_ref() {
                Miss::Absent => Ok(None),
                Miss::Failed(err) => Err(LookupError::Fallback {
                    table,
                    source: err.clone(),
                }),
            },
        }
    }

    /// Run one fallback call, applying the configured timeout.
    async fn fetch<T, F>(&self, table: Table, key: &str, call: F) -> SourceResult<T>
    where
        F: Future<Output = SourceResult<T>>,
    {
        debug!("Cache miss on {} for {}, querying source", table, key);

        let result = match self.fallback_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(SourceError::Timeout(limit))),
            None => call.await,
        };

        if let Err(e) = &result {
            warn!("Source query on {} for {} failed: {}", table, key, e);
        }
        result
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("online_by_proxy", &self.online_by_proxy)
            .field("online_by_server", &self.online_by_server)
            .field("uuid_by_name", &self.uuid_by_name)
            .field("data_by_uuid", &self.data_by_uuid)
            .field("identity_keys", &self.identity_keys)
            .field("fallback_timeout", &self.fallback_timeout)
            .finish()
    }
}
