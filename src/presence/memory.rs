//! In-memory presence source.
//!
//! Backs the probe binary and the tests. Seeded from a JSON snapshot and
//! mutable afterwards so callers can simulate upstream changes.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::error::SourceResult;
use super::models::PlayerData;
use super::source::PresenceSource;

/// Serialized form of a presence store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub proxies: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub servers: HashMap<String, Vec<Uuid>>,
    #[serde(default)]
    pub players: Vec<PlayerData>,
}

/// Presence store held in concurrent maps.
///
/// Proxy and server keys are matched exactly. Player names are indexed
/// lowercased, so name resolution is case-insensitive.
#[derive(Debug, Default)]
pub struct MemorySource {
    proxies: DashMap<String, HashSet<String>>,
    servers: DashMap<String, HashSet<Uuid>>,
    names: DashMap<String, Uuid>, // name (lowercase) -> uuid
    players: DashMap<Uuid, PlayerData>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let source = Self::new();
        for (proxy, names) in snapshot.proxies {
            source.set_proxy(proxy, names);
        }
        for (server, ids) in snapshot.servers {
            source.set_server(server, ids);
        }
        for player in snapshot.players {
            source.put_player(player);
        }
        source
    }

    /// Parse a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json).context("invalid presence snapshot")?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Read and parse a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let source = Self::from_json(&json)?;
        debug!(
            "Loaded snapshot {}: {} proxies, {} servers, {} players",
            path.display(),
            source.proxies.len(),
            source.servers.len(),
            source.players.len()
        );
        Ok(source)
    }

    /// Replace the online names of a proxy.
    pub fn set_proxy<I, S>(&self, proxy: impl Into<String>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxies
            .insert(proxy.into(), names.into_iter().map(Into::into).collect());
    }

    /// Replace the online identities of a server.
    pub fn set_server(&self, server: impl Into<String>, ids: impl IntoIterator<Item = Uuid>) {
        self.servers.insert(server.into(), ids.into_iter().collect());
    }

    pub fn remove_server(&self, server: &str) {
        self.servers.remove(server);
    }

    /// Insert or replace a player record and its name index.
    pub fn put_player(&self, player: PlayerData) {
        let name = player.name.to_lowercase();

        // Drop the old name if the player was renamed
        if let Some(old) = self.players.get(&player.uuid) {
            let old_name = old.name.to_lowercase();
            drop(old);
            if old_name != name {
                self.names.remove_if(&old_name, |_, uuid| *uuid == player.uuid);
            }
        }

        self.names.insert(name, player.uuid);
        self.players.insert(player.uuid, player);
    }

    pub fn remove_player(&self, uuid: Uuid) {
        if let Some((_, player)) = self.players.remove(&uuid) {
            self.names
                .remove_if(&player.name.to_lowercase(), |_, id| *id == uuid);
        }
    }
}

#[async_trait]
impl PresenceSource for MemorySource {
    async fn online_names_for_proxy(&self, proxy: &str) -> SourceResult<Option<HashSet<String>>> {
        Ok(self.proxies.get(proxy).map(|names| names.clone()))
    }

    async fn online_ids_for_server(&self, server: &str) -> SourceResult<Option<HashSet<Uuid>>> {
        Ok(self.servers.get(server).map(|ids| ids.clone()))
    }

    async fn identity_for_name(&self, name: &str) -> SourceResult<Option<Uuid>> {
        Ok(self.names.get(&name.to_lowercase()).map(|uuid| *uuid))
    }

    async fn record_for_identity(&self, uuid: Uuid) -> SourceResult<Option<PlayerData>> {
        Ok(self.players.get(&uuid).map(|player| player.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOB: Uuid = Uuid::from_u128(0xb0b);

    #[tokio::test]
    async fn test_snapshot_seeds_every_map() {
        let json = r#"{
            "proxies": { "alpha": ["Bob", "Carol"] },
            "servers": { "Lobby": ["00000000-0000-0000-0000-000000000b0b"] },
            "players": [ { "uuid": "00000000-0000-0000-0000-000000000b0b", "name": "Bob" } ]
        }"#;
        let source = MemorySource::from_json(json).unwrap();

        let names = source.online_names_for_proxy("alpha").await.unwrap().unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("Carol"));

        let ids = source.online_ids_for_server("Lobby").await.unwrap().unwrap();
        assert!(ids.contains(&BOB));
        assert_eq!(source.online_ids_for_server("lobby").await.unwrap(), None);

        let record = source.record_for_identity(BOB).await.unwrap().unwrap();
        assert_eq!(record.name, "Bob");
    }

    #[tokio::test]
    async fn test_name_resolution_ignores_case() {
        let source = MemorySource::new();
        source.put_player(PlayerData::new(BOB, "Bob"));

        assert_eq!(source.identity_for_name("Bob").await.unwrap(), Some(BOB));
        assert_eq!(source.identity_for_name("BOB").await.unwrap(), Some(BOB));
        assert_eq!(source.identity_for_name("carol").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rename_drops_old_name() {
        let source = MemorySource::new();
        source.put_player(PlayerData::new(BOB, "Bob"));
        source.put_player(PlayerData::new(BOB, "Robert"));

        assert_eq!(source.identity_for_name("bob").await.unwrap(), None);
        assert_eq!(source.identity_for_name("robert").await.unwrap(), Some(BOB));

        source.remove_player(BOB);
        assert_eq!(source.identity_for_name("robert").await.unwrap(), None);
        assert_eq!(source.record_for_identity(BOB).await.unwrap(), None);
    }

    #[test]
    fn test_malformed_snapshot_is_rejected() {
        assert!(MemorySource::from_json("{ \"players\": 3 }").is_err());
    }
}
