//! Fallback source port.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use super::error::SourceResult;
use super::models::PlayerData;

/// Authoritative presence store queried on cache misses.
///
/// Every method is a read with no side effects. `Ok(None)` means the store
/// affirmatively has no value for the key; `Err` means it could not answer.
#[async_trait]
pub trait PresenceSource: Send + Sync {
    /// Names of the players online on `proxy`.
    async fn online_names_for_proxy(&self, proxy: &str) -> SourceResult<Option<HashSet<String>>>;

    /// Identities of the players online on `server`.
    async fn online_ids_for_server(&self, server: &str) -> SourceResult<Option<HashSet<Uuid>>>;

    /// Identity registered for `name`.
    async fn identity_for_name(&self, name: &str) -> SourceResult<Option<Uuid>>;

    /// Player data stored for `uuid`.
    async fn record_for_identity(&self, uuid: Uuid) -> SourceResult<Option<PlayerData>>;
}
