//! Presence data models.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Online player names on one proxy.
pub type OnlineNames = Arc<HashSet<String>>;

/// Online player identities on one backend server.
pub type OnlineIds = Arc<HashSet<Uuid>>;

/// Player data as stored by the presence store.
///
/// The cache never looks inside it; it is keyed by `uuid` only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    /// Stable player identity.
    pub uuid: Uuid,
    /// Username with its original casing.
    pub name: String,
    /// Proxy the player is connected through, if online.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Backend server the player is on, if online.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    /// Unix timestamp of last update.
    #[serde(default)]
    pub updated_at: i64,
}

impl PlayerData {
    /// Create an offline record stamped with the current time.
    pub fn new(uuid: Uuid, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            proxy: None,
            server: None,
            updated_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Mark the player as connected to `proxy` and `server`.
    #[must_use]
    pub fn connected(mut self, proxy: impl Into<String>, server: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self.server = Some(server.into());
        self
    }

    pub fn is_online(&self) -> bool {
        self.proxy.is_some()
    }
}
