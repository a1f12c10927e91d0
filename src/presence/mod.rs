//! Presence and identity lookups.
//!
//! This module provides the read-through cache that answers "who is online"
//! and "who is this player" questions in front of a remote presence store.
//!
//! ## Features
//!
//! - Four expiring tables with per-table key normalization
//! - Single-flight loading (one fallback call per missing key)
//! - Fallback failures kept distinct from "not found"
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use presence_cache::cache::CacheConfig;
//! use presence_cache::presence::{CacheManager, MemorySource};
//!
//! # async fn demo() -> Result<(), presence_cache::presence::LookupError> {
//! let source = Arc::new(MemorySource::new());
//! let cache = CacheManager::new(source, CacheConfig::default());
//!
//! if let Some(names) = cache.online_players("Alpha").await? {
//!     println!("{} players online", names.len());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod memory;
mod models;
mod source;

pub use error::{LookupError, LookupResult, SourceError, SourceResult, Table};
pub use manager::{CacheManager, CacheStats, IdentityKeyPolicy};
pub use memory::{MemorySource, Snapshot};
pub use models::{OnlineIds, OnlineNames, PlayerData};
pub use source::PresenceSource;
