//! Presence Cache - read-through lookups for a proxy fleet.
//!
//! Answers "who is online on proxy X", "who is online on server Y" and
//! "what data belongs to this player" from short-lived caches, falling back
//! to the authoritative presence store on a miss.
//!
//! ## Architecture
//!
//! - `cache` - Expiring tables with Moka
//! - `config` - Environment configuration
//! - `presence` - Cache manager, fallback source port, in-memory source
//! - `utils` - Parsing helpers

pub mod cache;
pub mod config;
pub mod presence;
pub mod utils;
