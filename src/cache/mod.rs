//! Cache module - expiring tables built on Moka.
//!
//! Every presence table is a [`TypedCache`], configured through a
//! [`CacheConfig`] (capacity and write-based TTL).
//!
//! ## Usage
//!
//! ```rust
//! use presence_cache::cache::{CacheConfig, TypedCache};
//!
//! # async fn demo() {
//! let names: TypedCache<String, u32> = TypedCache::new("names", &CacheConfig::default());
//!
//! names.insert("bob".to_string(), 1).await;
//! let hit = names.get(&"bob".to_string()).await;
//! # }
//! ```

mod config;
mod typed;

pub use config::{CacheConfig, DEFAULT_MAX_CAPACITY, DEFAULT_TTL};
pub use typed::TypedCache;
