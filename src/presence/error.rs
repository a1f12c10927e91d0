//! Presence lookup errors.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Failure of the fallback source to answer a query.
///
/// This is distinct from a "not found" answer, which sources report as
/// `Ok(None)`. Source errors are never cached.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("fallback source unavailable: {0}")]
    Unavailable(String),

    #[error("fallback source did not answer within {0:?}")]
    Timeout(Duration),

    #[error("fallback source returned malformed data: {0}")]
    Malformed(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// The four presence tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    OnlineByProxy,
    OnlineByServer,
    UuidByName,
    DataByUuid,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Self::OnlineByProxy => "online_by_proxy",
            Self::OnlineByServer => "online_by_server",
            Self::UuidByName => "uuid_by_name",
            Self::DataByUuid => "data_by_uuid",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned by [`CacheManager`](super::CacheManager) lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("{table} lookup failed: {source}")]
    Fallback {
        table: Table,
        #[source]
        source: SourceError,
    },
}

impl LookupError {
    pub fn table(&self) -> Table {
        match self {
            Self::Fallback { table, .. } => *table,
        }
    }
}

/// `Ok(None)` means the key is unknown both to the cache and upstream.
pub type LookupResult<T> = Result<Option<T>, LookupError>;
