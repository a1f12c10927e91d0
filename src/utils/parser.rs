//! Parsers for configuration values and probe queries.
//!
//! - Durations: `500ms`, `30s`, `1m`, `1h`, `1d`, or bare seconds
//! - Queries: `proxy:<name>`, `server:<name>`, `player:<name|uuid>`

use std::time::Duration;

use uuid::Uuid;

/// A single presence lookup requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Proxy(String),
    Server(String),
    PlayerName(String),
    PlayerId(Uuid),
}

impl Query {
    /// Query kind, as written before the colon.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Proxy(_) => "proxy",
            Self::Server(_) => "server",
            Self::PlayerName(_) | Self::PlayerId(_) => "player",
        }
    }
}

/// Parse a `kind:key` query.
///
/// A `player:` key that parses as a UUID becomes [`Query::PlayerId`].
pub fn parse_query(input: &str) -> Option<Query> {
    let (kind, key) = input.trim().split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    match kind.to_lowercase().as_str() {
        "proxy" => Some(Query::Proxy(key.to_string())),
        "server" => Some(Query::Server(key.to_string())),
        "player" => Some(match Uuid::parse_str(key) {
            Ok(uuid) => Query::PlayerId(uuid),
            Err(_) => Query::PlayerName(key.to_string()),
        }),
        _ => None,
    }
}

/// Parse duration string (e.g., "500ms", "30s", "1m", "1h").
///
/// Supported units:
/// - ms: milliseconds
/// - s: seconds (also the unit of a bare number)
/// - m: minutes
/// - h: hours
/// - d: days
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);
    let amount: u64 = digits.parse().ok()?;

    let millis = match unit {
        "ms" => amount,
        "" | "s" => amount.checked_mul(1_000)?,
        "m" => amount.checked_mul(60_000)?,
        "h" => amount.checked_mul(3_600_000)?,
        "d" => amount.checked_mul(86_400_000)?,
        _ => return None,
    };

    Some(Duration::from_millis(millis))
}
