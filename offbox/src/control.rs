//! Control channel between the foreground application and the engine.
//!
//! Messages are JSON objects tagged by `type`:
//!
//! | message | effect | reply |
//! |---|---|---|
//! | `SKIP_WAITING` | host skip-waiting | none |
//! | `CLEAR_CACHE` | deletes every cache in storage | none |
//! | `GET_CACHE_STATS` | collects [`CacheStats`](crate::stats::CacheStats) | stats JSON, or `{"error": ...}` |
//!
//! Anything else, including malformed payloads, is ignored.

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::oneshot;

/// A recognised control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    /// Activate without waiting for old clients.
    SkipWaiting,
    /// Delete every cache.
    ClearCache,
    /// Reply with cache statistics.
    GetCacheStats,
}

impl ControlMessage {
    /// Parses a raw message. `None` for unknown or malformed input.
    pub fn parse(data: &Value) -> Option<Self> {
        ControlMessage::deserialize(data).ok()
    }

    /// Wire name of the message.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMessage::SkipWaiting => "SKIP_WAITING",
            ControlMessage::ClearCache => "CLEAR_CACHE",
            ControlMessage::GetCacheStats => "GET_CACHE_STATS",
        }
    }
}

/// Reply port supplied with a message.
pub type ReplyPort = oneshot::Sender<Value>;

/// Body sent back when a request could not be served.
pub fn error_reply(message: impl std::fmt::Display) -> Value {
    json!({ "error": message.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_messages() {
        assert_eq!(
            ControlMessage::parse(&json!({ "type": "SKIP_WAITING" })),
            Some(ControlMessage::SkipWaiting)
        );
        assert_eq!(
            ControlMessage::parse(&json!({ "type": "CLEAR_CACHE", "extra": 1 })),
            Some(ControlMessage::ClearCache)
        );
        assert_eq!(
            ControlMessage::parse(&json!({ "type": "GET_CACHE_STATS" })),
            Some(ControlMessage::GetCacheStats)
        );
    }

    #[test]
    fn ignores_unknown_and_malformed() {
        assert_eq!(ControlMessage::parse(&json!({ "type": "FOO" })), None);
        assert_eq!(ControlMessage::parse(&json!({ "kind": "CLEAR_CACHE" })), None);
        assert_eq!(ControlMessage::parse(&json!("CLEAR_CACHE")), None);
        assert_eq!(ControlMessage::parse(&Value::Null), None);
    }
}
