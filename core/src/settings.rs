//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a parse run. Deserializable so host applications can load
/// it from their own config layer; the core never touches disk for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Logs with a recorded duration below this are rejected as `TooShort`.
    pub min_duration_ms: i64,
    /// Replace player character and account names with roster indices
    /// after fusion.
    pub anonymous_players: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            min_duration_ms: 2200,
            anonymous_players: false,
        }
    }
}
