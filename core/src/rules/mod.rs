//! Encounter rules, the pluggable game-knowledge boundary.
//!
//! Everything encounter specific (where the fight clock really starts,
//! what counts as the boss, how the fight splits into phases, what success
//! looks like) lives behind the [`EncounterRules`] trait. The parse
//! pipeline only ever calls through it, a registry picks the concrete
//! rules from the log's trigger id and falls back to [`GenericRules`]
//! when nothing is registered.

mod generic;
mod phase;
mod registry;

pub use generic::GenericRules;
pub use phase::PhaseData;
pub use registry::RulesRegistry;

use crate::agents::{AgentId, AgentStore};
use crate::events::Event;
use crate::evtc::RawLog;
use crate::log::FightData;

/// How the fight instance constrains the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    OpenWorld,
    Instanced5,
    Instanced10,
    Benchmark,
    SPvP,
}

/// Per-encounter strategy hooks consumed by the parse pipeline.
pub trait EncounterRules: Send + Sync {
    fn mode(&self) -> ParseMode {
        ParseMode::Instanced10
    }

    /// Time every event and aware window is rebased against.
    fn fight_offset(&self, raw: &RawLog) -> i64;

    /// Key actors of the encounter. An empty result after rules run is a
    /// `MissingKeyActors` failure upstream.
    fn targets(&self, store: &AgentStore, trigger_id: u16) -> Vec<AgentId>;

    /// Time slices all statistics are computed over, in order, the first
    /// one spanning the whole fight.
    fn phases(&self, fight: &FightData, store: &AgentStore, events: &[Event]) -> Vec<PhaseData>;

    fn check_success(&self, store: &AgentStore, events: &[Event]) -> bool;

    fn is_cm(&self, store: &AgentStore, events: &[Event]) -> bool;
}
