//! Fallback rules used when no encounter is registered for a trigger id.

use crate::agents::{AgentId, AgentKind, AgentStore};
use crate::events::Event;
use crate::evtc::{RawLog, StateChange};
use crate::log::FightData;

use super::{EncounterRules, ParseMode, PhaseData};

/// Knows nothing about the encounter beyond what every log carries: the
/// squad start marker, the reward chest and the species the log was
/// triggered by.
#[derive(Debug, Default)]
pub struct GenericRules;

impl EncounterRules for GenericRules {
    fn mode(&self) -> ParseMode {
        ParseMode::Instanced10
    }

    fn fight_offset(&self, raw: &RawLog) -> i64 {
        raw.items
            .iter()
            .find(|item| item.is_statechange == StateChange::LogStart)
            .map(|item| item.time)
            .or_else(|| raw.items.first().map(|item| item.time))
            .unwrap_or(0)
    }

    fn targets(&self, store: &AgentStore, trigger_id: u16) -> Vec<AgentId> {
        store
            .iter()
            .filter(|(_, agent)| {
                agent.kind == AgentKind::Npc && agent.species_id == trigger_id
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn phases(&self, fight: &FightData, store: &AgentStore, _events: &[Event]) -> Vec<PhaseData> {
        vec![PhaseData::new(
            "Full Fight",
            0,
            fight.duration_ms(),
            self.targets(store, fight.trigger_id),
        )]
    }

    fn check_success(&self, _store: &AgentStore, events: &[Event]) -> bool {
        events.iter().any(|e| matches!(e, Event::Reward { .. }))
    }

    fn is_cm(&self, _store: &AgentStore, _events: &[Event]) -> bool {
        false
    }
}
