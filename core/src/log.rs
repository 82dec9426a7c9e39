//! Parse pipeline and the resulting log object.
//!
//! `parse_file`/`parse_bytes` run the sequential pipeline (decode, resolve
//! agents, rebase and classify events, apply encounter rules) and either
//! return a complete [`ParsedLog`] or the structured error that stopped it.
//! Statistics are not computed here, they are queried off the finished log.

use std::path::Path;

use hashbrown::HashMap;
use tracing::{debug, info};

use crate::agents::{resolve, AgentId, AgentStore, Player};
use crate::buffs::BuffCatalog;
use crate::error::ParseError;
use crate::events::{apply_offset, classify, Event};
use crate::evtc::{open_log_file, EvtcDecoder, EvtcError};
use crate::operation::Operation;
use crate::rules::{PhaseData, RulesRegistry};
use crate::settings::ParserSettings;
use crate::stats::{ActorStatistics, DamageModifier, StatisticsEngine};

/// Fight-level facts, all times rebased to the fight offset.
#[derive(Debug, Clone)]
pub struct FightData {
    pub trigger_id: u16,
    pub log_start: i64,
    pub log_end: i64,
    /// Raw timestamp subtracted from every event and aware window.
    pub offset: i64,
    pub success: bool,
    pub is_cm: bool,
}

impl FightData {
    pub fn duration_ms(&self) -> i64 {
        (self.log_end - self.log_start).max(0)
    }
}

/// Fully reconstructed log. Immutable once built.
#[derive(Debug)]
pub struct ParsedLog {
    pub build_version: String,
    pub revision: u8,
    pub fight: FightData,
    pub store: AgentStore,
    pub players: Vec<Player>,
    pub skills: HashMap<u32, String>,
    pub buffs: BuffCatalog,
    pub events: Vec<Event>,
    pub targets: Vec<AgentId>,
    pub phases: Vec<PhaseData>,
}

impl ParsedLog {
    pub fn skill_name(&self, id: u32) -> Option<&str> {
        self.skills.get(&id).map(String::as_str)
    }

    /// Compute statistics for the given actors over every phase. Queried
    /// on demand by downstream consumers, never during parsing.
    pub fn statistics(
        &self,
        actors: &[AgentId],
        modifiers: &[DamageModifier],
        operation: &Operation,
    ) -> Result<Vec<ActorStatistics>, ParseError> {
        let engine = StatisticsEngine::new(
            &self.events,
            &self.store,
            &self.phases,
            &self.buffs,
            modifiers,
            self.fight.log_end,
        );
        engine.compute(actors, operation)
    }

    /// Actor ids of the full roster, the usual statistics query set.
    pub fn player_ids(&self) -> Vec<AgentId> {
        self.players.iter().map(|p| p.agent).collect()
    }

    /// Events whose primary agent is `agent`, in time order.
    pub fn events_for(&self, agent: AgentId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.subject() == Some(agent))
    }
}

/// Parse a log from disk, unwrapping the zip container when present.
pub fn parse_file(
    path: &Path,
    settings: &ParserSettings,
    registry: &RulesRegistry,
    operation: &Operation,
) -> Result<ParsedLog, ParseError> {
    let bytes = open_log_file(path)?;
    parse_bytes(&bytes, settings, registry, operation)
}

/// Run the sequential parse pipeline over an in-memory evtc stream.
pub fn parse_bytes(
    bytes: &[u8],
    settings: &ParserSettings,
    registry: &RulesRegistry,
    operation: &Operation,
) -> Result<ParsedLog, ParseError> {
    operation.checkpoint("decoding")?;
    let mut raw = EvtcDecoder::new(settings).decode(bytes)?;
    let rules = registry.resolve(raw.fight_instance_id);

    operation.checkpoint("resolving agents")?;
    let resolved = resolve(&mut raw, rules.mode(), settings)?;
    let mut store = resolved.store;
    let players = resolved.players;

    operation.checkpoint("classifying events")?;
    let offset = rules.fight_offset(&raw);
    apply_offset(&mut raw.items, &mut store, offset);
    let events = classify(&raw.items, &mut store);
    debug!(count = events.len(), offset, "events classified");

    let mut fight = FightData {
        trigger_id: raw.fight_instance_id,
        log_start: raw.log_start - offset,
        log_end: raw.log_end - offset,
        offset,
        success: false,
        is_cm: false,
    };
    fight.success = rules.check_success(&store, &events);
    fight.is_cm = rules.is_cm(&store, &events);

    let targets = rules.targets(&store, fight.trigger_id);
    if targets.is_empty() {
        return Err(EvtcError::MissingKeyActors.into());
    }
    let phases = rules.phases(&fight, &store, &events);

    let skills: HashMap<u32, String> = raw
        .skills
        .iter()
        .map(|s| (s.id as u32, s.name.clone()))
        .collect();

    info!(
        trigger_id = fight.trigger_id,
        players = players.len(),
        targets = targets.len(),
        phases = phases.len(),
        success = fight.success,
        "log parsed"
    );

    Ok(ParsedLog {
        build_version: raw.build_version,
        revision: raw.revision,
        fight,
        store,
        players,
        skills,
        buffs: BuffCatalog::builtin(),
        events,
        targets,
        phases,
    })
}
