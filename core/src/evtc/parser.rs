//! Top-level binary decode of an evtc stream.
//!
//! Produces the raw parse product: header fields, agent table, skill
//! table and the validity-filtered combat item list. Agent resolution and
//! event classification happen in later stages.

use tracing::debug;

use super::enums::{Affinity, StateChange};
use super::error::EvtcError;
use super::reader::ByteCursor;
use super::records::{CombatItem, RawAgent, RawSkill};
use crate::settings::ParserSettings;

const MAX_DURATION_MS: i64 = 86_400_000;

/// Raw decode product of a single log.
#[derive(Debug)]
pub struct RawLog {
    pub build_version: String,
    pub revision: u8,
    pub fight_instance_id: u16,
    pub agents: Vec<RawAgent>,
    pub skills: Vec<RawSkill>,
    pub items: Vec<CombatItem>,
    pub log_start: i64,
    pub log_end: i64,
}

/// Decoder for the evtc container format.
pub struct EvtcDecoder<'s> {
    settings: &'s ParserSettings,
}

impl<'s> EvtcDecoder<'s> {
    pub fn new(settings: &'s ParserSettings) -> Self {
        Self { settings }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<RawLog, EvtcError> {
        let mut c = ByteCursor::new(bytes);

        // header: 12 byte build string, revision, fight id, 1 pad byte
        let build_version = c.fixed_string(12, true, "build version")?;
        let revision = c.u8("revision")?;
        let fight_instance_id = c.u16("fight instance id")?;
        c.skip(1, "header padding")?;
        debug!(%build_version, revision, fight_instance_id, "evtc header");

        let agent_count = c.u32("agent count")? as usize;
        let mut agents = Vec::with_capacity(agent_count);
        for _ in 0..agent_count {
            agents.push(RawAgent::decode(&mut c)?);
        }
        debug!(count = agents.len(), "agent table read");

        let skill_count = c.u32("skill count")? as usize;
        let mut skills = Vec::with_capacity(skill_count);
        for _ in 0..skill_count {
            skills.push(RawSkill::decode(&mut c)?);
        }
        debug!(count = skills.len(), "skill table read");

        let (items, log_start, log_end) = self.decode_combat_items(&mut c, revision)?;
        debug!(count = items.len(), log_start, log_end, "combat items read");

        Ok(RawLog {
            build_version,
            revision,
            fight_instance_id,
            agents,
            skills,
            items,
            log_start,
            log_end,
        })
    }

    fn decode_combat_items(
        &self,
        c: &mut ByteCursor<'_>,
        revision: u8,
    ) -> Result<(Vec<CombatItem>, i64, i64), EvtcError> {
        let item_count = c.remaining() / 64;
        let mut items = Vec::with_capacity(item_count);
        let mut log_start: Option<i64> = None;
        let mut log_end = 0i64;
        for _ in 0..item_count {
            let item = if revision > 0 {
                CombatItem::decode_rev1(c)?
            } else {
                CombatItem::decode_rev0(c)?
            };
            if !is_valid(&item) {
                continue;
            }
            if item.is_statechange.has_time() {
                log_start.get_or_insert(item.time);
                log_end = item.time;
            }
            items.push(item);
        }
        if items.is_empty() {
            return Err(EvtcError::NoCombatEvents);
        }
        let log_start = log_start.unwrap_or(0);
        let duration_ms = log_end - log_start;
        if duration_ms < self.settings.min_duration_ms {
            return Err(EvtcError::TooShort {
                duration_ms,
                limit_ms: self.settings.min_duration_ms,
            });
        }
        if duration_ms > MAX_DURATION_MS {
            return Err(EvtcError::TooLong);
        }
        Ok((items, log_start, log_end))
    }
}

/// Structural validity filter. Items failing this are non-authoritative
/// garbage and are dropped silently before the timeline is built.
fn is_valid(item: &CombatItem) -> bool {
    if item.is_statechange == StateChange::HealthUpdate && item.dst_agent > 20_000 {
        // health percent is stored times 100, more than 200% is garbage
        return false;
    }
    if item.src_instid == 0
        && item.dst_agent == 0
        && item.src_agent == 0
        && item.dst_instid == 0
        && item.iff == Affinity::Unknown
    {
        return false;
    }
    item.is_statechange != StateChange::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evtc::enums::{Activation, BuffRemoveKind};
    use crate::evtc::records::encode;

    fn state_item(time: i64, src_agent: u64, state: StateChange) -> CombatItem {
        CombatItem {
            time,
            src_agent,
            dst_agent: 0,
            value: 0,
            buff_dmg: 0,
            overstack_value: 0,
            skill_id: 0,
            src_instid: 1,
            dst_instid: 0,
            src_master_instid: 0,
            dst_master_instid: 0,
            iff: Affinity::Friend,
            buff: 0,
            result: 0,
            is_activation: Activation::None,
            is_buffremove: BuffRemoveKind::None,
            is_ninety: false,
            is_fifty: false,
            is_moving: false,
            is_statechange: state,
            is_flanking: false,
            is_shields: false,
            is_offcycle: false,
            pad: 0,
        }
    }

    fn build_stream(items: &[CombatItem]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"EVTC20260101");
        out.push(1); // revision
        out.extend_from_slice(&1u16.to_le_bytes());
        out.push(0);
        out.extend_from_slice(&0u32.to_le_bytes()); // agents
        out.extend_from_slice(&0u32.to_le_bytes()); // skills
        for item in items {
            out.extend_from_slice(&encode::combat_item_rev1(item));
        }
        out
    }

    fn settings() -> ParserSettings {
        ParserSettings {
            min_duration_ms: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn empty_item_stream_is_an_error() {
        let bytes = build_stream(&[]);
        let err = EvtcDecoder::new(&settings()).decode(&bytes).unwrap_err();
        assert!(matches!(err, EvtcError::NoCombatEvents));
    }

    #[test]
    fn short_log_is_rejected_with_duration() {
        let items = [
            state_item(1000, 5, StateChange::LogStart),
            state_item(1200, 5, StateChange::None),
        ];
        // LogStart has no src agent but carries time
        let err = EvtcDecoder::new(&settings()).decode(&build_stream(&items)).unwrap_err();
        assert!(matches!(
            err,
            EvtcError::TooShort { duration_ms: 200, limit_ms: 1000 }
        ));
    }

    #[test]
    fn implausible_health_updates_are_dropped() {
        let mut garbage = state_item(1000, 5, StateChange::HealthUpdate);
        garbage.dst_agent = 25_000;
        let items = [
            state_item(1000, 5, StateChange::None),
            garbage,
            state_item(4000, 5, StateChange::None),
        ];
        let raw = EvtcDecoder::new(&settings()).decode(&build_stream(&items)).unwrap();
        assert_eq!(raw.items.len(), 2);
        assert_eq!(raw.log_start, 1000);
        assert_eq!(raw.log_end, 4000);
    }

    #[test]
    fn header_fields_decode() {
        let items = [
            state_item(0, 5, StateChange::None),
            state_item(5000, 5, StateChange::None),
        ];
        let raw = EvtcDecoder::new(&settings()).decode(&build_stream(&items)).unwrap();
        assert_eq!(raw.build_version, "EVTC20260101");
        assert_eq!(raw.revision, 1);
        assert_eq!(raw.fight_instance_id, 1);
    }
}
