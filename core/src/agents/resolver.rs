//! Agent reconstruction from the raw combat item stream.
//!
//! A single forward scan assigns instance ids and aware windows, then the
//! player roster is fixed up and fused: a reconnecting player produces two
//! raw agent records sharing account and character name, which are merged
//! into one by rewriting every combat item referencing the newer handle.
//! Master/minion links are resolved on a second scan with time-qualified
//! instance-id lookup.

use hashbrown::HashMap;
use tracing::debug;

use crate::error::ParseError;
use crate::evtc::{CombatItem, EvtcError, RawLog};
use crate::rules::ParseMode;
use crate::settings::ParserSettings;

use super::agent::{AgentId, AgentItem, AgentKind, AgentStore};
use super::player::Player;

/// Output of agent resolution.
#[derive(Debug)]
pub struct ResolvedAgents {
    pub store: AgentStore,
    pub players: Vec<Player>,
}

/// Build the authoritative agent set from the raw log. Mutates the combat
/// item stream in place when fusing reconnecting players.
pub fn resolve(
    raw: &mut RawLog,
    mode: ParseMode,
    settings: &ParserSettings,
) -> Result<ResolvedAgents, ParseError> {
    let mut agents = Vec::with_capacity(raw.agents.len());
    for raw_agent in &raw.agents {
        agents.push(AgentItem::from_raw(raw_agent)?);
    }

    // first occurrence wins on duplicate handles
    let mut by_handle: HashMap<u64, usize> = HashMap::with_capacity(agents.len());
    for (i, agent) in agents.iter().enumerate() {
        by_handle.entry(agent.handle).or_insert(i);
    }

    // single forward scan: instance ids and aware windows
    for item in &raw.items {
        if item.is_statechange.src_is_agent() {
            if let Some(&i) = by_handle.get(&item.src_agent) {
                agents[i].touch(item.time, item.src_instid);
            }
        }
        if item.is_statechange.dst_is_agent() {
            if let Some(&i) = by_handle.get(&item.dst_agent) {
                agents[i].touch(item.time, item.dst_instid);
            }
        }
    }

    // never-observed agents are ephemeral garbage, except players which
    // are retained for the fix-up below
    let before = agents.len();
    agents.retain(|a| a.observed() || a.kind.is_player());
    debug!(dropped = before - agents.len(), kept = agents.len(), "agent validity filter");

    let mut store = AgentStore::from_agents(agents);
    if store.ids_of_kind(AgentKind::Player).is_empty() {
        return Err(EvtcError::NoPlayersFound.into());
    }

    let players = complete_players(&mut store, raw, mode, settings);
    store.rebuild_inst_index();
    link_masters(&mut store, &raw.items);

    Ok(ResolvedAgents { store, players })
}

fn complete_players(
    store: &mut AgentStore,
    raw: &mut RawLog,
    mode: ParseMode,
    settings: &ParserSettings,
) -> Vec<Player> {
    let player_ids = store.ids_of_kind(AgentKind::Player);
    let mut players: Vec<Player> = Vec::with_capacity(player_ids.len());

    for id in player_ids {
        fix_up_player(store, raw, id);

        let candidate = Player::from_agent(id, store);
        let mut skip = false;
        for existing in &players {
            if existing.account != candidate.account {
                continue;
            }
            if existing.character == candidate.character {
                // same logical player reconnecting, fuse into the earlier record
                fuse_players(store, &mut raw.items, existing.agent, id);
                skip = true;
                break;
            }
            if mode == ParseMode::Instanced10 {
                // a second character of the same account cannot coexist in
                // a 10 player instance, discard the later record
                skip = true;
                break;
            }
        }
        if !skip {
            players.push(candidate);
        }
    }

    if settings.anonymous_players {
        for (i, player) in players.iter_mut().enumerate() {
            player.anonymize(i + 1, store);
        }
    }

    players.sort_by_key(|p| p.group);
    if players.iter().any(|p| p.group == 0) {
        for player in &mut players {
            player.squadless = true;
        }
    }

    normalize_toughness(store, &players);
    players
}

/// Adopt an instance id from the first combat item referencing a player
/// that was never directly observed, then stretch its aware window to the
/// whole fight so later queries always find it.
fn fix_up_player(store: &mut AgentStore, raw: &RawLog, id: AgentId) {
    let agent = store.get(id);
    if agent.inst_id != 0 && agent.first_aware != 0 && agent.last_aware != i64::MAX {
        return;
    }
    let handle = agent.handle;
    let adopted = raw
        .items
        .iter()
        .find(|c| c.src_agent == handle)
        .map(|c| c.src_instid)
        .or_else(|| {
            raw.items
                .iter()
                .find(|c| c.dst_agent == handle)
                .map(|c| c.dst_instid)
        });
    let Some(inst_id) = adopted else {
        return;
    };
    let agent = store.get_mut(id);
    agent.inst_id = inst_id;
    agent.first_aware = raw.log_start;
    agent.last_aware = raw.log_end;
}

/// Merge a duplicate player record into the record that appeared first.
/// Rewrites every combat item referencing the duplicate handle, re-points
/// minions, and takes the union of the two aware windows.
fn fuse_players(
    store: &mut AgentStore,
    items: &mut [CombatItem],
    keep: AgentId,
    dup: AgentId,
) {
    let keep_handle = store.get(keep).handle;
    let dup_handle = store.get(dup).handle;

    for item in items.iter_mut() {
        if item.src_agent == dup_handle && item.is_statechange.src_is_agent() {
            item.src_agent = keep_handle;
        }
        if item.dst_agent == dup_handle && item.is_statechange.dst_is_agent() {
            item.dst_agent = keep_handle;
        }
    }

    let ids: Vec<AgentId> = store.iter().map(|(id, _)| id).collect();
    for id in ids {
        if store.get(id).master == Some(dup) {
            store.get_mut(id).master = Some(keep);
        }
    }

    let (dup_first, dup_last) = {
        let d = store.get(dup);
        (d.first_aware, d.last_aware)
    };
    let kept = store.get_mut(keep);
    kept.first_aware = kept.first_aware.min(dup_first);
    kept.last_aware = kept.last_aware.max(dup_last);

    store.redirect_handle(dup_handle, keep);
    debug!(keep = keep_handle, dup = dup_handle, "fused reconnecting player");
}

/// Rescale squad toughness to a 0 to 10 scale.
fn normalize_toughness(store: &mut AgentStore, players: &[Player]) {
    let values: Vec<u16> = players.iter().map(|p| store.get(p.agent).toughness).collect();
    let Some(&min) = values.iter().min() else {
        return;
    };
    if min == 0 {
        return;
    }
    let max = *values.iter().max().unwrap_or(&min);
    let span = f64::from(max - min).max(1.0);
    for player in players {
        let agent = store.get_mut(player.agent);
        agent.toughness = (10.0 * f64::from(agent.toughness - min) / span).round() as u16;
    }
}

/// Second scan: resolve master/minion links. Instance ids are only valid
/// inside the owning agent's aware window, so the master lookup is
/// time-qualified rather than "latest agent with this instance id".
pub fn link_masters(store: &mut AgentStore, items: &[CombatItem]) {
    for item in items {
        if item.is_statechange.src_is_agent() && item.src_master_instid != 0 {
            find_agent_master(store, item.time, item.src_master_instid, item.src_agent);
        }
        if item.is_statechange.dst_is_agent() && item.dst_master_instid != 0 {
            find_agent_master(store, item.time, item.dst_master_instid, item.dst_agent);
        }
    }
}

fn find_agent_master(store: &mut AgentStore, time: i64, master_instid: u16, minion_handle: u64) {
    let Some(master) = store.by_inst_id(master_instid, time) else {
        return;
    };
    let Some(minion) = store.by_handle(minion_handle) else {
        return;
    };
    if minion == master {
        return;
    }
    let minion_agent = store.get(minion);
    if minion_agent.master.is_none() && minion_agent.aware_at(time) {
        store.get_mut(minion).master = Some(master);
    }
}
