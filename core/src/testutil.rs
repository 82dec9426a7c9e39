//! Shared builders for unit tests.

use crate::evtc::{Activation, Affinity, BuffRemoveKind, CombatItem, RawAgent, StateChange};

pub fn blank_item(time: i64) -> CombatItem {
    CombatItem {
        time,
        src_agent: 0,
        dst_agent: 0,
        value: 0,
        buff_dmg: 0,
        overstack_value: 0,
        skill_id: 0,
        src_instid: 0,
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
        is_statechange: StateChange::None,
        is_flanking: false,
        is_shields: false,
        is_offcycle: false,
        pad: 0,
    }
}

pub fn state_item(time: i64, src_agent: u64, src_instid: u16, state: StateChange) -> CombatItem {
    let mut item = blank_item(time);
    item.src_agent = src_agent;
    item.src_instid = src_instid;
    item.is_statechange = state;
    item
}

pub fn damage_item(time: i64, src_agent: u64, dst_agent: u64, skill_id: u32, value: i32) -> CombatItem {
    let mut item = blank_item(time);
    item.src_agent = src_agent;
    item.dst_agent = dst_agent;
    item.skill_id = skill_id;
    item.value = value;
    item
}

pub fn raw_player(handle: u64, name: &str) -> RawAgent {
    RawAgent {
        agent: handle,
        prof: 1,
        is_elite: 0,
        toughness: 0,
        concentration: 0,
        healing: 0,
        condition: 0,
        hitbox_width: 96,
        hitbox_height: 240,
        name: name.to_string(),
    }
}

pub fn raw_npc(handle: u64, species_id: u32, name: &str) -> RawAgent {
    RawAgent {
        agent: handle,
        prof: species_id,
        is_elite: 0xFFFF_FFFF,
        toughness: 0,
        concentration: 0,
        healing: 0,
        condition: 0,
        hitbox_width: 300,
        hitbox_height: 300,
        name: name.to_string(),
    }
}
