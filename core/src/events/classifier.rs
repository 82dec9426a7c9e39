//! Raw combat items to typed events.
//!
//! The fight offset is applied uniformly to every item timestamp and
//! every aware window before any classification, and the item stream is
//! re-sorted afterwards because encounter-specific fix-ups may rewrite
//! timestamps out of order. Items referencing handles that did not
//! survive agent resolution are skipped.

use tracing::debug;

use crate::agents::{AgentId, AgentStore};
use crate::evtc::{Activation, BuffRemoveKind, CombatItem, HitResult, StateChange};

use super::event::{
    ActivationEvent, BreakbarDamageEvent, BuffApplyEvent, BuffExtensionEvent, BuffRemoveEvent,
    DamageEvent, DamageKind, Event, MovementEvent, StatusEvent, StatusKind,
};

/// Shift every item timestamp and aware window by the fight offset, then
/// restore time ordering. Atomic with respect to the caller: nothing else
/// observes the stream between the shift and the sort.
pub fn apply_offset(items: &mut [CombatItem], store: &mut AgentStore, offset: i64) {
    for item in items.iter_mut() {
        item.time -= offset;
    }
    store.apply_offset(offset);
    items.sort_by_key(|c| c.time);
    debug!(offset, "fight offset applied");
}

/// Classify the offset, sorted item stream into typed events. Marks
/// commander tags on the agent store as a side effect.
pub fn classify(items: &[CombatItem], store: &mut AgentStore) -> Vec<Event> {
    let mut events = Vec::with_capacity(items.len());
    for item in items {
        if let Some(event) = classify_item(item, store) {
            events.push(event);
        }
    }
    // timestamps must be non-decreasing for everything downstream
    events.sort_by_key(Event::time);
    events
}

fn classify_item(item: &CombatItem, store: &mut AgentStore) -> Option<Event> {
    if item.is_statechange != StateChange::None {
        return classify_state_change(item, store);
    }
    if item.is_activation != Activation::None {
        let agent = store.by_handle(item.src_agent)?;
        return Some(Event::Activation(ActivationEvent {
            time: item.time,
            agent,
            skill_id: item.skill_id,
            kind: item.is_activation,
            duration: item.value,
        }));
    }
    if item.is_buffremove != BuffRemoveKind::None {
        if item.buff == 0 {
            return None;
        }
        // on removal items the source is the agent losing the buff and
        // the destination is the remover
        let owner = store.by_handle(item.src_agent)?;
        let by = store.by_handle(item.dst_agent);
        return Some(Event::BuffRemove(BuffRemoveEvent {
            time: item.time,
            buff_id: item.skill_id,
            owner,
            by,
            kind: item.is_buffremove,
            removed_duration: item.value,
            removed_stacks: item.result,
            stack_id: item.pad,
        }));
    }
    if item.buff != 0 && item.buff_dmg == 0 && item.value != 0 {
        let to = store.by_handle(item.dst_agent)?;
        let by = store.by_handle(item.src_agent);
        if item.is_offcycle {
            return Some(Event::BuffExtension(BuffExtensionEvent {
                time: item.time,
                buff_id: item.skill_id,
                to,
                by,
                duration_change: i64::from(item.value),
                old_value: i64::from(item.overstack_value) - i64::from(item.value),
                stack_id: item.pad,
            }));
        }
        return Some(Event::BuffApply(BuffApplyEvent {
            time: item.time,
            buff_id: item.skill_id,
            by,
            to,
            duration: item.value,
            overstack: item.overstack_value,
            stack_id: item.pad,
            active: item.is_shields,
            initial: false,
        }));
    }
    if item.buff != 0 && item.buff_dmg != 0 && item.value == 0 {
        let src = store.by_handle(item.src_agent)?;
        let dst = store.by_handle(item.dst_agent)?;
        return Some(Event::Damage(DamageEvent {
            time: item.time,
            src,
            dst,
            skill_id: item.skill_id,
            damage: item.buff_dmg,
            kind: DamageKind::Condition,
            result: HitResult::from_byte(item.result),
            is_flanking: item.is_flanking,
            over_ninety: item.is_ninety,
            target_under_fifty: item.is_fifty,
            target_moving: item.is_moving,
            against_shield: item.is_shields,
        }));
    }
    if item.buff == 0 {
        let src = store.by_handle(item.src_agent)?;
        let dst = store.by_handle(item.dst_agent)?;
        let result = HitResult::from_byte(item.result);
        if result == HitResult::Breakbar {
            return Some(Event::BreakbarDamage(BreakbarDamageEvent {
                time: item.time,
                src,
                dst,
                skill_id: item.skill_id,
                damage: f64::from(item.value) / 10.0,
            }));
        }
        if item.value == 0 {
            return None;
        }
        return Some(Event::Damage(DamageEvent {
            time: item.time,
            src,
            dst,
            skill_id: item.skill_id,
            damage: item.value,
            kind: DamageKind::Direct,
            result,
            is_flanking: item.is_flanking,
            over_ninety: item.is_ninety,
            target_under_fifty: item.is_fifty,
            target_moving: item.is_moving,
            against_shield: item.is_shields,
        }));
    }
    None
}

fn classify_state_change(item: &CombatItem, store: &mut AgentStore) -> Option<Event> {
    use StateChange as S;
    match item.is_statechange {
        S::LogStart => return Some(Event::LogStart { time: item.time }),
        S::LogEnd => return Some(Event::LogEnd { time: item.time }),
        S::Reward => {
            return Some(Event::Reward {
                time: item.time,
                reward_id: item.dst_agent,
                reward_kind: item.value,
            });
        }
        _ => {}
    }

    let agent = store.by_handle(item.src_agent)?;
    let status = |kind: StatusKind| {
        Some(Event::Status(StatusEvent {
            time: item.time,
            agent,
            kind,
        }))
    };

    match item.is_statechange {
        S::EnterCombat => status(StatusKind::EnterCombat {
            subgroup: item.dst_agent as u8,
        }),
        S::ExitCombat => status(StatusKind::ExitCombat),
        S::ChangeUp => status(StatusKind::Alive),
        S::ChangeDead => status(StatusKind::Dead),
        S::ChangeDown => status(StatusKind::Down),
        S::Spawn => status(StatusKind::Spawn),
        S::Despawn => status(StatusKind::Despawn),
        S::HealthUpdate => Some(Event::Health {
            time: item.time,
            agent,
            percent: item.health_percent(),
        }),
        S::MaxHealthUpdate => Some(Event::MaxHealth {
            time: item.time,
            agent,
            value: item.dst_agent,
        }),
        S::WeaponSwap => Some(Event::WeaponSwap {
            time: item.time,
            agent,
            set: item.dst_agent as i32,
        }),
        S::PointOfView => Some(Event::PointOfView {
            time: item.time,
            agent,
        }),
        S::Tag => {
            store.get_mut(agent).has_commander_tag = true;
            Some(Event::CommanderTag {
                time: item.time,
                agent,
            })
        }
        S::TeamChange => Some(Event::TeamChange {
            time: item.time,
            agent,
            team: item.dst_agent,
        }),
        S::Position => Some(Event::Position(unpack_movement(item, agent))),
        S::Velocity => Some(Event::Velocity(unpack_movement(item, agent))),
        S::Rotation => Some(Event::Rotation(unpack_movement(item, agent))),
        S::BuffInitial => {
            let to = agent;
            let by = store.by_handle(item.dst_agent);
            Some(Event::BuffApply(BuffApplyEvent {
                time: item.time,
                buff_id: item.skill_id,
                by,
                to,
                duration: item.value,
                overstack: item.overstack_value,
                stack_id: item.pad,
                active: item.is_shields,
                initial: true,
            }))
        }
        S::StackActive => Some(Event::BuffStackActive {
            time: item.time,
            agent,
            buff_id: item.skill_id,
            stack_id: item.dst_agent as u32,
        }),
        S::StackReset => Some(Event::BuffStackReset {
            time: item.time,
            agent,
            buff_id: item.skill_id,
            stack_id: item.pad,
            to_duration: item.value,
        }),
        _ => None,
    }
}

fn unpack_movement(item: &CombatItem, agent: AgentId) -> MovementEvent {
    MovementEvent {
        time: item.time,
        agent,
        x: f32::from_bits(item.dst_agent as u32),
        y: f32::from_bits((item.dst_agent >> 32) as u32),
        z: f32::from_bits(item.value as u32),
    }
}
