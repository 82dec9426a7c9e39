//! Strongly typed combat events.
//!
//! Classified events reference resolved agents by `AgentId` and skills
//! and buffs by their numeric id, never by raw handles or instance ids.

use serde::Serialize;

use crate::agents::AgentId;
use crate::evtc::{Activation, BuffRemoveKind, HitResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DamageKind {
    /// Strike damage from the `value` field.
    Direct,
    /// Condition or other buff tick damage from the `buff_dmg` field.
    Condition,
}

/// Health damage, direct or condition.
#[derive(Debug, Clone, Serialize)]
pub struct DamageEvent {
    pub time: i64,
    pub src: AgentId,
    pub dst: AgentId,
    pub skill_id: u32,
    pub damage: i32,
    pub kind: DamageKind,
    pub result: HitResult,
    pub is_flanking: bool,
    pub over_ninety: bool,
    pub target_under_fifty: bool,
    pub target_moving: bool,
    pub against_shield: bool,
}

impl DamageEvent {
    pub fn is_condition(&self) -> bool {
        self.kind == DamageKind::Condition
    }
}

/// Defiance-bar damage. The wire value is stored times ten.
#[derive(Debug, Clone, Serialize)]
pub struct BreakbarDamageEvent {
    pub time: i64,
    pub src: AgentId,
    pub dst: AgentId,
    pub skill_id: u32,
    pub damage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuffApplyEvent {
    pub time: i64,
    pub buff_id: u32,
    pub by: Option<AgentId>,
    pub to: AgentId,
    pub duration: i32,
    pub overstack: u32,
    pub stack_id: u32,
    /// Stack applied in the active slot (revision 1 signal).
    pub active: bool,
    /// Stack already present when the log started.
    pub initial: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuffRemoveEvent {
    pub time: i64,
    pub buff_id: u32,
    /// Agent losing the buff.
    pub owner: AgentId,
    /// Remover, `None` when the source is unknown (an override).
    pub by: Option<AgentId>,
    pub kind: BuffRemoveKind,
    pub removed_duration: i32,
    pub removed_stacks: u8,
    pub stack_id: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuffExtensionEvent {
    pub time: i64,
    pub buff_id: u32,
    pub to: AgentId,
    pub by: Option<AgentId>,
    pub duration_change: i64,
    pub old_value: i64,
    pub stack_id: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivationEvent {
    pub time: i64,
    pub agent: AgentId,
    pub skill_id: u32,
    pub kind: Activation,
    pub duration: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusKind {
    Spawn,
    Despawn,
    Dead,
    Down,
    Alive,
    EnterCombat { subgroup: u8 },
    ExitCombat,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusEvent {
    pub time: i64,
    pub agent: AgentId,
    pub kind: StatusKind,
}

/// Position, velocity or rotation sample for combat replay. The two
/// horizontal components are packed in the halves of `dst_agent`, the
/// third in the bits of `value`.
#[derive(Debug, Clone, Serialize)]
pub struct MovementEvent {
    pub time: i64,
    pub agent: AgentId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One classified, timestamped occurrence.
#[derive(Debug, Clone, Serialize)]
pub enum Event {
    Damage(DamageEvent),
    BreakbarDamage(BreakbarDamageEvent),
    BuffApply(BuffApplyEvent),
    BuffRemove(BuffRemoveEvent),
    BuffExtension(BuffExtensionEvent),
    BuffStackActive {
        time: i64,
        agent: AgentId,
        buff_id: u32,
        stack_id: u32,
    },
    BuffStackReset {
        time: i64,
        agent: AgentId,
        buff_id: u32,
        stack_id: u32,
        to_duration: i32,
    },
    Activation(ActivationEvent),
    Status(StatusEvent),
    Health {
        time: i64,
        agent: AgentId,
        percent: f64,
    },
    MaxHealth {
        time: i64,
        agent: AgentId,
        value: u64,
    },
    Position(MovementEvent),
    Velocity(MovementEvent),
    Rotation(MovementEvent),
    TeamChange {
        time: i64,
        agent: AgentId,
        team: u64,
    },
    WeaponSwap {
        time: i64,
        agent: AgentId,
        set: i32,
    },
    PointOfView {
        time: i64,
        agent: AgentId,
    },
    CommanderTag {
        time: i64,
        agent: AgentId,
    },
    Reward {
        time: i64,
        reward_id: u64,
        reward_kind: i32,
    },
    LogStart {
        time: i64,
    },
    LogEnd {
        time: i64,
    },
}

impl Event {
    pub fn time(&self) -> i64 {
        match self {
            Event::Damage(e) => e.time,
            Event::BreakbarDamage(e) => e.time,
            Event::BuffApply(e) => e.time,
            Event::BuffRemove(e) => e.time,
            Event::BuffExtension(e) => e.time,
            Event::BuffStackActive { time, .. } => *time,
            Event::BuffStackReset { time, .. } => *time,
            Event::Activation(e) => e.time,
            Event::Status(e) => e.time,
            Event::Health { time, .. } => *time,
            Event::MaxHealth { time, .. } => *time,
            Event::Position(e) => e.time,
            Event::Velocity(e) => e.time,
            Event::Rotation(e) => e.time,
            Event::TeamChange { time, .. } => *time,
            Event::WeaponSwap { time, .. } => *time,
            Event::PointOfView { time, .. } => *time,
            Event::CommanderTag { time, .. } => *time,
            Event::Reward { time, .. } => *time,
            Event::LogStart { time } => *time,
            Event::LogEnd { time } => *time,
        }
    }

    /// The agent this event is primarily about. `None` for fight-level
    /// markers (reward chest, log boundaries).
    pub fn subject(&self) -> Option<AgentId> {
        match self {
            Event::Damage(e) => Some(e.src),
            Event::BreakbarDamage(e) => Some(e.src),
            Event::BuffApply(e) => Some(e.to),
            Event::BuffRemove(e) => Some(e.owner),
            Event::BuffExtension(e) => Some(e.to),
            Event::BuffStackActive { agent, .. }
            | Event::BuffStackReset { agent, .. }
            | Event::Health { agent, .. }
            | Event::MaxHealth { agent, .. }
            | Event::TeamChange { agent, .. }
            | Event::WeaponSwap { agent, .. }
            | Event::PointOfView { agent, .. }
            | Event::CommanderTag { agent, .. } => Some(*agent),
            Event::Activation(e) => Some(e.agent),
            Event::Status(e) => Some(e.agent),
            Event::Position(e) | Event::Velocity(e) | Event::Rotation(e) => Some(e.agent),
            Event::Reward { .. } | Event::LogStart { .. } | Event::LogEnd { .. } => None,
        }
    }
}
