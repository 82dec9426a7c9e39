//! Damage and DPS aggregates.

use serde::Serialize;

use crate::agents::{AgentId, AgentStore};
use crate::events::{DamageEvent, Event};
use crate::rules::PhaseData;

/// Round to one decimal place, the precision breakbar damage is reported at.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn rate(damage: i64, duration_ms: i64) -> i32 {
    if duration_ms <= 0 {
        return 0;
    }
    (damage as f64 / (duration_ms as f64 / 1000.0)).round() as i32
}

/// Damage totals and rates for one (actor, target-or-all, phase) slot.
///
/// The plain fields credit the actor with everything its minions did, the
/// `actor_` fields count only the actor's own actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalDps {
    pub damage: i64,
    pub condi_damage: i64,
    pub power_damage: i64,
    pub dps: i32,
    pub condi_dps: i32,
    pub power_dps: i32,
    pub actor_damage: i64,
    pub actor_condi_damage: i64,
    pub actor_power_damage: i64,
    pub actor_dps: i32,
    pub actor_condi_dps: i32,
    pub actor_power_dps: i32,
    pub breakbar_damage: f64,
    pub actor_breakbar_damage: f64,
}

impl FinalDps {
    /// Aggregate every hit credited to `actor` within the phase window,
    /// optionally restricted to one target.
    pub fn compute(
        events: &[Event],
        store: &AgentStore,
        actor: AgentId,
        target: Option<AgentId>,
        phase: &PhaseData,
    ) -> Self {
        let mut out = Self::default();
        let mut breakbar = 0.0;
        let mut actor_breakbar = 0.0;
        for event in events {
            match event {
                Event::Damage(e) if phase.contains(e.time) && hits_target(e, target) => {
                    let credited = store.final_master(e.src);
                    if credited != actor {
                        continue;
                    }
                    let damage = i64::from(e.damage);
                    out.damage += damage;
                    if e.is_condition() {
                        out.condi_damage += damage;
                    }
                    if e.src == actor {
                        out.actor_damage += damage;
                        if e.is_condition() {
                            out.actor_condi_damage += damage;
                        }
                    }
                }
                Event::BreakbarDamage(e)
                    if phase.contains(e.time) && target.is_none_or(|t| e.dst == t) =>
                {
                    if store.final_master(e.src) != actor {
                        continue;
                    }
                    breakbar += e.damage;
                    if e.src == actor {
                        actor_breakbar += e.damage;
                    }
                }
                _ => {}
            }
        }
        out.power_damage = out.damage - out.condi_damage;
        out.actor_power_damage = out.actor_damage - out.actor_condi_damage;
        let duration = phase.duration_ms();
        out.dps = rate(out.damage, duration);
        out.condi_dps = rate(out.condi_damage, duration);
        out.power_dps = rate(out.power_damage, duration);
        out.actor_dps = rate(out.actor_damage, duration);
        out.actor_condi_dps = rate(out.actor_condi_damage, duration);
        out.actor_power_dps = rate(out.actor_power_damage, duration);
        out.breakbar_damage = round1(breakbar);
        out.actor_breakbar_damage = round1(actor_breakbar);
        out
    }
}

fn hits_target(e: &DamageEvent, target: Option<AgentId>) -> bool {
    target.is_none_or(|t| e.dst == t)
}
