//! Damage modifier attribution.
//!
//! A modifier ties a tracked buff to a damage bonus. Replaying the actor's
//! hits against the buff's simulated stack graph yields how much of the
//! dealt damage the modifier contributed and how often it was up.

use serde::Serialize;

use crate::buffs::SimulationResult;
use crate::events::{DamageEvent, DamageKind};
use crate::rules::PhaseData;

/// Turns a stack count into the fraction of dealt damage the modifier
/// contributed. A result of 0 means the hit did not qualify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GainComputer {
    /// Bonus scales linearly with stacks, e.g. 0.02 per stack of Might.
    PerStack { gain_per_stack: f64 },
    /// Flat bonus while at least one stack is present.
    ByPresence { gain: f64 },
    /// Flat bonus while the buff is absent.
    ByAbsence { gain: f64 },
}

impl GainComputer {
    pub fn gain(&self, stacks: u32) -> f64 {
        match *self {
            Self::PerStack { gain_per_stack } => gain_per_stack * f64::from(stacks),
            Self::ByPresence { gain } => {
                if stacks > 0 {
                    gain
                } else {
                    0.0
                }
            }
            Self::ByAbsence { gain } => {
                if stacks == 0 {
                    gain
                } else {
                    0.0
                }
            }
        }
    }
}

/// Which hits a modifier applies to at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPredicate {
    Any,
    DirectOnly,
    ConditionOnly,
    Flanking,
    OverNinety,
    TargetUnderFifty,
}

impl HitPredicate {
    pub fn matches(&self, hit: &DamageEvent) -> bool {
        match self {
            Self::Any => true,
            Self::DirectOnly => hit.kind == DamageKind::Direct,
            Self::ConditionOnly => hit.kind == DamageKind::Condition,
            Self::Flanking => hit.is_flanking,
            Self::OverNinety => hit.over_ninety,
            Self::TargetUnderFifty => hit.target_under_fifty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DamageModifier {
    pub name: String,
    /// Buff whose stack graph drives the gain.
    pub buff_id: u32,
    pub gain: GainComputer,
    pub predicate: HitPredicate,
}

impl DamageModifier {
    pub fn new(name: &str, buff_id: u32, gain: GainComputer, predicate: HitPredicate) -> Self {
        Self {
            name: name.to_owned(),
            buff_id,
            gain,
            predicate,
        }
    }
}

/// Result of replaying one modifier over one (actor, target-or-all, phase).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DamageModifierStat {
    /// Hits the modifier contributed to.
    pub hit_count: u32,
    /// Hits considered at all.
    pub total_count: u32,
    /// Damage attributed to the modifier.
    pub damage_gain: f64,
    /// Damage of every considered hit.
    pub total_damage: i64,
}

impl DamageModifierStat {
    /// `hits` must already be restricted to the actor (and target, when a
    /// per-target breakdown is wanted).
    pub fn compute<'a>(
        modifier: &DamageModifier,
        simulation: &SimulationResult,
        hits: impl Iterator<Item = &'a DamageEvent>,
        phase: &PhaseData,
    ) -> Self {
        let mut out = Self::default();
        for hit in hits {
            if !phase.contains(hit.time) || !modifier.predicate.matches(hit) {
                continue;
            }
            out.total_count += 1;
            out.total_damage += i64::from(hit.damage);
            let gain = modifier.gain.gain(simulation.stacks_at(hit.time));
            if gain != 0.0 {
                out.hit_count += 1;
                out.damage_gain += f64::from(hit.damage) * gain;
            }
        }
        out
    }
}
