//! Derived statistics.
//!
//! Consumes the immutable event sequence, agent store, phase list and buff
//! simulations and produces per (actor, target, phase) aggregates. The
//! per-actor computations are independent and fan out over rayon after a
//! sequential memoization pre-pass.

mod buffs;
mod dps;
mod engine;
mod modifiers;
mod status;

#[cfg(test)]
mod engine_tests;

pub use buffs::FinalBuffs;
pub use dps::{FinalDps, round1};
pub use engine::{ActorStatistics, PhaseStatistics, StatisticsEngine};
pub use modifiers::{DamageModifier, DamageModifierStat, GainComputer, HitPredicate};
pub use status::ActorStatus;
