//! Buff uptime aggregates built on the simulation output.

use serde::Serialize;

use crate::buffs::SimulationResult;
use crate::rules::PhaseData;

use super::status::ActorStatus;

/// Uptime of one buff on one actor over one phase, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalBuffs {
    /// Share of the phase with at least one stack present.
    pub uptime: f64,
    /// Same, but measured only over the actor's active time.
    pub active_uptime: f64,
    /// Average stack count over the phase.
    pub mean_stacks: f64,
}

impl FinalBuffs {
    pub fn compute(simulation: &SimulationResult, status: &ActorStatus, phase: &PhaseData) -> Self {
        let duration = phase.duration_ms();
        if duration <= 0 {
            return Self::default();
        }
        let presence = simulation.presence_in(phase.start, phase.end);
        let stack_time = simulation.stack_time_in(phase.start, phase.end);

        // Presence only counts while the actor can act, clip every
        // non-empty segment against the absence windows.
        let absent_presence: i64 = simulation
            .segments
            .iter()
            .filter(|s| s.stacks > 0)
            .map(|s| status.absent_in(s.start.max(phase.start), s.end.min(phase.end)))
            .sum();
        let active = status.active_in(phase.start, phase.end);
        let active_presence = presence - absent_presence;

        Self {
            uptime: 100.0 * presence as f64 / duration as f64,
            active_uptime: if active > 0 {
                100.0 * active_presence as f64 / active as f64
            } else {
                0.0
            },
            mean_stacks: stack_time as f64 / duration as f64,
        }
    }
}
