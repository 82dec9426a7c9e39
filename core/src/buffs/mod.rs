//! Buff presence and uptime simulation
//!
//! Replays the per-agent buff event stream (applies, extensions, removals,
//! stack activations and resets) through a stacking-model-specific state
//! machine, producing stack-count segments over time plus a generation and
//! waste ledger per source agent.

mod buff;
mod error;
mod simulator;
mod simulator_id;
mod stack;

#[cfg(test)]
mod simulator_tests;

pub use buff::{Buff, BuffCatalog, BuffCategory, StackingNature};
pub use error::BuffSimulationError;
pub use simulator::IntensitySimulator;
pub use simulator_id::DurationSimulator;
pub use stack::{BuffSegment, BuffStackItem, SimulationLedger, SimulationResult};

use crate::agents::AgentId;
use crate::events::{Event, StatusKind};

/// Grace window, in milliseconds, within which reported removed durations
/// are considered to agree with the simulated remainder. Server ticks and
/// latency make exact agreement impossible.
pub const TIME_TOLERANCE_MS: i64 = 15;

/// How many stacks a removal takes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    /// Clear every stack, with no waste accounting. Emitted when the owner
    /// despawns or the simulation is torn down.
    Full,
    /// Remove the given number of stacks, oldest first.
    Partial(u8),
}

/// Per-stacking-model simulator state machine.
#[derive(Debug)]
pub enum Simulator {
    Intensity(IntensitySimulator),
    Duration(DurationSimulator),
}

impl Simulator {
    pub fn for_buff(buff: &Buff) -> Self {
        match buff.nature {
            StackingNature::Duration => Self::Duration(DurationSimulator::new()),
            // Graph-only buffs have no meaningful per-stack timing, the
            // queued model still yields a usable presence graph.
            StackingNature::Intensity | StackingNature::GraphOnly => {
                Self::Intensity(IntensitySimulator::new())
            }
        }
    }

    fn apply(&mut self, src: Option<AgentId>, time: i64, duration: i64, stack_id: u32, active: bool) {
        match self {
            Self::Intensity(s) => s.apply(src, time, duration),
            Self::Duration(s) => s.apply(src, time, duration, stack_id, active),
        }
    }

    fn extend(
        &mut self,
        src: Option<AgentId>,
        time: i64,
        amount: i64,
        stack_id: u32,
    ) -> Result<(), BuffSimulationError> {
        match self {
            Self::Intensity(s) => {
                s.extend(src, time, amount);
                Ok(())
            }
            Self::Duration(s) => s.extend(src, time, amount, stack_id),
        }
    }

    fn remove(
        &mut self,
        by: Option<AgentId>,
        time: i64,
        removed_duration: i64,
        removal: RemovalKind,
        stack_id: u32,
    ) -> Result<(), BuffSimulationError> {
        match self {
            Self::Intensity(s) => {
                s.remove(time, removal);
                Ok(())
            }
            Self::Duration(s) => s.remove(by, time, removed_duration, removal, stack_id),
        }
    }

    fn activate(&mut self, time: i64, stack_id: u32) -> Result<(), BuffSimulationError> {
        match self {
            Self::Intensity(_) => Ok(()),
            Self::Duration(s) => s.activate(time, stack_id),
        }
    }

    fn reset(&mut self, time: i64, stack_id: u32) -> Result<(), BuffSimulationError> {
        match self {
            Self::Intensity(_) => Ok(()),
            Self::Duration(s) => s.reset(time, stack_id),
        }
    }

    fn finish(self, end: i64) -> SimulationResult {
        match self {
            Self::Intensity(s) => s.finish(end),
            Self::Duration(s) => s.finish(end),
        }
    }
}

/// Replays every event touching `buff` on `agent` and returns the resulting
/// presence segments and ledger. `end` is the end of the simulation window;
/// stacks still alive there are torn down and their remainder counted as
/// wasted.
pub fn simulate_agent_buff(
    buff: &Buff,
    agent: AgentId,
    events: &[Event],
    end: i64,
) -> Result<SimulationResult, BuffSimulationError> {
    let mut sim = Simulator::for_buff(buff);
    for event in events {
        match event {
            Event::BuffApply(e) if e.to == agent && e.buff_id == buff.id => {
                sim.apply(e.by, e.time, i64::from(e.duration), e.stack_id, e.active);
            }
            Event::BuffExtension(e) if e.to == agent && e.buff_id == buff.id => {
                sim.extend(e.by, e.time, e.duration_change, e.stack_id)?;
            }
            Event::BuffRemove(e) if e.owner == agent && e.buff_id == buff.id => {
                let removal = match e.kind {
                    crate::evtc::BuffRemoveKind::All => {
                        RemovalKind::Partial(e.removed_stacks.max(1))
                    }
                    _ => RemovalKind::Partial(1),
                };
                sim.remove(e.by, e.time, i64::from(e.removed_duration), removal, e.stack_id)?;
            }
            Event::BuffStackActive {
                time,
                agent: a,
                buff_id,
                stack_id,
            } if *a == agent && *buff_id == buff.id => {
                sim.activate(*time, *stack_id)?;
            }
            Event::BuffStackReset {
                time,
                agent: a,
                buff_id,
                stack_id,
                ..
            } if *a == agent && *buff_id == buff.id => {
                sim.reset(*time, *stack_id)?;
            }
            Event::Status(e) if e.agent == agent && e.kind == StatusKind::Despawn => {
                sim.remove(None, e.time, 0, RemovalKind::Full, 0)?;
            }
            _ => {}
        }
    }
    Ok(sim.finish(end))
}
