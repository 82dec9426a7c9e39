//! Statistics fan-out.

use hashbrown::HashMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::agents::{AgentId, AgentStore};
use crate::buffs::{simulate_agent_buff, BuffCatalog, SimulationResult};
use crate::error::ParseError;
use crate::events::{DamageEvent, Event};
use crate::operation::{Cancelled, Operation};
use crate::rules::PhaseData;

use super::buffs::FinalBuffs;
use super::dps::FinalDps;
use super::modifiers::{DamageModifier, DamageModifierStat};
use super::status::ActorStatus;

/// All aggregates for one actor, one entry per phase in phase order.
#[derive(Debug, Clone, Serialize)]
pub struct ActorStatistics {
    pub actor: AgentId,
    pub phases: Vec<PhaseStatistics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseStatistics {
    pub dps_all: FinalDps,
    /// Per-target breakdown over the phase's target set.
    pub dps_targets: Vec<(AgentId, FinalDps)>,
    pub buffs: Vec<(u32, FinalBuffs)>,
    /// Modifier attribution over every hit the actor landed in the phase.
    pub modifiers: Vec<(String, DamageModifierStat)>,
    /// Same attribution restricted to hits on each phase target.
    pub modifiers_targets: Vec<(AgentId, Vec<(String, DamageModifierStat)>)>,
}

type BuffMemo = HashMap<(AgentId, u32), SimulationResult>;

/// Computes every per-actor aggregate over the shared immutable inputs.
pub struct StatisticsEngine<'a> {
    events: &'a [Event],
    store: &'a AgentStore,
    phases: &'a [PhaseData],
    catalog: &'a BuffCatalog,
    modifiers: &'a [DamageModifier],
    /// End of the simulation window, the fight end after rebasing.
    end: i64,
}

impl<'a> StatisticsEngine<'a> {
    pub fn new(
        events: &'a [Event],
        store: &'a AgentStore,
        phases: &'a [PhaseData],
        catalog: &'a BuffCatalog,
        modifiers: &'a [DamageModifier],
        end: i64,
    ) -> Self {
        Self {
            events,
            store,
            phases,
            catalog,
            modifiers,
            end,
        }
    }

    /// The buff simulations and presence windows are memoized up front,
    /// the parallel region below only reads them.
    pub fn compute(
        &self,
        actors: &[AgentId],
        operation: &Operation,
    ) -> Result<Vec<ActorStatistics>, ParseError> {
        operation.checkpoint("buff simulation")?;
        let memo = self.simulate_buffs(actors)?;
        let statuses: HashMap<AgentId, ActorStatus> = actors
            .iter()
            .map(|&a| (a, ActorStatus::compute(self.events, a, self.end)))
            .collect();
        debug!(actors = actors.len(), buffs = memo.len(), "statistics fan-out");

        operation.checkpoint("statistics")?;
        actors
            .par_iter()
            .map(|&actor| {
                if operation.is_cancelled() {
                    return Err(Cancelled {
                        stage: "actor statistics",
                    }
                    .into());
                }
                Ok(self.compute_actor(actor, &memo, &statuses[&actor]))
            })
            .collect()
    }

    fn simulate_buffs(&self, actors: &[AgentId]) -> Result<BuffMemo, ParseError> {
        let mut memo = BuffMemo::new();
        for &actor in actors {
            for buff in self.catalog.iter() {
                let result = simulate_agent_buff(buff, actor, self.events, self.end)?;
                memo.insert((actor, buff.id), result);
            }
        }
        Ok(memo)
    }

    fn compute_actor(
        &self,
        actor: AgentId,
        memo: &BuffMemo,
        status: &ActorStatus,
    ) -> ActorStatistics {
        let hits: Vec<&DamageEvent> = self
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Damage(d) if self.store.final_master(d.src) == actor => Some(d),
                _ => None,
            })
            .collect();

        let phases = self
            .phases
            .iter()
            .map(|phase| {
                let dps_all = FinalDps::compute(self.events, self.store, actor, None, phase);
                let dps_targets = phase
                    .targets
                    .iter()
                    .map(|&t| {
                        (
                            t,
                            FinalDps::compute(self.events, self.store, actor, Some(t), phase),
                        )
                    })
                    .collect();
                let buffs = self
                    .catalog
                    .iter()
                    .map(|buff| {
                        let sim = &memo[&(actor, buff.id)];
                        (buff.id, FinalBuffs::compute(sim, status, phase))
                    })
                    .collect();
                let modifiers = self.modifier_stats(actor, memo, &hits, None, phase);
                let modifiers_targets = phase
                    .targets
                    .iter()
                    .map(|&t| (t, self.modifier_stats(actor, memo, &hits, Some(t), phase)))
                    .collect();
                PhaseStatistics {
                    dps_all,
                    dps_targets,
                    buffs,
                    modifiers,
                    modifiers_targets,
                }
            })
            .collect();

        ActorStatistics { actor, phases }
    }

    fn modifier_stats(
        &self,
        actor: AgentId,
        memo: &BuffMemo,
        hits: &[&DamageEvent],
        target: Option<AgentId>,
        phase: &PhaseData,
    ) -> Vec<(String, DamageModifierStat)> {
        self.modifiers
            .iter()
            .filter_map(|modifier| {
                let sim = memo.get(&(actor, modifier.buff_id))?;
                let selected = hits
                    .iter()
                    .copied()
                    .filter(|d| target.is_none_or(|t| d.dst == t));
                let stat = DamageModifierStat::compute(modifier, sim, selected, phase);
                Some((modifier.name.clone(), stat))
            })
            .collect()
    }
}
