pub mod agents;
pub mod buffs;
pub mod error;
pub mod events;
pub mod evtc;
pub mod log;
pub mod operation;
pub mod rules;
pub mod settings;
pub mod stats;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports for convenience
pub use agents::{AgentId, AgentItem, AgentKind, AgentStore, Player};
pub use buffs::{Buff, BuffCatalog, BuffCategory, BuffSimulationError, StackingNature};
pub use error::ParseError;
pub use events::Event;
pub use evtc::{EvtcError, LookupError, RawLog};
pub use log::{parse_bytes, parse_file, FightData, ParsedLog};
pub use operation::{Cancelled, Operation};
pub use rules::{EncounterRules, GenericRules, ParseMode, PhaseData, RulesRegistry};
pub use settings::ParserSettings;
pub use stats::{
    ActorStatistics, DamageModifier, DamageModifierStat, FinalBuffs, FinalDps, GainComputer,
    HitPredicate, StatisticsEngine,
};
