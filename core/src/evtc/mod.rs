mod enums;
mod error;
mod gamedata;
mod parser;
mod reader;
mod records;

pub use enums::{Activation, Affinity, BuffRemoveKind, HitResult, StateChange};
pub use error::{EvtcError, LookupError};
pub use gamedata::{profession_name, AgentClass};
pub use parser::{EvtcDecoder, RawLog};
pub use reader::{open_log_file, ByteCursor};
pub use records::{CombatItem, RawAgent, RawSkill};
