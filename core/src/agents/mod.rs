mod agent;
mod player;
mod resolver;


pub use agent::{AgentId, AgentItem, AgentKind, AgentStore};
pub use player::Player;
pub use resolver::{link_masters, resolve, ResolvedAgents};
