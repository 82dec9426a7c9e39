//! Player roster entries.

use serde::Serialize;

use super::agent::{AgentId, AgentStore};

/// One logical player in the fight, after fix-up and fusion.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub agent: AgentId,
    pub character: String,
    pub account: String,
    pub group: u8,
    /// Set on the whole roster when any player carries group 0.
    pub squadless: bool,
}

impl Player {
    pub fn from_agent(id: AgentId, store: &AgentStore) -> Self {
        let agent = store.get(id);
        Self {
            agent: id,
            character: agent.name.clone(),
            account: agent.account.clone(),
            group: agent.subgroup,
            squadless: false,
        }
    }

    /// Replace identifying names with a roster index.
    pub fn anonymize(&mut self, index: usize, store: &mut AgentStore) {
        self.character = format!("Player {index}");
        self.account = format!("Account {index}");
        let agent = store.get_mut(self.agent);
        agent.name = self.character.clone();
        agent.account = self.account.clone();
    }
}
