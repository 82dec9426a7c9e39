use std::sync::Arc;

use hashbrown::HashMap;

use super::{EncounterRules, GenericRules};

/// Maps fight trigger ids to their encounter rules.
#[derive(Clone)]
pub struct RulesRegistry {
    by_trigger: HashMap<u16, Arc<dyn EncounterRules>>,
    fallback: Arc<dyn EncounterRules>,
}

impl RulesRegistry {
    pub fn new() -> Self {
        Self {
            by_trigger: HashMap::new(),
            fallback: Arc::new(GenericRules),
        }
    }

    /// Replaces any rules previously registered under the same trigger id.
    pub fn register(&mut self, trigger_id: u16, rules: Arc<dyn EncounterRules>) {
        self.by_trigger.insert(trigger_id, rules);
    }

    pub fn resolve(&self, trigger_id: u16) -> Arc<dyn EncounterRules> {
        self.by_trigger
            .get(&trigger_id)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }
}

impl Default for RulesRegistry {
    fn default() -> Self {
        Self::new()
    }
}
