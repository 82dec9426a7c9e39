use serde::Serialize;

use crate::agents::AgentId;

/// A named `[start, end)` slice of the fight with the targets active in it.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseData {
    pub name: String,
    pub start: i64,
    pub end: i64,
    pub targets: Vec<AgentId>,
}

impl PhaseData {
    pub fn new(name: impl Into<String>, start: i64, end: i64, targets: Vec<AgentId>) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            targets,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).max(0)
    }

    pub fn contains(&self, time: i64) -> bool {
        self.start <= time && time < self.end
    }
}
