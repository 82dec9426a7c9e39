//! Buff definitions and the built-in catalog.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// How multiple applications of the same buff combine on one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackingNature {
    /// Every stack ticks down concurrently, effect scales with stack count.
    Intensity,
    /// One stack is consumed at a time, the rest queue behind it.
    Duration,
    /// Presence is graphed but per-stack timing is not meaningful.
    GraphOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffCategory {
    Boon,
    Condition,
    Offensive,
    Defensive,
    Support,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buff {
    pub id: u32,
    pub name: String,
    pub nature: StackingNature,
    pub category: BuffCategory,
    /// Maximum concurrent stacks the game allows.
    pub capacity: u8,
}

impl Buff {
    pub fn new(
        id: u32,
        name: &str,
        nature: StackingNature,
        category: BuffCategory,
        capacity: u8,
    ) -> Self {
        Self {
            id,
            name: name.to_owned(),
            nature,
            category,
            capacity,
        }
    }
}

/// Buff definitions keyed by in-game skill id. Seeded with the boons every
/// build cares about; encounter rules register their mechanics on top.
#[derive(Debug, Clone, Default)]
pub struct BuffCatalog {
    by_id: HashMap<u32, Buff>,
}

impl BuffCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the core boons.
    pub fn builtin() -> Self {
        use BuffCategory::Boon;
        use StackingNature::{Duration, Intensity};
        let mut catalog = Self::new();
        for buff in [
            Buff::new(740, "Might", Intensity, Boon, 25),
            Buff::new(725, "Fury", Duration, Boon, 9),
            Buff::new(1187, "Quickness", Duration, Boon, 5),
            Buff::new(30328, "Alacrity", Duration, Boon, 9),
            Buff::new(717, "Protection", Duration, Boon, 5),
            Buff::new(718, "Regeneration", Duration, Boon, 5),
            Buff::new(719, "Swiftness", Duration, Boon, 9),
            Buff::new(726, "Vigor", Duration, Boon, 5),
            Buff::new(1122, "Stability", Intensity, Boon, 25),
            Buff::new(743, "Aegis", Duration, Boon, 5),
            Buff::new(26980, "Resistance", Duration, Boon, 5),
            Buff::new(873, "Resolution", Duration, Boon, 5),
        ] {
            catalog.register(buff);
        }
        catalog
    }

    /// Add a definition, replacing any previous one with the same id.
    pub fn register(&mut self, buff: Buff) {
        self.by_id.insert(buff.id, buff);
    }

    pub fn get(&self, id: u32) -> Option<&Buff> {
        self.by_id.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.by_id.values()
    }

    pub fn of_category(&self, category: BuffCategory) -> impl Iterator<Item = &Buff> {
        self.by_id.values().filter(move |b| b.category == category)
    }
}
