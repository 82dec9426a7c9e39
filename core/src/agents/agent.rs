//! Agent identity records and the arena that owns them.
//!
//! Agents live in a flat arena indexed by `AgentId`. The master link on a
//! minion is a plain `Option<AgentId>` into the same arena, never an
//! owning pointer, so construction order between minions and masters does
//! not matter. Instance ids are short lived and reused, so every lookup
//! by instance id is qualified by a timestamp against the aware window.

use hashbrown::HashMap;
use serde::Serialize;

use crate::evtc::{AgentClass, LookupError, RawAgent};

/// Index of an agent in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AgentId(u32);

impl AgentId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AgentKind {
    Npc,
    Gadget,
    Player,
    EnemyPlayer,
}

impl AgentKind {
    pub fn is_player(self) -> bool {
        matches!(self, Self::Player | Self::EnemyPlayer)
    }
}

/// Identity record for one player, NPC or gadget.
#[derive(Debug, Clone, Serialize)]
pub struct AgentItem {
    /// Stable numeric handle from the agent table.
    pub handle: u64,
    /// Display name. For squad players this is the character name.
    pub name: String,
    /// Account name for players, empty otherwise.
    pub account: String,
    /// Subgroup from the name field, 0 when absent.
    pub subgroup: u8,
    /// Profession or elite-spec tag for players, "NPC"/"GDG" otherwise.
    pub profession: String,
    /// Species id for NPCs, pseudo id for gadgets, 0 for players.
    pub species_id: u16,
    pub kind: AgentKind,
    /// Short-lived instance id, only meaningful inside the aware window.
    pub inst_id: u16,
    pub first_aware: i64,
    pub last_aware: i64,
    pub toughness: u16,
    pub healing: u16,
    pub condition: u16,
    pub concentration: u16,
    pub hitbox_width: u32,
    pub hitbox_height: u32,
    /// Minion to owner back-reference.
    pub master: Option<AgentId>,
    pub has_commander_tag: bool,
    /// Player whose name field did not carry squad information.
    pub not_in_squad: bool,
}

impl AgentItem {
    pub fn from_raw(raw: &RawAgent) -> Result<Self, LookupError> {
        let class = AgentClass::from_raw(raw.prof, raw.is_elite)?;
        let mut item = Self {
            handle: raw.agent,
            name: raw.name.clone(),
            account: String::new(),
            subgroup: 0,
            profession: String::new(),
            species_id: 0,
            kind: AgentKind::Npc,
            inst_id: 0,
            first_aware: 0,
            last_aware: i64::MAX,
            toughness: raw.toughness,
            healing: raw.healing,
            condition: raw.condition,
            concentration: raw.concentration,
            hitbox_width: raw.hitbox_width,
            hitbox_height: raw.hitbox_height,
            master: None,
            has_commander_tag: false,
            not_in_squad: false,
        };
        match class {
            AgentClass::Npc { species_id } => {
                item.kind = AgentKind::Npc;
                item.species_id = species_id;
                item.profession = "NPC".to_string();
                item.name = first_name_part(&raw.name);
            }
            AgentClass::Gadget { pseudo_id } => {
                item.kind = AgentKind::Gadget;
                item.species_id = pseudo_id;
                item.profession = "GDG".to_string();
                item.name = first_name_part(&raw.name);
            }
            AgentClass::Player { profession } => {
                item.kind = AgentKind::Player;
                item.profession = profession.to_string();
                item.split_player_name(&raw.name, profession);
            }
        }
        Ok(item)
    }

    /// Split the `character\0:account\0subgroup` name field. A malformed
    /// field marks the agent as out of squad, or as an enemy player when
    /// the character slot carries digits.
    fn split_player_name(&mut self, raw_name: &str, profession: &str) {
        let parts: Vec<&str> = raw_name.split('\0').collect();
        let character = parts.first().copied().unwrap_or_default();
        let well_formed = parts.len() >= 3
            && !parts[1].is_empty()
            && !parts[2].is_empty()
            && !character.contains('-');
        if well_formed {
            self.name = character.to_string();
            self.account = parts[1].trim_start_matches(':').to_string();
            self.subgroup = parts[2].parse().unwrap_or(0);
        } else if character.chars().any(|c| c.is_ascii_digit()) {
            self.kind = AgentKind::EnemyPlayer;
            self.name = format!("{profession} {character}");
        } else {
            self.name = character.to_string();
            self.not_in_squad = true;
        }
    }

    pub fn touch(&mut self, time: i64, inst_id: u16) {
        if self.inst_id == 0 {
            self.inst_id = inst_id;
        }
        if self.first_aware == 0 {
            self.first_aware = time;
            self.last_aware = time;
        } else {
            self.last_aware = time;
        }
    }

    /// Whether the forward scan ever observed this agent.
    pub fn observed(&self) -> bool {
        self.inst_id != 0
            && self.first_aware != 0
            && self.last_aware != i64::MAX
            && self.last_aware >= self.first_aware
    }

    pub fn aware_at(&self, time: i64) -> bool {
        self.first_aware <= time && time <= self.last_aware
    }
}

fn first_name_part(raw: &str) -> String {
    raw.split('\0').next().unwrap_or_default().to_string()
}

/// Arena of resolved agents with handle and time-qualified instance-id
/// lookup.
#[derive(Debug, Default)]
pub struct AgentStore {
    agents: Vec<AgentItem>,
    by_handle: HashMap<u64, AgentId>,
    by_inst: HashMap<u16, Vec<AgentId>>,
}

impl AgentStore {
    pub fn from_agents(agents: Vec<AgentItem>) -> Self {
        let mut by_handle = HashMap::with_capacity(agents.len());
        for (i, agent) in agents.iter().enumerate() {
            // first occurrence wins on duplicate handles
            by_handle.entry(agent.handle).or_insert(AgentId(i as u32));
        }
        let mut store = Self {
            agents,
            by_handle,
            by_inst: HashMap::new(),
        };
        store.rebuild_inst_index();
        store
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: AgentId) -> &AgentItem {
        &self.agents[id.index()]
    }

    pub fn get_mut(&mut self, id: AgentId) -> &mut AgentItem {
        &mut self.agents[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &AgentItem)> {
        self.agents
            .iter()
            .enumerate()
            .map(|(i, a)| (AgentId(i as u32), a))
    }

    pub fn ids_of_kind(&self, kind: AgentKind) -> Vec<AgentId> {
        self.iter()
            .filter(|(_, a)| a.kind == kind)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn by_handle(&self, handle: u64) -> Option<AgentId> {
        self.by_handle.get(&handle).copied()
    }

    /// Time-qualified instance-id lookup. The same instance id may belong
    /// to different agents in disjoint aware windows; only the agent whose
    /// window contains `time` matches.
    pub fn by_inst_id(&self, inst_id: u16, time: i64) -> Option<AgentId> {
        self.by_inst
            .get(&inst_id)?
            .iter()
            .copied()
            .find(|&id| self.get(id).aware_at(time))
    }

    /// Rebuild the instance-id index after aware windows changed.
    pub fn rebuild_inst_index(&mut self) {
        self.by_inst.clear();
        for (i, agent) in self.agents.iter().enumerate() {
            if agent.inst_id != 0 {
                self.by_inst
                    .entry(agent.inst_id)
                    .or_default()
                    .push(AgentId(i as u32));
            }
        }
    }

    /// Point a fused duplicate handle at the surviving agent.
    pub fn redirect_handle(&mut self, handle: u64, to: AgentId) {
        self.by_handle.insert(handle, to);
    }

    /// Chase master links to the owning root agent.
    pub fn final_master(&self, id: AgentId) -> AgentId {
        let mut current = id;
        while let Some(master) = self.get(current).master {
            if master == current {
                break;
            }
            current = master;
        }
        current
    }

    /// Shift every aware window by the fight offset.
    pub fn apply_offset(&mut self, offset: i64) {
        for agent in &mut self.agents {
            if agent.first_aware != 0 {
                agent.first_aware -= offset;
            }
            if agent.last_aware != i64::MAX {
                agent.last_aware -= offset;
            }
        }
    }
}
