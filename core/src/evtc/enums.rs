//! Wire-level enums for the arcdps combat item flags.
//!
//! Every flag byte in the 64-byte combat item maps to one of these enums.
//! Unrecognized values decode to an `Unknown` variant so the validity
//! filter can discard them instead of failing the whole log.

/// State-change kind carried by the `is_statechange` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateChange {
    None,
    EnterCombat,
    ExitCombat,
    ChangeUp,
    ChangeDead,
    ChangeDown,
    Spawn,
    Despawn,
    HealthUpdate,
    LogStart,
    LogEnd,
    WeaponSwap,
    MaxHealthUpdate,
    PointOfView,
    Language,
    GwBuild,
    ShardId,
    Reward,
    BuffInitial,
    Position,
    Velocity,
    Rotation,
    TeamChange,
    AttackTarget,
    Targetable,
    MapId,
    ReplInfo,
    StackActive,
    StackReset,
    Guild,
    BuffInfo,
    BuffFormula,
    SkillInfo,
    SkillTiming,
    BreakbarState,
    BreakbarPercent,
    Error,
    Tag,
    Unknown,
}

impl StateChange {
    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => Self::None,
            1 => Self::EnterCombat,
            2 => Self::ExitCombat,
            3 => Self::ChangeUp,
            4 => Self::ChangeDead,
            5 => Self::ChangeDown,
            6 => Self::Spawn,
            7 => Self::Despawn,
            8 => Self::HealthUpdate,
            9 => Self::LogStart,
            10 => Self::LogEnd,
            11 => Self::WeaponSwap,
            12 => Self::MaxHealthUpdate,
            13 => Self::PointOfView,
            14 => Self::Language,
            15 => Self::GwBuild,
            16 => Self::ShardId,
            17 => Self::Reward,
            18 => Self::BuffInitial,
            19 => Self::Position,
            20 => Self::Velocity,
            21 => Self::Rotation,
            22 => Self::TeamChange,
            23 => Self::AttackTarget,
            24 => Self::Targetable,
            25 => Self::MapId,
            26 => Self::ReplInfo,
            27 => Self::StackActive,
            28 => Self::StackReset,
            29 => Self::Guild,
            30 => Self::BuffInfo,
            31 => Self::BuffFormula,
            32 => Self::SkillInfo,
            33 => Self::SkillTiming,
            34 => Self::BreakbarState,
            35 => Self::BreakbarPercent,
            36 => Self::Error,
            37 => Self::Tag,
            _ => Self::Unknown,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::None => 0,
            Self::EnterCombat => 1,
            Self::ExitCombat => 2,
            Self::ChangeUp => 3,
            Self::ChangeDead => 4,
            Self::ChangeDown => 5,
            Self::Spawn => 6,
            Self::Despawn => 7,
            Self::HealthUpdate => 8,
            Self::LogStart => 9,
            Self::LogEnd => 10,
            Self::WeaponSwap => 11,
            Self::MaxHealthUpdate => 12,
            Self::PointOfView => 13,
            Self::Language => 14,
            Self::GwBuild => 15,
            Self::ShardId => 16,
            Self::Reward => 17,
            Self::BuffInitial => 18,
            Self::Position => 19,
            Self::Velocity => 20,
            Self::Rotation => 21,
            Self::TeamChange => 22,
            Self::AttackTarget => 23,
            Self::Targetable => 24,
            Self::MapId => 25,
            Self::ReplInfo => 26,
            Self::StackActive => 27,
            Self::StackReset => 28,
            Self::Guild => 29,
            Self::BuffInfo => 30,
            Self::BuffFormula => 31,
            Self::SkillInfo => 32,
            Self::SkillTiming => 33,
            Self::BreakbarState => 34,
            Self::BreakbarPercent => 35,
            Self::Error => 36,
            Self::Tag => 37,
            Self::Unknown => 255,
        }
    }

    /// Whether `src_agent` refers to an actual agent for this kind.
    pub fn src_is_agent(self) -> bool {
        matches!(
            self,
            Self::None
                | Self::EnterCombat
                | Self::ExitCombat
                | Self::ChangeUp
                | Self::ChangeDead
                | Self::ChangeDown
                | Self::Spawn
                | Self::Despawn
                | Self::HealthUpdate
                | Self::WeaponSwap
                | Self::MaxHealthUpdate
                | Self::PointOfView
                | Self::Position
                | Self::Velocity
                | Self::Rotation
                | Self::TeamChange
                | Self::AttackTarget
                | Self::Targetable
                | Self::StackActive
                | Self::StackReset
                | Self::BreakbarState
                | Self::BreakbarPercent
                | Self::Tag
        )
    }

    /// Whether `dst_agent` refers to an actual agent for this kind.
    pub fn dst_is_agent(self) -> bool {
        matches!(self, Self::None | Self::AttackTarget)
    }

    /// Whether the item's timestamp is meaningful fight time.
    pub fn has_time(self) -> bool {
        self.src_is_agent() || matches!(self, Self::LogStart | Self::LogEnd | Self::Reward)
    }
}

/// Buff removal kind carried by the `is_buffremove` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum BuffRemoveKind {
    #[default]
    None,
    All,
    Single,
    Manual,
}

impl BuffRemoveKind {
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Self::All,
            2 => Self::Single,
            3 => Self::Manual,
            _ => Self::None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::None => 0,
            Self::All => 1,
            Self::Single => 2,
            Self::Manual => 3,
        }
    }
}

/// Skill activation kind carried by the `is_activation` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum Activation {
    #[default]
    None,
    Normal,
    Quickness,
    CancelFire,
    CancelCancel,
    Reset,
}

impl Activation {
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Self::Normal,
            2 => Self::Quickness,
            3 => Self::CancelFire,
            4 => Self::CancelCancel,
            5 => Self::Reset,
            _ => Self::None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Normal => 1,
            Self::Quickness => 2,
            Self::CancelFire => 3,
            Self::CancelCancel => 4,
            Self::Reset => 5,
        }
    }
}

/// Friend-or-foe byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affinity {
    Friend,
    Foe,
    #[default]
    Unknown,
}

impl Affinity {
    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => Self::Friend,
            1 => Self::Foe,
            _ => Self::Unknown,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::Friend => 0,
            Self::Foe => 1,
            Self::Unknown => 2,
        }
    }
}

/// Physical hit result byte for direct damage items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum HitResult {
    Normal,
    Critical,
    Glance,
    Block,
    Evade,
    Interrupt,
    Absorb,
    Blind,
    KillingBlow,
    Downed,
    Breakbar,
    Activation,
    Unknown,
}

impl HitResult {
    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => Self::Normal,
            1 => Self::Critical,
            2 => Self::Glance,
            3 => Self::Block,
            4 => Self::Evade,
            5 => Self::Interrupt,
            6 => Self::Absorb,
            7 => Self::Blind,
            8 => Self::KillingBlow,
            9 => Self::Downed,
            10 => Self::Breakbar,
            11 => Self::Activation,
            _ => Self::Unknown,
        }
    }

    /// Results that actually connect with the target.
    pub fn is_hit(self) -> bool {
        matches!(
            self,
            Self::Normal | Self::Critical | Self::Glance | Self::KillingBlow | Self::Downed
        )
    }
}
