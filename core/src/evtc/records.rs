//! Fixed-layout record decoding.
//!
//! Three record kinds make up the body of a log: 96-byte agent records,
//! 68-byte skill records and 64-byte combat items. Combat items exist in
//! two on-disk layouts selected by the header revision byte. Revision 0
//! has narrow overstack/skill fields and no destination-master instance
//! id, revision 1 and later widen both and add it. Both layouts are 64
//! bytes and must decode byte for byte.

use super::enums::{Activation, Affinity, BuffRemoveKind, StateChange};
use super::error::EvtcError;
use super::reader::ByteCursor;

/// One entry of the raw agent table.
#[derive(Debug, Clone)]
pub struct RawAgent {
    pub agent: u64,
    pub prof: u32,
    pub is_elite: u32,
    pub toughness: u16,
    pub concentration: u16,
    pub healing: u16,
    pub condition: u16,
    /// Stored halved on disk, doubled here.
    pub hitbox_width: u32,
    pub hitbox_height: u32,
    /// Full 68-byte name field with interior NULs preserved. Player names
    /// embed `character\0account\0subgroup`.
    pub name: String,
}

impl RawAgent {
    pub fn decode(c: &mut ByteCursor<'_>) -> Result<Self, EvtcError> {
        let agent = c.u64("agent handle")?;
        let prof = c.u32("agent profession")?;
        let is_elite = c.u32("agent elite")?;
        let toughness = c.u16("agent toughness")?;
        let concentration = c.u16("agent concentration")?;
        let healing = c.u16("agent healing")?;
        let hitbox_width = 2 * u32::from(c.u16("agent hitbox width")?);
        let condition = c.u16("agent condition")?;
        let hitbox_height = 2 * u32::from(c.u16("agent hitbox height")?);
        let name = c.fixed_string(68, false, "agent name")?;
        Ok(Self {
            agent,
            prof,
            is_elite,
            toughness,
            concentration,
            healing,
            condition,
            hitbox_width,
            hitbox_height,
            name,
        })
    }
}

/// One entry of the raw skill table.
#[derive(Debug, Clone)]
pub struct RawSkill {
    pub id: i32,
    pub name: String,
}

impl RawSkill {
    pub fn decode(c: &mut ByteCursor<'_>) -> Result<Self, EvtcError> {
        let id = c.i32("skill id")?;
        let name = c.fixed_string(64, true, "skill name")?;
        Ok(Self { id, name })
    }
}

/// One 64-byte combat item, revision differences normalized to the wide
/// layout. `pad` carries the buff stack identifier on apply/remove-single
/// and stack-reset items under revision 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatItem {
    pub time: i64,
    pub src_agent: u64,
    pub dst_agent: u64,
    pub value: i32,
    pub buff_dmg: i32,
    pub overstack_value: u32,
    pub skill_id: u32,
    pub src_instid: u16,
    pub dst_instid: u16,
    pub src_master_instid: u16,
    pub dst_master_instid: u16,
    pub iff: Affinity,
    pub buff: u8,
    pub result: u8,
    pub is_activation: Activation,
    pub is_buffremove: BuffRemoveKind,
    pub is_ninety: bool,
    pub is_fifty: bool,
    pub is_moving: bool,
    pub is_statechange: StateChange,
    pub is_flanking: bool,
    pub is_shields: bool,
    pub is_offcycle: bool,
    pub pad: u32,
}

impl CombatItem {
    /// Legacy 64-byte layout (revision 0).
    pub fn decode_rev0(c: &mut ByteCursor<'_>) -> Result<Self, EvtcError> {
        let time = c.i64("item time")?;
        let src_agent = c.u64("item src agent")?;
        let dst_agent = c.u64("item dst agent")?;
        let value = c.i32("item value")?;
        let buff_dmg = c.i32("item buff damage")?;
        let overstack_value = u32::from(c.u16("item overstack")?);
        let skill_id = u32::from(c.u16("item skill id")?);
        let src_instid = c.u16("item src instid")?;
        let dst_instid = c.u16("item dst instid")?;
        let src_master_instid = c.u16("item src master instid")?;
        c.skip(9, "item padding")?;
        let flags = Flags::decode(c)?;
        c.skip(1, "item padding")?;
        Ok(flags.build(
            time,
            src_agent,
            dst_agent,
            value,
            buff_dmg,
            overstack_value,
            skill_id,
            src_instid,
            dst_instid,
            src_master_instid,
            0,
            0,
        ))
    }

    /// Extended 64-byte layout (revision 1 and later).
    pub fn decode_rev1(c: &mut ByteCursor<'_>) -> Result<Self, EvtcError> {
        let time = c.i64("item time")?;
        let src_agent = c.u64("item src agent")?;
        let dst_agent = c.u64("item dst agent")?;
        let value = c.i32("item value")?;
        let buff_dmg = c.i32("item buff damage")?;
        let overstack_value = c.u32("item overstack")?;
        let skill_id = c.u32("item skill id")?;
        let src_instid = c.u16("item src instid")?;
        let dst_instid = c.u16("item dst instid")?;
        let src_master_instid = c.u16("item src master instid")?;
        let dst_master_instid = c.u16("item dst master instid")?;
        let flags = Flags::decode(c)?;
        let pad = c.u32("item pad")?;
        Ok(flags.build(
            time,
            src_agent,
            dst_agent,
            value,
            buff_dmg,
            overstack_value,
            skill_id,
            src_instid,
            dst_instid,
            src_master_instid,
            dst_master_instid,
            pad,
        ))
    }

    /// Health-update items carry percent * 100 in `dst_agent`.
    pub fn health_percent(&self) -> f64 {
        self.dst_agent as f64 / 100.0
    }
}

/// The twelve flag bytes shared by both revisions.
struct Flags {
    iff: Affinity,
    buff: u8,
    result: u8,
    is_activation: Activation,
    is_buffremove: BuffRemoveKind,
    is_ninety: bool,
    is_fifty: bool,
    is_moving: bool,
    is_statechange: StateChange,
    is_flanking: bool,
    is_shields: bool,
    is_offcycle: bool,
}

impl Flags {
    fn decode(c: &mut ByteCursor<'_>) -> Result<Self, EvtcError> {
        Ok(Self {
            iff: Affinity::from_byte(c.u8("item iff")?),
            buff: c.u8("item buff")?,
            result: c.u8("item result")?,
            is_activation: Activation::from_byte(c.u8("item activation")?),
            is_buffremove: BuffRemoveKind::from_byte(c.u8("item buffremove")?),
            is_ninety: c.u8("item ninety")? != 0,
            is_fifty: c.u8("item fifty")? != 0,
            is_moving: c.u8("item moving")? != 0,
            is_statechange: StateChange::from_byte(c.u8("item statechange")?),
            is_flanking: c.u8("item flanking")? != 0,
            is_shields: c.u8("item shields")? != 0,
            is_offcycle: c.u8("item offcycle")? != 0,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        self,
        time: i64,
        src_agent: u64,
        dst_agent: u64,
        value: i32,
        buff_dmg: i32,
        overstack_value: u32,
        skill_id: u32,
        src_instid: u16,
        dst_instid: u16,
        src_master_instid: u16,
        dst_master_instid: u16,
        pad: u32,
    ) -> CombatItem {
        CombatItem {
            time,
            src_agent,
            dst_agent,
            value,
            buff_dmg,
            overstack_value,
            skill_id,
            src_instid,
            dst_instid,
            src_master_instid,
            dst_master_instid,
            iff: self.iff,
            buff: self.buff,
            result: self.result,
            is_activation: self.is_activation,
            is_buffremove: self.is_buffremove,
            is_ninety: self.is_ninety,
            is_fifty: self.is_fifty,
            is_moving: self.is_moving,
            is_statechange: self.is_statechange,
            is_flanking: self.is_flanking,
            is_shields: self.is_shields,
            is_offcycle: self.is_offcycle,
            pad,
        }
    }
}

#[cfg(test)]
pub(crate) mod encode {
    //! Test-only encoders mirroring both on-disk layouts.

    use super::*;

    fn push_flags(out: &mut Vec<u8>, item: &CombatItem) {
        out.push(item.iff.to_byte());
        out.push(item.buff);
        out.push(item.result);
        out.push(item.is_activation.to_byte());
        out.push(item.is_buffremove.to_byte());
        out.push(item.is_ninety as u8);
        out.push(item.is_fifty as u8);
        out.push(item.is_moving as u8);
        out.push(item.is_statechange.to_byte());
        out.push(item.is_flanking as u8);
        out.push(item.is_shields as u8);
        out.push(item.is_offcycle as u8);
    }

    pub fn combat_item_rev0(item: &CombatItem) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        out.extend_from_slice(&item.time.to_le_bytes());
        out.extend_from_slice(&item.src_agent.to_le_bytes());
        out.extend_from_slice(&item.dst_agent.to_le_bytes());
        out.extend_from_slice(&item.value.to_le_bytes());
        out.extend_from_slice(&item.buff_dmg.to_le_bytes());
        out.extend_from_slice(&(item.overstack_value as u16).to_le_bytes());
        out.extend_from_slice(&(item.skill_id as u16).to_le_bytes());
        out.extend_from_slice(&item.src_instid.to_le_bytes());
        out.extend_from_slice(&item.dst_instid.to_le_bytes());
        out.extend_from_slice(&item.src_master_instid.to_le_bytes());
        out.extend_from_slice(&[0u8; 9]);
        push_flags(&mut out, item);
        out.push(0);
        assert_eq!(out.len(), 64);
        out
    }

    pub fn combat_item_rev1(item: &CombatItem) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        out.extend_from_slice(&item.time.to_le_bytes());
        out.extend_from_slice(&item.src_agent.to_le_bytes());
        out.extend_from_slice(&item.dst_agent.to_le_bytes());
        out.extend_from_slice(&item.value.to_le_bytes());
        out.extend_from_slice(&item.buff_dmg.to_le_bytes());
        out.extend_from_slice(&item.overstack_value.to_le_bytes());
        out.extend_from_slice(&item.skill_id.to_le_bytes());
        out.extend_from_slice(&item.src_instid.to_le_bytes());
        out.extend_from_slice(&item.dst_instid.to_le_bytes());
        out.extend_from_slice(&item.src_master_instid.to_le_bytes());
        out.extend_from_slice(&item.dst_master_instid.to_le_bytes());
        push_flags(&mut out, item);
        out.extend_from_slice(&item.pad.to_le_bytes());
        assert_eq!(out.len(), 64);
        out
    }

    pub fn raw_agent(a: &RawAgent) -> Vec<u8> {
        let mut out = Vec::with_capacity(96);
        out.extend_from_slice(&a.agent.to_le_bytes());
        out.extend_from_slice(&a.prof.to_le_bytes());
        out.extend_from_slice(&a.is_elite.to_le_bytes());
        out.extend_from_slice(&a.toughness.to_le_bytes());
        out.extend_from_slice(&a.concentration.to_le_bytes());
        out.extend_from_slice(&a.healing.to_le_bytes());
        out.extend_from_slice(&((a.hitbox_width / 2) as u16).to_le_bytes());
        out.extend_from_slice(&a.condition.to_le_bytes());
        out.extend_from_slice(&((a.hitbox_height / 2) as u16).to_le_bytes());
        let mut name = a.name.as_bytes().to_vec();
        name.resize(68, 0);
        out.extend_from_slice(&name);
        assert_eq!(out.len(), 96);
        out
    }

    pub fn raw_skill(s: &RawSkill) -> Vec<u8> {
        let mut out = Vec::with_capacity(68);
        out.extend_from_slice(&s.id.to_le_bytes());
        let mut name = s.name.as_bytes().to_vec();
        name.resize(64, 0);
        out.extend_from_slice(&name);
        assert_eq!(out.len(), 68);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> CombatItem {
        CombatItem {
            time: 123_456_789,
            src_agent: 0xDEAD_BEEF_CAFE,
            dst_agent: 42,
            value: -1500,
            buff_dmg: 275,
            overstack_value: 800,
            skill_id: 64_321,
            src_instid: 17,
            dst_instid: 99,
            src_master_instid: 3,
            dst_master_instid: 5,
            iff: Affinity::Foe,
            buff: 1,
            result: 2,
            is_activation: Activation::Quickness,
            is_buffremove: BuffRemoveKind::Single,
            is_ninety: true,
            is_fifty: false,
            is_moving: true,
            is_statechange: StateChange::None,
            is_flanking: true,
            is_shields: false,
            is_offcycle: true,
            pad: 77,
        }
    }

    #[test]
    fn rev1_round_trip_preserves_all_fields() {
        let item = sample_item();
        let bytes = encode::combat_item_rev1(&item);
        let mut c = ByteCursor::new(&bytes);
        let decoded = CombatItem::decode_rev1(&mut c).unwrap();
        assert_eq!(decoded, item);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn rev0_round_trip_preserves_narrow_fields() {
        let mut item = sample_item();
        // rev0 has no dst master, no pad, and narrow overstack/skill fields
        item.dst_master_instid = 0;
        item.pad = 0;
        item.overstack_value = 800;
        item.skill_id = 64_321;
        let bytes = encode::combat_item_rev0(&item);
        let mut c = ByteCursor::new(&bytes);
        let decoded = CombatItem::decode_rev0(&mut c).unwrap();
        assert_eq!(decoded, item);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn agent_record_round_trip() {
        let agent = RawAgent {
            agent: 9001,
            prof: 4,
            is_elite: 55,
            toughness: 210,
            concentration: 300,
            healing: 0,
            condition: 150,
            hitbox_width: 96,
            hitbox_height: 240,
            name: "Sic Em Please\0account.1234\01".to_string(),
        };
        let bytes = encode::raw_agent(&agent);
        let mut c = ByteCursor::new(&bytes);
        let decoded = RawAgent::decode(&mut c).unwrap();
        assert_eq!(decoded.agent, agent.agent);
        assert_eq!(decoded.hitbox_width, 96);
        assert_eq!(decoded.name, agent.name);
    }

    #[test]
    fn skill_record_round_trip() {
        let skill = RawSkill {
            id: 9292,
            name: "Symbol of Punishment".to_string(),
        };
        let bytes = encode::raw_skill(&skill);
        let mut c = ByteCursor::new(&bytes);
        let decoded = RawSkill::decode(&mut c).unwrap();
        assert_eq!(decoded.id, skill.id);
        assert_eq!(decoded.name, skill.name);
    }
}
