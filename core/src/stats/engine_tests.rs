use crate::agents::{AgentId, AgentItem, AgentStore};
use crate::buffs::{BuffCatalog, IntensitySimulator};
use crate::error::ParseError;
use crate::events::{BreakbarDamageEvent, DamageEvent, DamageKind, Event};
use crate::evtc::HitResult;
use crate::operation::Operation;
use crate::rules::PhaseData;
use crate::testutil::{raw_npc, raw_player};

use super::*;

// Arena layout: 0 = player, 1 = the player's minion, 2 = the boss.
fn arena() -> AgentStore {
    let mut store = AgentStore::from_agents(vec![
        AgentItem::from_raw(&raw_player(1, "player")).unwrap(),
        AgentItem::from_raw(&raw_npc(2, 1_000, "minion")).unwrap(),
        AgentItem::from_raw(&raw_npc(3, 15_000, "boss")).unwrap(),
    ]);
    store.get_mut(AgentId::from_index(1)).master = Some(AgentId::from_index(0));
    store
}

fn hit(time: i64, src: usize, dst: usize, damage: i32, kind: DamageKind) -> Event {
    Event::Damage(DamageEvent {
        time,
        src: AgentId::from_index(src),
        dst: AgentId::from_index(dst),
        skill_id: 100,
        damage,
        kind,
        result: HitResult::Normal,
        is_flanking: false,
        over_ninety: false,
        target_under_fifty: false,
        target_moving: false,
        against_shield: false,
    })
}

fn full_phase(duration_ms: i64) -> PhaseData {
    PhaseData::new("Full Fight", 0, duration_ms, vec![AgentId::from_index(2)])
}

#[test]
fn dps_splits_power_and_condition_and_rounds_the_rates() {
    let store = arena();
    let events = vec![
        hit(1_000, 0, 2, 2_000, DamageKind::Direct),
        hit(2_000, 0, 2, 1_500, DamageKind::Condition),
        hit(3_000, 0, 2, 1_500, DamageKind::Condition),
    ];
    let phase = full_phase(10_000);

    let dps = FinalDps::compute(&events, &store, AgentId::from_index(0), None, &phase);
    assert_eq!(dps.damage, 5_000);
    assert_eq!(dps.condi_damage, 3_000);
    assert_eq!(dps.power_damage, 2_000);
    assert_eq!(dps.dps, 500);
    assert_eq!(dps.condi_dps, 300);
    assert_eq!(dps.power_dps, 200);
}

#[test]
fn zero_duration_phase_yields_zero_rates() {
    let store = arena();
    let events = vec![hit(0, 0, 2, 4_000, DamageKind::Direct)];
    let phase = PhaseData::new("instant", 0, 0, vec![]);

    let dps = FinalDps::compute(&events, &store, AgentId::from_index(0), None, &phase);
    assert_eq!(dps.dps, 0);
    assert_eq!(dps.condi_dps, 0);
    assert_eq!(dps.power_dps, 0);
}

#[test]
fn minion_damage_credits_the_owner_but_not_the_actor_split() {
    let store = arena();
    let events = vec![
        hit(1_000, 0, 2, 3_000, DamageKind::Direct),
        hit(2_000, 1, 2, 1_000, DamageKind::Direct),
    ];
    let phase = full_phase(10_000);

    let dps = FinalDps::compute(&events, &store, AgentId::from_index(0), None, &phase);
    assert_eq!(dps.damage, 4_000);
    assert_eq!(dps.actor_damage, 3_000);
}

#[test]
fn target_filter_restricts_the_breakdown() {
    let store = arena();
    let events = vec![
        hit(1_000, 0, 2, 3_000, DamageKind::Direct),
        hit(2_000, 0, 1, 9_999, DamageKind::Direct),
    ];
    let phase = full_phase(10_000);

    let target = AgentId::from_index(2);
    let dps = FinalDps::compute(&events, &store, AgentId::from_index(0), Some(target), &phase);
    assert_eq!(dps.damage, 3_000);
}

#[test]
fn breakbar_damage_is_rounded_to_one_decimal() {
    let store = arena();
    let events = vec![
        Event::BreakbarDamage(BreakbarDamageEvent {
            time: 1_000,
            src: AgentId::from_index(0),
            dst: AgentId::from_index(2),
            skill_id: 100,
            damage: 100.26,
        }),
        Event::BreakbarDamage(BreakbarDamageEvent {
            time: 2_000,
            src: AgentId::from_index(0),
            dst: AgentId::from_index(2),
            skill_id: 100,
            damage: 50.11,
        }),
    ];
    let phase = full_phase(10_000);

    let dps = FinalDps::compute(&events, &store, AgentId::from_index(0), None, &phase);
    assert_eq!(dps.breakbar_damage, 150.4);
}

#[test]
fn modifier_gain_scales_with_the_stack_graph() {
    // Three 10s stacks up from the start, one hit inside, one after expiry.
    let mut sim = IntensitySimulator::new();
    sim.apply(Some(AgentId::from_index(0)), 0, 10_000);
    sim.apply(Some(AgentId::from_index(0)), 0, 10_000);
    sim.apply(Some(AgentId::from_index(0)), 0, 10_000);
    let graph = sim.finish(20_000);

    let modifier = DamageModifier::new(
        "per stack",
        740,
        GainComputer::PerStack { gain_per_stack: 0.05 },
        HitPredicate::Any,
    );
    let hits = [
        DamageEvent {
            time: 5_000,
            src: AgentId::from_index(0),
            dst: AgentId::from_index(2),
            skill_id: 100,
            damage: 1_000,
            kind: DamageKind::Direct,
            result: HitResult::Normal,
            is_flanking: false,
            over_ninety: false,
            target_under_fifty: false,
            target_moving: false,
            against_shield: false,
        },
        DamageEvent {
            time: 15_000,
            src: AgentId::from_index(0),
            dst: AgentId::from_index(2),
            skill_id: 100,
            damage: 1_000,
            kind: DamageKind::Direct,
            result: HitResult::Normal,
            is_flanking: false,
            over_ninety: false,
            target_under_fifty: false,
            target_moving: false,
            against_shield: false,
        },
    ];
    let phase = full_phase(20_000);

    let stat = DamageModifierStat::compute(&modifier, &graph, hits.iter(), &phase);
    assert_eq!(stat.total_count, 2);
    assert_eq!(stat.hit_count, 1);
    assert_eq!(stat.total_damage, 2_000);
    // 1000 damage at 3 stacks of 5%.
    assert!((stat.damage_gain - 150.0).abs() < 1e-9);
}

#[test]
fn engine_computes_each_actor_and_phase() {
    let store = arena();
    let events = vec![hit(1_000, 0, 2, 5_000, DamageKind::Direct)];
    let phases = vec![full_phase(10_000)];
    let catalog = BuffCatalog::builtin();
    let engine = StatisticsEngine::new(&events, &store, &phases, &catalog, &[], 10_000);

    let stats = engine
        .compute(&[AgentId::from_index(0)], &Operation::new())
        .unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].phases.len(), 1);
    assert_eq!(stats[0].phases[0].dps_all.dps, 500);
    assert_eq!(stats[0].phases[0].dps_targets.len(), 1);
}

#[test]
fn modifier_attribution_is_split_per_target() {
    let store = arena();
    // One hit on the boss, one on the minion. Only the boss is a phase
    // target, so the per-target breakdown must not see the second hit.
    let events = vec![
        hit(1_000, 0, 2, 2_000, DamageKind::Direct),
        hit(2_000, 0, 1, 1_000, DamageKind::Direct),
    ];
    let phases = vec![full_phase(10_000)];
    let catalog = BuffCatalog::builtin();
    let modifiers = vec![DamageModifier::new(
        "no might",
        740,
        GainComputer::ByAbsence { gain: 0.1 },
        HitPredicate::Any,
    )];
    let engine = StatisticsEngine::new(&events, &store, &phases, &catalog, &modifiers, 10_000);

    let stats = engine
        .compute(&[AgentId::from_index(0)], &Operation::new())
        .unwrap();
    let phase = &stats[0].phases[0];

    let (_, all) = &phase.modifiers[0];
    assert_eq!(all.total_count, 2);
    assert_eq!(all.total_damage, 3_000);
    assert!((all.damage_gain - 300.0).abs() < 1e-9);

    assert_eq!(phase.modifiers_targets.len(), 1);
    let (target, per_target) = &phase.modifiers_targets[0];
    assert_eq!(*target, AgentId::from_index(2));
    let (_, stat) = &per_target[0];
    assert_eq!(stat.total_count, 1);
    assert_eq!(stat.total_damage, 2_000);
    assert!((stat.damage_gain - 200.0).abs() < 1e-9);
}

#[test]
fn cancelled_operation_aborts_before_the_fan_out() {
    let store = arena();
    let events: Vec<Event> = Vec::new();
    let phases = vec![full_phase(10_000)];
    let catalog = BuffCatalog::builtin();
    let engine = StatisticsEngine::new(&events, &store, &phases, &catalog, &[], 10_000);

    let operation = Operation::new();
    operation.cancel();
    let err = engine
        .compute(&[AgentId::from_index(0)], &operation)
        .unwrap_err();
    assert!(matches!(err, ParseError::Cancelled(_)));
}
