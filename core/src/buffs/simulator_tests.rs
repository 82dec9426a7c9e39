use crate::agents::AgentId;

use super::*;

fn agent(n: usize) -> Option<AgentId> {
    Some(AgentId::from_index(n))
}

#[test]
fn intensity_natural_expiry_is_not_waste() {
    let mut sim = IntensitySimulator::new();
    sim.apply(agent(0), 0, 4_000);
    sim.apply(agent(1), 1_000, 2_000);
    let result = sim.finish(10_000);

    assert_eq!(result.ledger.wasted_total(), 0);
    assert_eq!(result.active_ms, 6_000);
    assert_eq!(result.stacks_at(500), 1);
    assert_eq!(result.stacks_at(1_500), 2);
    assert_eq!(result.stacks_at(3_500), 1);
    assert_eq!(result.stacks_at(5_000), 0);
}

#[test]
fn intensity_early_removal_wastes_the_remainder() {
    let mut sim = IntensitySimulator::new();
    sim.apply(agent(0), 0, 10_000);
    sim.remove(4_000, RemovalKind::Partial(1));
    let result = sim.finish(10_000);

    assert_eq!(result.active_ms, 4_000);
    assert_eq!(result.ledger.wasted_total(), 6_000);
    assert_eq!(result.ledger.wasted, vec![(agent(0), 6_000)]);
}

#[test]
fn intensity_full_clear_skips_waste_accounting() {
    let mut sim = IntensitySimulator::new();
    sim.apply(agent(0), 0, 10_000);
    sim.remove(2_000, RemovalKind::Full);
    let result = sim.finish(10_000);

    assert_eq!(result.active_ms, 2_000);
    assert_eq!(result.ledger.wasted_total(), 0);
    assert_eq!(result.stacks_at(3_000), 0);
}

#[test]
fn intensity_ledger_balances_generated_against_active_and_wasted() {
    let mut sim = IntensitySimulator::new();
    sim.apply(agent(0), 0, 5_000);
    sim.apply(agent(1), 500, 3_000);
    sim.extend(agent(2), 1_000, 2_000);
    sim.remove(2_000, RemovalKind::Partial(1));
    let result = sim.finish(6_000);

    assert_eq!(
        result.ledger.generated_total(),
        result.active_ms + result.ledger.wasted_total()
    );
}

#[test]
fn intensity_window_teardown_wastes_leftover_duration() {
    let mut sim = IntensitySimulator::new();
    sim.apply(agent(0), 0, 10_000);
    let result = sim.finish(4_000);

    assert_eq!(result.active_ms, 4_000);
    assert_eq!(result.ledger.wasted_total(), 6_000);
}

#[test]
fn duration_only_the_active_stack_ticks() {
    let mut sim = DurationSimulator::new();
    sim.apply(agent(0), 0, 5_000, 1, true);
    sim.apply(agent(1), 0, 5_000, 2, false);
    let result = sim.finish(4_000);

    // Both stacks are present but only the first one is consumed.
    assert_eq!(result.stacks_at(2_000), 2);
    assert_eq!(result.active_ms, 4_000);
    assert_eq!(result.ledger.wasted_total(), 1_000 + 5_000);
}

#[test]
fn duration_queued_stack_resumes_after_activation() {
    let mut sim = DurationSimulator::new();
    sim.apply(agent(0), 0, 3_000, 1, true);
    sim.apply(agent(1), 0, 3_000, 2, false);
    sim.activate(3_000, 2).unwrap();
    let result = sim.finish(10_000);

    assert_eq!(result.active_ms, 6_000);
    assert_eq!(result.ledger.wasted_total(), 0);
    assert_eq!(result.presence_in(0, 10_000), 6_000);
}

#[test]
fn duration_unknown_stack_ids_are_fatal() {
    let mut sim = DurationSimulator::new();
    sim.apply(agent(0), 0, 5_000, 1, true);

    assert_eq!(
        sim.extend(agent(0), 100, 1_000, 9),
        Err(BuffSimulationError::ExtendUnknownStack {
            stack_id: 9,
            time: 100
        })
    );
    assert_eq!(
        sim.remove(None, 200, 1_000, RemovalKind::Partial(1), 9),
        Err(BuffSimulationError::RemoveUnknownStack {
            stack_id: 9,
            time: 200
        })
    );
    assert_eq!(
        sim.activate(300, 9),
        Err(BuffSimulationError::ActivateUnknownStack {
            stack_id: 9,
            time: 300
        })
    );
    assert_eq!(
        sim.reset(400, 9),
        Err(BuffSimulationError::ResetUnknownStack {
            stack_id: 9,
            time: 400
        })
    );
}

#[test]
fn duration_latent_activation_trusts_the_reported_remainder() {
    let mut sim = DurationSimulator::new();
    // The stack was ticking the whole time but no activation was logged,
    // so the simulator still holds the full 5s when the removal reports
    // only 2s left.
    sim.apply(agent(0), 0, 5_000, 1, false);
    sim.remove(agent(1), 3_000, 2_000, RemovalKind::Partial(1), 1)
        .unwrap();
    let result = sim.finish(10_000);

    // The silent 3s of ticking is credited as consumed, the reported 2s
    // remainder as cleansed waste.
    assert_eq!(result.active_ms, 3_000);
    assert_eq!(result.ledger.wasted_total(), 2_000);
    assert_eq!(
        result.ledger.generated_total(),
        result.active_ms + result.ledger.wasted_total()
    );
}

#[test]
fn duration_override_and_cleanse_waste_identically() {
    let mut over = DurationSimulator::new();
    over.apply(agent(0), 0, 5_000, 1, true);
    over.remove(None, 2_000, 3_000, RemovalKind::Partial(1), 1)
        .unwrap();

    let mut cleanse = DurationSimulator::new();
    cleanse.apply(agent(0), 0, 5_000, 1, true);
    cleanse
        .remove(agent(2), 2_000, 3_000, RemovalKind::Partial(1), 1)
        .unwrap();

    let over = over.finish(5_000);
    let cleanse = cleanse.finish(5_000);
    assert_eq!(over.ledger.wasted, cleanse.ledger.wasted);
    assert_eq!(over.ledger.wasted, vec![(agent(0), 3_000)]);
}

#[test]
fn duration_reused_stack_id_wastes_the_old_remainder() {
    let mut sim = DurationSimulator::new();
    sim.apply(agent(0), 0, 5_000, 1, true);
    sim.apply(agent(1), 2_000, 5_000, 1, true);
    let result = sim.finish(7_000);

    assert_eq!(result.ledger.wasted, vec![(agent(0), 3_000)]);
    assert_eq!(result.active_ms, 7_000);
}

#[test]
fn duration_reset_parks_the_stack() {
    let mut sim = DurationSimulator::new();
    sim.apply(agent(0), 0, 5_000, 1, true);
    sim.reset(1_000, 1).unwrap();
    let result = sim.finish(5_000);

    // 1s ticked before the reset, the parked stack keeps its 4s but never
    // reactivates and dies with the window.
    assert_eq!(result.stacks_at(3_000), 1);
    assert_eq!(result.active_ms, 1_000);
    assert_eq!(result.ledger.wasted_total(), 4_000);
    assert_eq!(
        result.ledger.generated_total(),
        result.active_ms + result.ledger.wasted_total()
    );
}

#[test]
fn duration_single_entry_remove_all_behaves_like_single_removal() {
    let mut sim = DurationSimulator::new();
    sim.apply(agent(0), 0, 5_000, 1, true);
    // Remove-all reporting more stacks than exist, over one entry it is
    // just that entry leaving.
    sim.remove(None, 2_000, 3_000, RemovalKind::Partial(2), 0)
        .unwrap();
    let result = sim.finish(5_000);

    assert_eq!(result.active_ms, 2_000);
    assert_eq!(result.ledger.wasted, vec![(agent(0), 3_000)]);
    assert_eq!(
        result.ledger.generated_total(),
        result.active_ms + result.ledger.wasted_total()
    );
}

#[test]
fn duration_single_entry_remove_all_within_tolerance_is_not_waste() {
    let mut sim = DurationSimulator::new();
    sim.apply(agent(0), 0, 5_000, 1, true);
    sim.remove(None, 4_990, 10, RemovalKind::Partial(1), 0)
        .unwrap();
    let result = sim.finish(10_000);

    // The removal raced natural expiry, the 10ms tail counts as consumed.
    assert_eq!(result.active_ms, 5_000);
    assert_eq!(result.ledger.wasted_total(), 0);
}

#[test]
fn duration_remove_overflow_is_reported() {
    let mut sim = DurationSimulator::new();
    sim.apply(agent(0), 0, 5_000, 1, true);
    sim.apply(agent(1), 0, 5_000, 2, false);

    assert_eq!(
        sim.remove(None, 100, 0, RemovalKind::Partial(3), 0),
        Err(BuffSimulationError::RemoveOverflow {
            requested: 3,
            present: 2,
            time: 100
        })
    );
}

#[test]
fn driver_routes_events_and_tears_down_on_despawn() {
    use crate::events::{BuffApplyEvent, Event, StatusEvent, StatusKind};

    let quickness = Buff::new(1_187, "Quickness", StackingNature::Duration, BuffCategory::Boon, 5);
    let owner = AgentId::from_index(0);
    let events = vec![
        Event::BuffApply(BuffApplyEvent {
            time: 0,
            buff_id: 1_187,
            by: agent(1),
            to: owner,
            duration: 8_000,
            overstack: 0,
            stack_id: 1,
            active: true,
            initial: false,
        }),
        Event::Status(StatusEvent {
            time: 3_000,
            agent: owner,
            kind: StatusKind::Despawn,
        }),
    ];

    let result = simulate_agent_buff(&quickness, owner, &events, 10_000).unwrap();
    assert_eq!(result.active_ms, 3_000);
    // Despawn is a full clear, nobody is blamed for the lost 5s.
    assert_eq!(result.ledger.wasted_total(), 0);
    assert_eq!(result.presence_in(0, 10_000), 3_000);
}
