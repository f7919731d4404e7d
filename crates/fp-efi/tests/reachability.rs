//! Integration tests for fp-efi: reachability and demand projection.

use std::collections::BTreeSet;

use chrono::{TimeDelta, TimeZone, Utc};
use fp_core::{
    ActuatorId, Commodity, FlowRate, Instant, ModeId, ResourceId, TimerId, m3ps, minutes, watts,
};
use fp_efi::{
    Behavior, BufferActuator, EfiError, FillLevelFunction, RangeElement, Registration,
    RunningMode, StateUpdate, SystemDescription, Timer, TimerUpdate, Transition,
    UnconstrainedActuator, UpdateOutcome,
};
use proptest::prelude::*;

fn t0() -> Instant {
    Utc.with_ymd_and_hms(2014, 10, 17, 9, 0, 0).unwrap()
}

fn at_minutes(m: i64) -> Instant {
    t0() + TimeDelta::minutes(m)
}

fn registration(id: &str) -> Registration {
    Registration {
        resource_id: ResourceId::from(id),
        actuator_id: ActuatorId(0),
        label: id.to_string(),
        supported_commodities: BTreeSet::from([Commodity::Electricity]),
    }
}

fn electric(power_w: f64) -> Behavior {
    Behavior::new(0.0).with_consumption(FlowRate::Power(watts(power_w)))
}

fn flat(power_w: f64) -> FillLevelFunction<Behavior> {
    FillLevelFunction::new(vec![RangeElement::new(0.0, 1.0, electric(power_w))]).unwrap()
}

/// Buffer with modes 1=off and 2=on; off->on is blocked by timer 1.
fn off_on_description() -> SystemDescription<FillLevelFunction<Behavior>> {
    let min_off = Timer::new(TimerId(1), "minimum off time", minutes(5.0));
    SystemDescription {
        resource_id: ResourceId::from("boiler"),
        valid_from: t0(),
        valid_thru: at_minutes(60),
        running_modes: vec![
            RunningMode::new(ModeId(1), "off", flat(0.0))
                .with_transition(Transition::new(ModeId(2)).blocked_by(min_off.clone())),
            RunningMode::new(ModeId(2), "on", flat(3_000.0))
                .with_transition(Transition::new(ModeId(1)).starts(min_off)),
        ],
        leakage_rate: Some(0.0001),
    }
}

fn state(mode: u32, timer_updates: Vec<TimerUpdate>, fill_level: Option<f64>) -> StateUpdate {
    StateUpdate {
        resource_id: ResourceId::from("boiler"),
        valid_from: t0(),
        valid_thru: at_minutes(60),
        current_running_mode_id: ModeId(mode),
        timer_updates,
        fill_level,
    }
}

fn ids(raw: &[u32]) -> BTreeSet<ModeId> {
    raw.iter().copied().map(ModeId).collect()
}

#[test]
fn fresh_actuator_reaches_nothing() {
    let act = BufferActuator::new(&registration("boiler"));
    for m in [-60, 0, 5, 10_000] {
        assert!(act.reachable_mode_ids(at_minutes(m)).is_empty());
    }
    assert!(!act.has_received_system_description());
    assert!(!act.has_received_state_update());
}

#[test]
fn description_without_state_reaches_nothing() {
    let mut act = BufferActuator::new(&registration("boiler"));
    act.install_system_description(off_on_description()).unwrap();
    assert!(act.has_received_system_description());
    assert!(act.reachable_mode_ids(t0()).is_empty());
    assert!(act.possible_demands(t0(), 0.5).unwrap().is_empty());
}

#[test]
fn timer_blocks_until_it_finishes() {
    let mut act = BufferActuator::new(&registration("boiler"));
    act.install_system_description(off_on_description()).unwrap();
    let outcome = act
        .apply_state_update(state(
            1,
            vec![TimerUpdate::new(TimerId(1), at_minutes(5))],
            Some(0.3),
        ))
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Applied);

    assert_eq!(act.reachable_mode_ids(at_minutes(0)), ids(&[1]));
    assert_eq!(act.reachable_mode_ids(at_minutes(4)), ids(&[1]));
    // finish instant itself no longer blocks
    assert_eq!(act.reachable_mode_ids(at_minutes(5)), ids(&[1, 2]));
    assert_eq!(act.reachable_mode_ids(at_minutes(6)), ids(&[1, 2]));
}

#[test]
fn demands_follow_reachable_modes() {
    let mut act = BufferActuator::new(&registration("boiler"));
    act.install_system_description(off_on_description()).unwrap();
    act.apply_state_update(state(
        1,
        vec![TimerUpdate::new(TimerId(1), at_minutes(5))],
        Some(0.3),
    ))
    .unwrap();

    assert_eq!(act.possible_demands(at_minutes(0), 0.3).unwrap(), vec![watts(0.0)]);
    assert_eq!(
        act.possible_demands(at_minutes(6), 0.3).unwrap(),
        vec![watts(0.0), watts(3_000.0)]
    );
}

#[test]
fn fill_level_lookup_clamps_and_uses_half_open_ranges() {
    let low = electric(500.0);
    let high = electric(1_500.0);
    let function = FillLevelFunction::new(vec![
        RangeElement::new(0.0, 0.5, low),
        RangeElement::new(0.5, 1.0, high),
    ])
    .unwrap();
    let mut act = BufferActuator::new(&registration("boiler"));
    act.install_system_description(SystemDescription {
        resource_id: ResourceId::from("boiler"),
        valid_from: t0(),
        valid_thru: t0(),
        running_modes: vec![RunningMode::new(ModeId(1), "heating", function)],
        leakage_rate: None,
    })
    .unwrap();
    act.apply_state_update(state(1, vec![], Some(0.2))).unwrap();

    assert_eq!(act.possible_demands(t0(), -0.2).unwrap(), vec![watts(500.0)]);
    assert_eq!(act.possible_demands(t0(), 1.5).unwrap(), vec![watts(1_500.0)]);
    // [lower, upper): a level on the shared boundary belongs to the upper element
    assert_eq!(act.possible_demands(t0(), 0.5).unwrap(), vec![watts(1_500.0)]);
    assert_eq!(act.possible_demands(t0(), 1.0).unwrap(), vec![watts(1_500.0)]);

    assert_eq!(act.minimum_fill_level().unwrap(), 0.0);
    assert_eq!(act.maximum_fill_level().unwrap(), 1.0);
}

#[test]
fn fill_level_bounds_span_every_mode() {
    let mut act = BufferActuator::new(&registration("boiler"));
    act.install_system_description(SystemDescription {
        resource_id: ResourceId::from("boiler"),
        valid_from: t0(),
        valid_thru: t0(),
        running_modes: vec![
            RunningMode::new(
                ModeId(1),
                "a",
                FillLevelFunction::new(vec![RangeElement::new(20.0, 60.0, electric(0.0))])
                    .unwrap(),
            ),
            RunningMode::new(
                ModeId(2),
                "b",
                FillLevelFunction::new(vec![RangeElement::new(40.0, 80.0, electric(0.0))])
                    .unwrap(),
            ),
        ],
        leakage_rate: None,
    })
    .unwrap();
    assert_eq!(act.minimum_fill_level().unwrap(), 20.0);
    assert_eq!(act.maximum_fill_level().unwrap(), 80.0);
}

#[test]
fn empty_fill_level_function_is_an_invalid_graph() {
    let mut act = BufferActuator::new(&registration("boiler"));
    act.install_system_description(SystemDescription {
        resource_id: ResourceId::from("boiler"),
        valid_from: t0(),
        valid_thru: t0(),
        running_modes: vec![RunningMode::new(
            ModeId(1),
            "broken",
            FillLevelFunction::new(vec![]).unwrap(),
        )],
        leakage_rate: None,
    })
    .unwrap();
    act.apply_state_update(state(1, vec![], None)).unwrap();

    assert!(matches!(
        act.possible_demands(t0(), 0.5),
        Err(EfiError::InvalidGraph { .. })
    ));
    assert!(matches!(
        act.minimum_fill_level(),
        Err(EfiError::InvalidGraph { .. })
    ));
    assert!(matches!(
        act.maximum_fill_level(),
        Err(EfiError::InvalidGraph { .. })
    ));
}

#[test]
fn reinstalling_the_same_description_changes_nothing() {
    let update = state(1, vec![TimerUpdate::new(TimerId(1), at_minutes(5))], Some(0.4));

    let mut once = BufferActuator::new(&registration("boiler"));
    once.install_system_description(off_on_description()).unwrap();
    once.apply_state_update(update.clone()).unwrap();

    let mut twice = BufferActuator::new(&registration("boiler"));
    twice.install_system_description(off_on_description()).unwrap();
    twice.install_system_description(off_on_description()).unwrap();
    twice.apply_state_update(update).unwrap();

    for m in [0, 4, 5, 6] {
        assert_eq!(
            once.reachable_mode_ids(at_minutes(m)),
            twice.reachable_mode_ids(at_minutes(m))
        );
        for level in [0.0, 0.4, 1.0] {
            assert_eq!(
                once.possible_demands(at_minutes(m), level).unwrap(),
                twice.possible_demands(at_minutes(m), level).unwrap()
            );
        }
    }
}

#[test]
fn reinstalling_resets_timers() {
    let mut act = BufferActuator::new(&registration("boiler"));
    act.install_system_description(off_on_description()).unwrap();
    act.apply_state_update(state(
        1,
        vec![TimerUpdate::new(TimerId(1), at_minutes(5))],
        None,
    ))
    .unwrap();
    assert_eq!(act.reachable_mode_ids(t0()), ids(&[1]));

    act.install_system_description(off_on_description()).unwrap();
    assert_eq!(act.current_mode_id(), Some(ModeId(1)));
    assert_eq!(act.reachable_mode_ids(t0()), ids(&[1, 2]));
}

#[test]
fn unconstrained_device_reports_multi_commodity_demands() {
    let mut act = UnconstrainedActuator::new(&Registration {
        resource_id: ResourceId::from("chp"),
        actuator_id: ActuatorId(1),
        label: "Micro CHP".to_string(),
        supported_commodities: BTreeSet::from([Commodity::Electricity, Commodity::Gas]),
    });
    let running = Behavior::new(0.2)
        .with_consumption(FlowRate::Power(watts(-1_000.0)))
        .with_consumption(FlowRate::VolumeRate(m3ps(0.0003)));
    act.install_system_description(SystemDescription {
        resource_id: ResourceId::from("chp"),
        valid_from: t0(),
        valid_thru: t0(),
        running_modes: vec![
            RunningMode::new(ModeId(0), "idle", Behavior::new(0.0))
                .with_transition(Transition::new(ModeId(1)).with_costs(0.5)),
            RunningMode::new(ModeId(1), "running", running)
                .with_transition(Transition::new(ModeId(0))),
        ],
        leakage_rate: None,
    })
    .unwrap();
    act.apply_state_update(StateUpdate {
        resource_id: ResourceId::from("chp"),
        valid_from: t0(),
        valid_thru: t0(),
        current_running_mode_id: ModeId(0),
        timer_updates: vec![],
        fill_level: None,
    })
    .unwrap();

    assert_eq!(act.possible_demands(t0()).unwrap(), vec![watts(0.0), watts(-1_000.0)]);
    assert_eq!(
        act.possible_demands_for(Commodity::Gas, t0(), 0.0).unwrap(),
        vec![FlowRate::zero(Commodity::Gas), FlowRate::VolumeRate(m3ps(0.0003))]
    );
}

/// Random graph: `n` modes, each with transitions to arbitrary targets that
/// may be blocked by one of three shared timers.
fn arb_graph() -> impl Strategy<Value = (Vec<RunningMode<FillLevelFunction<Behavior>>>, u32)> {
    (1u32..6).prop_flat_map(|n| {
        let edges = proptest::collection::vec(
            proptest::collection::vec((0..n, proptest::option::of(0u32..3)), 0..4),
            n as usize,
        );
        (edges, 0..n).prop_map(move |(edges, current)| {
            let modes = edges
                .into_iter()
                .enumerate()
                .map(|(i, out)| {
                    let mut mode = RunningMode::new(ModeId(i as u32), format!("m{i}"), flat(i as f64));
                    for (to, timer) in out {
                        let mut transition = Transition::new(ModeId(to));
                        if let Some(t) = timer {
                            transition =
                                transition.blocked_by(Timer::new(TimerId(t), "t", minutes(1.0)));
                        }
                        mode = mode.with_transition(transition);
                    }
                    mode
                })
                .collect();
            (modes, current)
        })
    })
}

proptest! {
    #[test]
    fn current_mode_is_always_reachable(
        (modes, current) in arb_graph(),
        finish in proptest::collection::vec(-10i64..10, 3),
        now in -20i64..20,
        level in -1.0f64..2.0,
    ) {
        let mut act = BufferActuator::new(&registration("boiler"));
        act.install_system_description(SystemDescription {
            resource_id: ResourceId::from("boiler"),
            valid_from: t0(),
            valid_thru: t0(),
            running_modes: modes,
            leakage_rate: None,
        }).unwrap();
        let timer_updates = finish
            .iter()
            .enumerate()
            .map(|(i, m)| TimerUpdate::new(TimerId(i as u32), at_minutes(*m)))
            .collect();
        act.apply_state_update(state(current, timer_updates, Some(level))).unwrap();

        let reachable = act.reachable_mode_ids(at_minutes(now));
        prop_assert!(reachable.contains(&ModeId(current)));

        let demands = act.possible_demands(at_minutes(now), level).unwrap();
        prop_assert_eq!(demands.len(), reachable.len());
    }
}
