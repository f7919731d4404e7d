//! Integration tests for fp-agent: message routing and device actors.

use std::collections::BTreeSet;

use chrono::{TimeDelta, TimeZone, Utc};
use fp_agent::{
    AgentError, BufferConfig, DeviceKind, DeviceMessage, DeviceRegistry, Dispatched, StorageConfig,
};
use fp_control::{ControlSpace, PowerConstraintList};
use fp_core::{ActuatorId, Commodity, FlowRate, Instant, ModeId, ResourceId, kwh, minutes, watts};
use fp_efi::{
    Behavior, EfiError, FillLevelFunction, RangeElement, Registration, RunningMode, StateUpdate,
    SystemDescription, Transition, UpdateOutcome,
};
use proptest::prelude::*;

fn t0() -> Instant {
    Utc.with_ymd_and_hms(2014, 10, 17, 9, 0, 0).unwrap()
}

fn register(registry: &DeviceRegistry, id: &str, kind: DeviceKind) {
    let registration = Registration {
        resource_id: ResourceId::from(id),
        actuator_id: ActuatorId(0),
        label: id.to_string(),
        supported_commodities: BTreeSet::from([Commodity::Electricity]),
    };
    registry
        .dispatch(DeviceMessage::Register { kind, registration })
        .unwrap();
}

fn tank_description(id: &str) -> DeviceMessage {
    let function = FillLevelFunction::new(vec![RangeElement::new(
        0.0,
        100.0,
        Behavior::new(0.0).with_consumption(FlowRate::Power(watts(1_200.0))),
    )])
    .unwrap();
    DeviceMessage::BufferDescription(SystemDescription {
        resource_id: ResourceId::from(id),
        valid_from: t0(),
        valid_thru: t0(),
        running_modes: vec![
            RunningMode::new(ModeId(1), "idle", function.clone())
                .with_transition(Transition::new(ModeId(2))),
            RunningMode::new(ModeId(2), "heating", function),
        ],
        leakage_rate: None,
    })
}

fn single_mode_description(id: &str, demand_w: f64) -> DeviceMessage {
    let function = FillLevelFunction::new(vec![RangeElement::new(
        0.0,
        100.0,
        Behavior::new(0.0).with_consumption(FlowRate::Power(watts(demand_w))),
    )])
    .unwrap();
    DeviceMessage::BufferDescription(SystemDescription {
        resource_id: ResourceId::from(id),
        valid_from: t0(),
        valid_thru: t0(),
        running_modes: vec![RunningMode::new(ModeId(1), "holding", function)],
        leakage_rate: None,
    })
}

fn update(id: &str, mode: u32, fill_level: Option<f64>) -> DeviceMessage {
    DeviceMessage::StateUpdate(StateUpdate {
        resource_id: ResourceId::from(id),
        valid_from: t0(),
        valid_thru: t0(),
        current_running_mode_id: ModeId(mode),
        timer_updates: vec![],
        fill_level,
    })
}

fn config() -> BufferConfig {
    BufferConfig {
        total_capacity: kwh(8.0),
        charge_speed: PowerConstraintList::from_powers([watts(0.0), watts(1_200.0)]).unwrap(),
        self_discharge: watts(10.0),
        min_on_period: minutes(3.0),
        min_off_period: minutes(3.0),
        validity: minutes(15.0),
        target_time: None,
        target_state_of_charge: None,
        storage: None,
    }
}

#[test]
fn registering_twice_is_rejected() {
    let registry = DeviceRegistry::new();
    register(&registry, "tank", DeviceKind::Buffer);
    let err = registry
        .dispatch(DeviceMessage::Register {
            kind: DeviceKind::Buffer,
            registration: Registration {
                resource_id: ResourceId::from("tank"),
                actuator_id: ActuatorId(0),
                label: "again".to_string(),
                supported_commodities: BTreeSet::new(),
            },
        })
        .unwrap_err();
    assert!(matches!(err, AgentError::AlreadyRegistered(_)));
}

#[test]
fn state_update_before_description_is_ignored() {
    let registry = DeviceRegistry::new();
    register(&registry, "tank", DeviceKind::Buffer);
    let outcome = registry.dispatch(update("tank", 1, Some(50.0))).unwrap();
    assert_eq!(outcome, Dispatched::StateUpdate(UpdateOutcome::Ignored));
}

#[test]
fn devices_are_independent() {
    let registry = DeviceRegistry::new();
    register(&registry, "tank-a", DeviceKind::Buffer);
    register(&registry, "tank-b", DeviceKind::Buffer);
    registry.dispatch(tank_description("tank-a")).unwrap();
    registry.dispatch(update("tank-a", 1, Some(50.0))).unwrap();

    let a = registry.device(&ResourceId::from("tank-a")).unwrap();
    let b = registry.device(&ResourceId::from("tank-b")).unwrap();
    assert_eq!(a.reachable_mode_ids(t0()).len(), 2);
    assert!(b.reachable_mode_ids(t0()).is_empty());
    assert!(b.possible_demands(t0(), None).unwrap().is_empty());
}

#[test]
fn wrong_description_family_is_a_kind_mismatch() {
    let registry = DeviceRegistry::new();
    register(&registry, "washer", DeviceKind::Unconstrained);
    let err = registry.dispatch(tank_description("washer")).unwrap_err();
    assert!(matches!(
        err,
        AgentError::KindMismatch {
            expected: DeviceKind::Buffer,
            found: DeviceKind::Unconstrained,
            ..
        }
    ));
}

#[test]
fn deregistered_device_is_gone() {
    let registry = DeviceRegistry::new();
    register(&registry, "tank", DeviceKind::Buffer);
    registry
        .dispatch(DeviceMessage::Deregister(ResourceId::from("tank")))
        .unwrap();
    assert!(registry.is_empty());
    let err = registry.dispatch(update("tank", 1, None)).unwrap_err();
    assert!(matches!(err, AgentError::UnknownResource(_)));
}

#[test]
fn control_space_needs_a_fill_level() {
    let registry = DeviceRegistry::new();
    register(&registry, "tank", DeviceKind::Buffer);
    let id = ResourceId::from("tank");

    let err = registry.control_space(&id, &config(), t0()).unwrap_err();
    assert!(matches!(err, AgentError::Efi(EfiError::NotYetKnown { .. })));

    registry.dispatch(tank_description("tank")).unwrap();
    registry.dispatch(update("tank", 1, Some(25.0))).unwrap();
    let space = registry.control_space(&id, &config(), t0()).unwrap();
    assert_eq!(space.buffer().state_of_charge(), 0.25);
    assert!(space.buffer().is_valid_at(t0() + TimeDelta::minutes(14)));
    assert!(space.storage().is_none());
}

#[test]
fn storage_config_yields_storage_space() {
    let registry = DeviceRegistry::new();
    register(&registry, "battery", DeviceKind::Buffer);
    registry.dispatch(tank_description("battery")).unwrap();
    registry.dispatch(update("battery", 1, Some(80.0))).unwrap();

    let mut storage = config();
    storage.storage = Some(StorageConfig {
        discharge_speed: PowerConstraintList::from_powers([watts(1_200.0)]).unwrap(),
        charge_efficiency: 0.9,
        discharge_efficiency: 1.5,
    });
    let id = ResourceId::from("battery");
    let err = registry.control_space(&id, &storage, t0()).unwrap_err();
    assert!(matches!(err, AgentError::ControlSpace(_)));

    if let Some(s) = storage.storage.as_mut() {
        s.discharge_efficiency = 0.9;
    }
    let space = registry.control_space(&id, &storage, t0()).unwrap();
    let ControlSpace::Storage(space) = space else {
        panic!("expected a storage control space");
    };
    assert_eq!(space.buffer().state_of_charge(), 0.8);
}

#[test]
fn concurrent_devices_apply_messages_in_parallel() {
    let registry = DeviceRegistry::new();
    let ids: Vec<String> = (0..8).map(|i| format!("tank-{i}")).collect();
    for id in &ids {
        register(&registry, id, DeviceKind::Buffer);
    }
    std::thread::scope(|scope| {
        for id in &ids {
            let registry = &registry;
            scope.spawn(move || {
                registry.dispatch(tank_description(id)).unwrap();
                for level in 0..20 {
                    registry
                        .dispatch(update(id, 1 + level % 2, Some(f64::from(level))))
                        .unwrap();
                }
            });
        }
    });
    for id in &ids {
        let device = registry.device(&ResourceId::from(id.as_str())).unwrap();
        assert_eq!(device.as_buffer().unwrap().fill_level(), Some(19.0));
        assert_eq!(device.as_buffer().unwrap().current_mode_id(), Some(ModeId(2)));
    }
}

#[test]
fn demands_never_mix_two_descriptions() {
    let registry = DeviceRegistry::new();
    register(&registry, "tank", DeviceKind::Buffer);
    registry.dispatch(tank_description("tank")).unwrap();
    registry.dispatch(update("tank", 1, Some(40.0))).unwrap();
    let device = registry.device(&ResourceId::from("tank")).unwrap();

    let two_modes = vec![watts(1_200.0), watts(1_200.0)];
    let one_mode = vec![watts(500.0)];
    std::thread::scope(|scope| {
        let registry = &registry;
        scope.spawn(move || {
            for round in 0..200 {
                let message = if round % 2 == 0 {
                    single_mode_description("tank", 500.0)
                } else {
                    tank_description("tank")
                };
                registry.dispatch(message).unwrap();
            }
        });
        for _ in 0..200 {
            let demands = device.possible_demands(t0(), None).unwrap();
            assert!(
                demands == two_modes || demands == one_mode,
                "unexpected demands {demands:?}"
            );
        }
    });
}

proptest! {
    #[test]
    fn one_demand_per_reachable_mode(level in -50.0f64..150.0, mode in 1u32..=2) {
        let registry = DeviceRegistry::new();
        register(&registry, "tank", DeviceKind::Buffer);
        registry.dispatch(tank_description("tank")).unwrap();
        registry.dispatch(update("tank", mode, Some(50.0))).unwrap();
        let device = registry.device(&ResourceId::from("tank")).unwrap();

        let demands = device.possible_demands(t0(), Some(level)).unwrap();
        prop_assert_eq!(demands.len(), device.reachable_mode_ids(t0()).len());
        prop_assert!(demands.iter().all(|d| *d == watts(1_200.0)));
    }
}
