use ion_ecs::{EntityId, Scheduler, SchedulerStats, World};
use ion_flight::{
    Camera, CameraSystem, FlightControl, FlightControlSystem, ScriptedFlight, ScriptedFlightSystem, ThrusterSystem,
    Thrusters,
};
use ion_input::{Action, ActionService, BindingConfig, Hal, HalProducer};
use ion_math::{Transform, Vec3};
use ion_physics::{Collider, Physics, PhysicsStats, PhysicsSystem};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::component::{Metadata, Renderable};
use crate::config::EngineConfig;
use crate::descriptor::EntityDescriptor;
use crate::error::{EngineError, EngineResult};
use crate::render::{build_render_snapshot, LodSystem, RenderSnapshot, SceneMaintenanceSystem};
use crate::stats::EngineStats;

/// Installs a `tracing_subscriber` fmt layer driven by `RUST_LOG` (default
/// `info`), the same pattern `storm-core` uses at process start. Safe to
/// call more than once per process — later calls are ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}

/// The engine's entry point: owns the ECS world, the system scheduler, the
/// input HAL and action resolver, and drives the process lifecycle
/// (`init` happens in `Engine::new`, `frame` is `Engine::tick`, `shutdown`
/// is `Engine::shutdown`).
pub struct Engine {
    world: World,
    scheduler: Scheduler,
    hal: Hal,
    action_service: ActionService,
    config: EngineConfig,
    physics_stats: std::rc::Rc<std::cell::RefCell<PhysicsStats>>,
    player_entity: Option<EntityId>,
}

impl Engine {
    pub fn new(config: EngineConfig, bindings: BindingConfig) -> EngineResult<Self> {
        let mut world = World::new(config.max_entities);
        let hal = Hal::new(config.hal_capacity);
        let action_service = ActionService::new(bindings);

        // Registering every component type's presence bit up front keeps
        // the bit assignment stable across a descriptor batch that might
        // otherwise register them in a different order depending on which
        // entities happen to use which components first.
        let _ = world.component_bit::<Transform>();
        let _ = world.component_bit::<Physics>();
        let _ = world.component_bit::<Collider>();
        let _ = world.component_bit::<Thrusters>();
        let _ = world.component_bit::<FlightControl>();
        let _ = world.component_bit::<ScriptedFlight>();
        let _ = world.component_bit::<Camera>();
        let _ = world.component_bit::<Renderable>();
        let _ = world.component_bit::<Metadata>();

        let physics_system = PhysicsSystem::new(config.max_linear_speed, config.max_angular_speed);
        let physics_stats = physics_system.stats_handle();

        let mut scheduler = Scheduler::new();
        // Declared order: Control, ScriptedFlight, Thrusters, Physics,
        // Camera, LOD, scene maintenance. Input resolution happens in
        // `Engine::tick` before this runs, since the HAL and action
        // service live on `Engine`, not inside `World`.
        scheduler.add_system_at(FlightControlSystem, config.control_frequency_hz);
        scheduler.add_system_at(ScriptedFlightSystem, config.scripted_flight_frequency_hz);
        scheduler.add_system_at(ThrusterSystem, config.thrusters_frequency_hz);
        scheduler.add_system_at(physics_system, config.physics_frequency_hz);
        scheduler.add_system_at(CameraSystem, config.camera_frequency_hz);
        scheduler.add_system_at(LodSystem::default(), config.lod_frequency_hz);
        scheduler.add_system_at(SceneMaintenanceSystem, config.scene_maintenance_frequency_hz);

        info!(max_entities = config.max_entities, "engine initialized");

        Ok(Self {
            world,
            scheduler,
            hal,
            action_service,
            config,
            physics_stats,
            player_entity: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn action_service_mut(&mut self) -> &mut ActionService {
        &mut self.action_service
    }

    /// A cloneable handle a capture thread can push [`ion_input::DeviceEvent`]s
    /// into, independent of the engine instance itself.
    pub fn hal_producer(&self) -> HalProducer {
        self.hal.producer()
    }

    /// Designates which entity's `FlightControl::linear_input`/`angular_input`
    /// are driven from resolved action values each tick. Only one entity can
    /// be player-controlled at a time; scripted and AI-piloted craft are
    /// driven by their own systems instead.
    pub fn set_player_entity(&mut self, id: EntityId) {
        self.player_entity = Some(id);
    }

    pub fn spawn(&mut self, descriptor: &EntityDescriptor) -> EngineResult<EntityId> {
        if descriptor.name.is_empty() {
            return Err(EngineError::InvalidDescriptor {
                name: descriptor.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }
        let id = self.world.create_entity()?;
        self.world.add_component(id, descriptor.to_metadata())?;
        self.world
            .add_component(id, descriptor.transform.unwrap_or_default())?;

        if let Some(preset) = descriptor.preset {
            let loadout = preset.loadout();
            self.world.add_component(id, loadout.physics)?;
            self.world.add_component(id, loadout.thrusters)?;
            self.world.add_component(id, loadout.flight_control)?;
            self.world.add_component(id, Collider::sphere(loadout.collider_radius))?;
        }
        if let Some(physics) = descriptor.physics {
            self.world.add_component(id, physics)?;
        }
        if let Some(collider) = descriptor.collider {
            self.world.add_component(id, collider)?;
        }
        if let Some(thrusters) = descriptor.thrusters {
            self.world.add_component(id, thrusters)?;
        }
        if let Some(flight_control) = descriptor.flight_control {
            self.world.add_component(id, flight_control)?;
        }
        if let Some(scripted_flight) = descriptor.scripted_flight.clone() {
            self.world.add_component(id, scripted_flight)?;
        }
        if let Some(camera) = descriptor.camera {
            self.world.add_component(id, camera)?;
        }
        if let Some(renderable) = descriptor.renderable.clone() {
            self.world.add_component(id, renderable)?;
        }
        Ok(id)
    }

    pub fn destroy(&mut self, id: EntityId) -> EngineResult<()> {
        self.world.destroy_entity(id).map_err(EngineError::from)
    }

    fn apply_player_input(&mut self) {
        let Some(player) = self.player_entity else { return };
        if !self.world.is_alive(player) {
            self.player_entity = None;
            return;
        }
        let linear_input = Vec3::new(
            self.action_service.get_action_value(Action::Strafe),
            self.action_service.get_action_value(Action::Vertical),
            self.action_service.get_action_value(Action::Thrust),
        );
        let angular_input = Vec3::new(
            self.action_service.get_action_value(Action::Pitch),
            self.action_service.get_action_value(Action::Yaw),
            self.action_service.get_action_value(Action::Roll),
        );
        if let Some(control) = self.world.get_component_mut::<FlightControl>(player) {
            control.linear_input = linear_input;
            control.angular_input = angular_input;
        }
    }

    /// Advances the simulation by `dt` seconds: drains the HAL, resolves
    /// actions, feeds the player-controlled craft's `FlightControl`, runs
    /// every scheduled system, and returns the tick's stats snapshot.
    pub fn tick(&mut self, dt: f32) -> EngineStats {
        let events = self.hal.poll();
        self.action_service.process_events(&events);
        self.apply_player_input();

        self.scheduler.run_tick(&mut self.world, dt);

        EngineStats {
            scheduler: self.scheduler.stats(),
            physics: *self.physics_stats.borrow(),
            hal: self.hal.stats(),
            entity_count: self.world.entity_count(),
        }
    }

    pub fn render_snapshot(&mut self) -> RenderSnapshot {
        build_render_snapshot(&mut self.world)
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub fn shutdown(self) {
        info!(entity_count = self.world.entity_count(), "engine shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ion_flight::FlightMode;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default(), BindingConfig::default()).unwrap()
    }

    #[test]
    fn spawn_rejects_empty_name() {
        let mut e = engine();
        let descriptor = EntityDescriptor::default();
        assert!(e.spawn(&descriptor).is_err());
    }

    #[test]
    fn spawn_with_preset_adds_expected_components() {
        let mut e = engine();
        let descriptor = EntityDescriptor::named("racer").with_preset(ion_flight::ShipPreset::Racer);
        let id = e.spawn(&descriptor).unwrap();
        assert!(e.world().has_component::<Physics>(id));
        assert!(e.world().has_component::<Thrusters>(id));
        assert!(e.world().has_component::<FlightControl>(id));
        assert_eq!(
            e.world().get_component::<FlightControl>(id).unwrap().mode(),
            FlightMode::Manual
        );
    }

    #[test]
    fn tick_advances_physics_for_player_entity() {
        let mut e = engine();
        let id = e
            .spawn(&EntityDescriptor::named("racer").with_preset(ion_flight::ShipPreset::Racer))
            .unwrap();
        e.set_player_entity(id);
        e.world_mut().get_component_mut::<FlightControl>(id).unwrap().linear_input = Vec3::new(0.0, 0.0, 1.0);

        for _ in 0..10 {
            e.tick(1.0 / 60.0);
        }
        let transform = e.world().get_component::<Transform>(id).unwrap();
        assert!(transform.position.length() > 0.0);
    }

    #[test]
    fn destroyed_entity_is_excluded_from_next_spawn_reuse_check() {
        let mut e = engine();
        let id = e.spawn(&EntityDescriptor::named("debris")).unwrap();
        e.destroy(id).unwrap();
        assert!(!e.world().is_alive(id));
    }
}
