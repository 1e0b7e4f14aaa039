use ion_ecs::{EntityId, System, World};
use ion_math::{Transform, Vec3};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CameraBehavior {
    /// Trails `target` at `distance` behind and `height` above its facing.
    /// `target` is a weak reference: if the entity it names has been
    /// destroyed, the camera simply holds its last transform rather than
    /// erroring.
    ThirdPerson {
        target: EntityId,
        distance: f32,
        height: f32,
    },
    /// Snaps to `target`'s transform exactly, as if mounted in its cockpit.
    FirstPerson { target: EntityId },
    /// Never moves itself; something else (a cutscene, a fixed security
    /// camera entity) owns its transform.
    Static,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub behavior: CameraBehavior,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            behavior: CameraBehavior::Static,
        }
    }
}

/// Updates every camera's transform from its behavior. Cameras referencing
/// a destroyed target are left exactly where they were — no panic, no
/// snapping to the origin — until the behavior is changed to point
/// somewhere live again.
#[derive(Default)]
pub struct CameraSystem;

impl System for CameraSystem {
    fn name(&self) -> &'static str {
        "camera"
    }

    fn tick(&mut self, world: &mut World, _dt: f32) {
        let camera_bit = world.component_bit::<Camera>().expect("camera bit");
        let transform_bit = world.component_bit::<Transform>().expect("transform bit");
        let ids = world.query(camera_bit | transform_bit);

        for id in ids {
            let behavior = world.get_component::<Camera>(id).expect("queried camera").behavior;
            let new_transform = match behavior {
                CameraBehavior::Static => None,
                CameraBehavior::FirstPerson { target } => {
                    if world.is_alive(target) {
                        world.get_component::<Transform>(target).copied()
                    } else {
                        trace!(entity = %id, target = %target, "first-person camera target is gone, holding last transform");
                        None
                    }
                }
                CameraBehavior::ThirdPerson { target, distance, height } => {
                    if world.is_alive(target) {
                        world.get_component::<Transform>(target).map(|t| {
                            let offset = -t.forward() * distance + Vec3::Y * height;
                            Transform {
                                position: t.position + offset,
                                rotation: t.rotation,
                                scale: Vec3::ONE,
                            }
                        })
                    } else {
                        trace!(entity = %id, target = %target, "third-person camera target is gone, holding last transform");
                        None
                    }
                }
            };
            if let Some(new_transform) = new_transform {
                *world.get_component_mut::<Transform>(id).expect("queried transform") = new_transform;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_person_camera_snaps_to_target() {
        let mut world = World::new(4);
        let target = world.create_entity().unwrap();
        world
            .add_component(target, Transform::from_position(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();

        let camera = world.create_entity().unwrap();
        world.add_component(camera, Transform::default()).unwrap();
        world
            .add_component(camera, Camera {
                behavior: CameraBehavior::FirstPerson { target },
            })
            .unwrap();

        let mut system = CameraSystem::default();
        system.tick(&mut world, 1.0 / 60.0);
        assert_eq!(
            world.get_component::<Transform>(camera).unwrap().position,
            Vec3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn third_person_camera_trails_behind_target() {
        let mut world = World::new(4);
        let target = world.create_entity().unwrap();
        world.add_component(target, Transform::default()).unwrap();

        let camera = world.create_entity().unwrap();
        world.add_component(camera, Transform::default()).unwrap();
        world
            .add_component(camera, Camera {
                behavior: CameraBehavior::ThirdPerson {
                    target,
                    distance: 10.0,
                    height: 2.0,
                },
            })
            .unwrap();

        let mut system = CameraSystem::default();
        system.tick(&mut world, 1.0 / 60.0);
        let cam_transform = world.get_component::<Transform>(camera).unwrap();
        assert!(cam_transform.position.z > 0.0, "camera should sit behind -Z-facing target");
        assert!((cam_transform.position.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn destroyed_target_leaves_camera_transform_untouched() {
        let mut world = World::new(4);
        let target = world.create_entity().unwrap();
        world.add_component(target, Transform::default()).unwrap();

        let camera = world.create_entity().unwrap();
        let original = Transform::from_position(Vec3::new(5.0, 5.0, 5.0));
        world.add_component(camera, original).unwrap();
        world
            .add_component(camera, Camera {
                behavior: CameraBehavior::FirstPerson { target },
            })
            .unwrap();

        world.destroy_entity(target).unwrap();

        let mut system = CameraSystem::default();
        system.tick(&mut world, 1.0 / 60.0);
        assert_eq!(world.get_component::<Transform>(camera).unwrap().position, original.position);
    }
}
