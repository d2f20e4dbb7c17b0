//! Platform and rider bodies: Rapier adapters, spawning, and the step system.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::prelude::*;
use shuttle_platform::{
    EntityClass, KinematicBody, MotionSettings, PlatformController, PlatformError, RiderBody,
    WaypointSet,
};

use crate::scene::{Classification, EcsScene, ScenePosition};
use crate::{FixedStep, PhysicsWorld, to_glam, to_rapier};

/// Stores a Rapier rigid body handle on an ECS entity.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyHandle(pub RigidBodyHandle);

/// A platform entity's waypoint controller.
#[derive(Component, Debug)]
pub struct MovingPlatform {
    /// Cycle state, motion sample, and waypoints.
    pub controller: PlatformController,
}

/// [`KinematicBody`] view of one Rapier body.
pub struct RapierKinematic<'a> {
    bodies: &'a mut RigidBodySet,
    handle: RigidBodyHandle,
}

impl<'a> RapierKinematic<'a> {
    /// Wraps the body `handle` in `bodies`.
    pub fn new(bodies: &'a mut RigidBodySet, handle: RigidBodyHandle) -> Self {
        Self { bodies, handle }
    }
}

impl KinematicBody for RapierKinematic<'_> {
    fn position(&self) -> Vec3 {
        self.bodies
            .get(self.handle)
            .map(|b| to_glam(&b.translation()))
            .unwrap_or(Vec3::ZERO)
    }

    fn move_kinematic_to(&mut self, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(self.handle) {
            body.set_next_kinematic_translation(to_rapier(position));
        }
    }

    fn teleport(&mut self, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(self.handle) {
            body.set_translation(to_rapier(position), true);
        }
    }
}

/// [`RiderBody`] view of a Rapier body touching a platform.
///
/// Only dynamic bodies expose a velocity; anything else reports `None`.
pub struct RapierRider<'a> {
    class: EntityClass,
    body: Option<&'a mut RigidBody>,
}

impl<'a> RapierRider<'a> {
    /// Wraps `body` (if it still exists) with its host classification.
    pub fn new(class: EntityClass, body: Option<&'a mut RigidBody>) -> Self {
        Self { class, body }
    }
}

impl RiderBody for RapierRider<'_> {
    fn class(&self) -> EntityClass {
        self.class
    }

    fn linear_velocity(&self) -> Option<Vec3> {
        self.body
            .as_deref()
            .filter(|b| b.is_dynamic())
            .map(|b| to_glam(&b.linvel()))
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        if let Some(body) = self.body.as_deref_mut() {
            body.set_linvel(to_rapier(velocity), true);
        }
    }
}

/// Turns `owner` into a moving platform.
///
/// Collects the owner's waypoint children (detaching them), creates a
/// kinematic position-based body with a cuboid collider at the owner's
/// [`ScenePosition`], and inserts [`MovingPlatform`] and [`BodyHandle`].
/// Requires a [`PhysicsWorld`] resource.
pub fn spawn_platform(
    world: &mut World,
    owner: Entity,
    settings: MotionSettings,
    half_extents: Vec3,
) -> Result<RigidBodyHandle, PlatformError> {
    let class = world
        .get::<Classification>(owner)
        .map(|c| c.0)
        .unwrap_or_default();
    let waypoints = WaypointSet::collect(&mut EcsScene::new(world), owner);
    let start = world
        .get::<ScenePosition>(owner)
        .map(|p| p.0)
        .or_else(|| waypoints.get(0))
        .unwrap_or(Vec3::ZERO);

    let controller = PlatformController::new(waypoints, settings, class)?;

    let handle = {
        let mut physics = world.resource_mut::<PhysicsWorld>();
        let physics = &mut *physics;
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(to_rapier(start))
            .build();
        let handle = physics.rigid_body_set.insert(body);
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
        physics
            .collider_set
            .insert_with_parent(collider, handle, &mut physics.rigid_body_set);
        handle
    };

    world.entity_mut(owner).insert((
        MovingPlatform { controller },
        BodyHandle(handle),
        ScenePosition(start),
    ));

    tracing::debug!(?owner, ?start, "Spawned moving platform");
    Ok(handle)
}

/// Gives `entity` a dynamic cuboid body so it can ride platforms.
pub fn spawn_rider(
    world: &mut World,
    entity: Entity,
    class: EntityClass,
    position: Vec3,
    half_extents: Vec3,
) -> RigidBodyHandle {
    let handle = {
        let mut physics = world.resource_mut::<PhysicsWorld>();
        let physics = &mut *physics;
        let body = RigidBodyBuilder::dynamic()
            .translation(to_rapier(position))
            .lock_rotations()
            .build();
        let handle = physics.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .friction(0.0)
            .build();
        physics
            .collider_set
            .insert_with_parent(collider, handle, &mut physics.rigid_body_set);
        handle
    };

    world.entity_mut(entity).insert((
        Classification(class),
        BodyHandle(handle),
        ScenePosition(position),
    ));
    handle
}

/// Runs **before** the physics step. Advances every platform's cycle and
/// sets its next kinematic target.
pub fn platform_step_system(
    step: Res<FixedStep>,
    mut physics: ResMut<PhysicsWorld>,
    mut platforms: Query<(Entity, &mut MovingPlatform, &BodyHandle)>,
) {
    let physics = &mut *physics;
    for (entity, mut platform, handle) in platforms.iter_mut() {
        let mut body = RapierKinematic::new(&mut physics.rigid_body_set, handle.0);
        if let Some(transition) = platform.controller.on_fixed_step(step.dt, &mut body) {
            tracing::trace!(?entity, ?transition, "Platform leg changed");
        }
    }
}

/// Runs **after** the physics step. Copies body translations back into
/// [`ScenePosition`].
pub fn sync_scene_positions_system(
    physics: Res<PhysicsWorld>,
    mut query: Query<(&mut ScenePosition, &BodyHandle)>,
) {
    for (mut position, handle) in query.iter_mut() {
        if let Some(body) = physics.rigid_body_set.get(handle.0) {
            position.0 = to_glam(&body.translation());
        }
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
