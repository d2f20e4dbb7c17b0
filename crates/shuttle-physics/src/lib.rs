//! Rapier 3D and `bevy_ecs` integration for moving platforms.
//!
//! Wraps the Rapier physics engine behind a single [`PhysicsWorld`] resource,
//! drives [`shuttle_platform::PlatformController`]s from a fixed-step
//! schedule, and turns narrow-phase contacts into rider velocity corrections.

mod contact;
mod gizmos;
mod platform;
mod scene;
mod schedule;

use bevy_ecs::prelude::*;
use rapier3d::prelude::*;

pub use contact::{ConflictPolicy, RiderCorrections, apply_rider_corrections, rider_contact_system};
pub use gizmos::{DebugLine, DebugLineBuffer, WaypointGizmos, waypoint_gizmo_system};
pub use platform::{
    BodyHandle, MovingPlatform, RapierKinematic, RapierRider, platform_step_system,
    spawn_platform, spawn_rider, sync_scene_positions_system,
};
pub use scene::{Classification, EcsScene, SceneChildren, SceneParent, ScenePosition, add_child};
pub use schedule::{create_world, fixed_step_schedule};

/// Default fixed timestep in seconds.
pub const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;

/// Duration of one fixed simulation step, read once per tick.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    /// Seconds per step.
    pub dt: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self {
            dt: DEFAULT_FIXED_DT,
        }
    }
}

/// Central physics simulation resource owning all Rapier state.
///
/// Systems read via `Res<PhysicsWorld>` for contacts or mutate via
/// `ResMut<PhysicsWorld>` to move bodies.
#[derive(Resource)]
pub struct PhysicsWorld {
    /// World-space gravity vector.
    pub gravity: Vector,
    /// Timestep and solver configuration.
    pub integration_parameters: IntegrationParameters,
    /// The main simulation pipeline.
    pub physics_pipeline: PhysicsPipeline,
    /// Tracks sleeping/awake body islands.
    pub island_manager: IslandManager,
    /// Broad-phase collision detection.
    pub broad_phase: BroadPhaseBvh,
    /// Narrow-phase collision detection (contact manifolds).
    pub narrow_phase: NarrowPhase,
    /// All rigid bodies in the simulation.
    pub rigid_body_set: RigidBodySet,
    /// All colliders in the simulation.
    pub collider_set: ColliderSet,
    /// Impulse-based joints.
    pub impulse_joint_set: ImpulseJointSet,
    /// Multibody joints.
    pub multibody_joint_set: MultibodyJointSet,
    /// Continuous collision detection solver.
    pub ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Creates a physics world with gravity `(0, -9.81, 0)` stepping at
    /// [`DEFAULT_FIXED_DT`].
    pub fn new() -> Self {
        Self::with_timestep(DEFAULT_FIXED_DT)
    }

    /// Creates a physics world stepping `dt` seconds per call to [`step`](Self::step).
    pub fn with_timestep(dt: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt,
            ..Default::default()
        };

        Self {
            gravity: Vector::new(0.0, -9.81, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Timestep used by [`step`](Self::step), in seconds.
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// ECS system that steps the physics simulation once per invocation.
pub fn physics_step_system(mut physics: ResMut<PhysicsWorld>) {
    physics.step();
}

/// Converts a workspace `glam` vector into Rapier's vector type.
///
/// Rapier may link a different `glam` than the workspace, so conversion is
/// always component-wise.
pub(crate) fn to_rapier(v: glam::Vec3) -> Vector {
    Vector::new(v.x, v.y, v.z)
}

/// Converts a Rapier vector into the workspace `glam` vector.
pub(crate) fn to_glam(v: &Vector) -> glam::Vec3 {
    glam::Vec3::new(v.x, v.y, v.z)
}
