//! World factory and the fixed-step schedule.

use bevy_ecs::prelude::*;

use crate::contact::{ConflictPolicy, RiderCorrections, apply_rider_corrections, rider_contact_system};
use crate::gizmos::{DebugLineBuffer, WaypointGizmos, waypoint_gizmo_system};
use crate::platform::{platform_step_system, sync_scene_positions_system};
use crate::{FixedStep, PhysicsWorld, physics_step_system};

/// Creates a world with every resource the platform systems need, stepping
/// `dt` seconds per tick.
pub fn create_world(dt: f32, policy: ConflictPolicy) -> World {
    let mut world = World::new();
    world.insert_resource(FixedStep { dt });
    world.insert_resource(PhysicsWorld::with_timestep(dt));
    world.insert_resource(RiderCorrections::new(policy));
    world.insert_resource(WaypointGizmos::default());
    world.insert_resource(DebugLineBuffer::default());
    world
}

/// One fixed simulation tick, in order: move platforms, step physics,
/// gather rider contacts, apply corrections, mirror positions, draw gizmos.
///
/// Corrections are applied after the physics pass and so take effect on
/// the next integration.
pub fn fixed_step_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            platform_step_system,
            physics_step_system,
            rider_contact_system,
            apply_rider_corrections,
            sync_scene_positions_system,
            waypoint_gizmo_system,
        )
            .chain(),
    );
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_world_has_all_resources() {
        let world = create_world(0.02, ConflictPolicy::Sum);
        assert!(world.contains_resource::<FixedStep>());
        assert!(world.contains_resource::<PhysicsWorld>());
        assert!(world.contains_resource::<RiderCorrections>());
        assert!(world.contains_resource::<WaypointGizmos>());
        assert!(world.contains_resource::<DebugLineBuffer>());
        assert_eq!(world.resource::<FixedStep>().dt, 0.02);
        assert_eq!(
            world.resource::<RiderCorrections>().policy,
            ConflictPolicy::Sum
        );
    }

    #[test]
    fn test_empty_world_runs_schedule() {
        let mut world = create_world(0.02, ConflictPolicy::Strongest);
        let mut schedule = fixed_step_schedule();
        for _ in 0..10 {
            schedule.run(&mut world);
        }
        assert!(world.resource::<RiderCorrections>().is_empty());
    }
}
