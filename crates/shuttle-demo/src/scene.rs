//! Demo scene: one platform with waypoint children and one rider on top.

use bevy_ecs::prelude::*;
use glam::Vec3;
use shuttle_config::Config;
use shuttle_physics::{
    Classification, DebugLineBuffer, MovingPlatform, ScenePosition, WaypointGizmos, add_child,
    spawn_platform, spawn_rider,
};
use shuttle_platform::{EntityClass, PlatformError};
use tracing::info;

/// Entities the demo reports on.
pub struct DemoScene {
    platform: Entity,
    rider: Entity,
}

/// Spawns the platform, its waypoints and the rider described by `config`.
pub fn build(world: &mut World, config: &Config) -> Result<DemoScene, PlatformError> {
    let waypoints: Vec<Vec3> = config
        .simulation
        .waypoints
        .iter()
        .copied()
        .map(Vec3::from_array)
        .collect();
    let start = waypoints.first().copied().unwrap_or(Vec3::ZERO);

    let platform = world
        .spawn((Classification(EntityClass::Other), ScenePosition(start)))
        .id();
    for position in &waypoints {
        let waypoint = world
            .spawn((Classification(EntityClass::Waypoint), ScenePosition(*position)))
            .id();
        add_child(world, platform, waypoint);
    }

    let platform_half = Vec3::from_array(config.simulation.platform_half_extents);
    spawn_platform(world, platform, config.platform, platform_half)?;

    let rider_half = Vec3::from_array(config.riders.half_extents);
    let rider = world.spawn_empty().id();
    spawn_rider(
        world,
        rider,
        EntityClass::Player,
        start + Vec3::Y * (platform_half.y + rider_half.y),
        rider_half,
    );

    world.resource_mut::<WaypointGizmos>().enabled = config.debug.show_waypoints;

    Ok(DemoScene { platform, rider })
}

impl DemoScene {
    /// Logs platform and rider positions after `step`.
    pub fn report(&self, world: &World, step: u32) {
        let position = |entity| {
            world
                .get::<ScenePosition>(entity)
                .map(|p| p.0)
                .unwrap_or(Vec3::ZERO)
        };
        let platform = position(self.platform);
        let rider = position(self.rider);
        let (leg, finished) = world
            .get::<MovingPlatform>(self.platform)
            .map(|p| {
                let state = p.controller.state();
                (
                    (state.previous_index(), state.current_index()),
                    p.controller.is_finished(),
                )
            })
            .unwrap_or(((0, 0), false));

        info!(
            step,
            ?leg,
            finished,
            "platform=({:.2}, {:.2}, {:.2}) rider=({:.2}, {:.2}, {:.2}) offset=({:.2}, {:.2})",
            platform.x,
            platform.y,
            platform.z,
            rider.x,
            rider.y,
            rider.z,
            rider.x - platform.x,
            rider.z - platform.z,
        );
        let lines = world.resource::<DebugLineBuffer>().lines.len();
        if lines > 0 {
            tracing::debug!(lines, "Waypoint gizmo lines this step");
        }
    }
}
