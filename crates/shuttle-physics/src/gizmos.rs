//! Waypoint gizmos: wireframe markers at every platform waypoint.
//!
//! Read-only on platform state; the line buffer is consumed by whatever
//! debug renderer the host provides.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::platform::MovingPlatform;

/// Segments per great circle of a marker sphere.
const SPHERE_SEGMENTS: usize = 16;

/// Toggle and style for waypoint markers.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct WaypointGizmos {
    /// Master toggle.
    pub enabled: bool,
    /// Marker sphere radius in meters.
    pub radius: f32,
    /// RGBA marker color.
    pub color: [f32; 4],
}

impl Default for WaypointGizmos {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 0.7,
            color: [0.0, 1.0, 1.0, 1.0],
        }
    }
}

impl WaypointGizmos {
    /// Toggle the master `enabled` flag.
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}

/// A single debug line segment with color.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugLine {
    /// Start point in world space.
    pub start: [f32; 3],
    /// End point in world space.
    pub end: [f32; 3],
    /// RGBA color.
    pub color: [f32; 4],
}

/// Buffer of debug line segments to be drawn this frame.
#[derive(Resource, Clone, Debug, Default)]
pub struct DebugLineBuffer {
    /// Line segments accumulated during the current frame.
    pub lines: Vec<DebugLine>,
}

impl DebugLineBuffer {
    /// Push a line segment.
    pub fn push_line(&mut self, start: Vec3, end: Vec3, color: [f32; 4]) {
        self.lines.push(DebugLine {
            start: start.to_array(),
            end: end.to_array(),
            color,
        });
    }

    /// Clear all lines (call at start of each frame).
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Emit a sphere wireframe as 3 great circles.
fn emit_sphere_wireframe(lines: &mut DebugLineBuffer, center: Vec3, radius: f32, color: [f32; 4]) {
    for plane in 0..3 {
        let mut prev = None;
        for i in 0..=SPHERE_SEGMENTS {
            let angle = (i as f32 / SPHERE_SEGMENTS as f32) * std::f32::consts::TAU;
            let (s, c) = angle.sin_cos();
            let local = match plane {
                0 => Vec3::new(c * radius, s * radius, 0.0),
                1 => Vec3::new(c * radius, 0.0, s * radius),
                _ => Vec3::new(0.0, c * radius, s * radius),
            };
            let point = center + local;
            if let Some(p) = prev {
                lines.push_line(p, point, color);
            }
            prev = Some(point);
        }
    }
}

/// Draw a marker sphere at every waypoint of every platform.
pub fn waypoint_gizmo_system(
    gizmos: Res<WaypointGizmos>,
    platforms: Query<&MovingPlatform>,
    mut lines: ResMut<DebugLineBuffer>,
) {
    if !gizmos.enabled {
        return;
    }
    for platform in platforms.iter() {
        for waypoint in platform.controller.waypoints().iter() {
            emit_sphere_wireframe(&mut lines, waypoint, gizmos.radius, gizmos.color);
        }
    }
}
