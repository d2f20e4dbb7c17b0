//! Motion evaluation: leg progress, easing, and per-step velocity samples.

use glam::Vec3;

use crate::cycle::CycleState;
use crate::settings::InterpolationMode;
use crate::waypoints::WaypointSet;

/// Smoothstep ease-in/ease-out: `3t² − 2t³`.
///
/// Input is clamped to `[0, 1]`, so `ease(0) = 0`, `ease(1) = 1`, and the
/// slope is zero at both ends.
pub fn ease(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fraction of the leg covered after `timer` seconds, shaped by `mode`.
///
/// Holds at `1.0` for the whole inter-leg wait. A non-positive leg
/// duration means the leg is covered instantly.
pub fn progress(timer: f64, leg_duration: f64, mode: InterpolationMode) -> f32 {
    let raw = if leg_duration > 0.0 {
        (timer / leg_duration).clamp(0.0, 1.0) as f32
    } else {
        1.0
    };
    match mode {
        InterpolationMode::Linear => raw,
        InterpolationMode::Eased => ease(raw),
    }
}

/// Position on the active leg after `timer` seconds.
///
/// `timer` is passed separately from `state` so callers can look ahead
/// without mutating the state machine. Returns `None` when there is nothing
/// to move along: no waypoints, or a finished PlayOnce cycle.
///
/// A leg whose endpoints coincide yields that point exactly.
pub fn evaluate(
    waypoints: &WaypointSet,
    state: &CycleState,
    timer: f64,
    mode: InterpolationMode,
) -> Option<Vec3> {
    if state.is_finished() {
        return None;
    }
    let from = waypoints.get(state.previous_index())?;
    let to = waypoints.get(state.current_index())?;
    let t = progress(timer, state.leg_duration(), mode);
    Some(from + (to - from) * t)
}

/// Platform position and first-difference velocity estimates.
///
/// Velocities are displacements over one fixed step (meters per step);
/// divide by the step duration for meters per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    /// Last position commanded to the body.
    pub position: Vec3,
    /// Displacement over the most recent step.
    pub velocity_this_step: Vec3,
    /// Displacement over the step before that.
    pub velocity_last_step: Vec3,
}

impl MotionSample {
    /// Sample at rest at `position`.
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Records a move from `before` to `after`.
    pub fn record(&mut self, before: Vec3, after: Vec3) {
        self.velocity_last_step = self.velocity_this_step;
        self.velocity_this_step = after - before;
        self.position = after;
    }

    /// Most recent velocity estimate in m/s for a step of `dt` seconds.
    pub fn velocity(&self, dt: f32) -> Vec3 {
        if dt > 0.0 {
            self.velocity_this_step / dt
        } else {
            Vec3::ZERO
        }
    }
}
