//! The platform controller: a passive, step-driven waypoint follower.
//!
//! The host calls [`PlatformController::on_fixed_step`] once per physics tick
//! and [`PlatformController::on_contact_persist`] for every tick a body stays
//! in contact with the platform. The controller owns no thread and never
//! writes the body's transform directly except for the StartToEnd restart.

use glam::Vec3;

use crate::cycle::{CycleState, Transition};
use crate::error::PlatformError;
use crate::motion::{self, MotionSample};
use crate::rider::{self, RiderBody, RiderCorrection};
use crate::settings::MotionSettings;
use crate::waypoints::{EntityClass, WaypointSet};

/// The body a controller moves.
pub trait KinematicBody {
    /// Current world-space position.
    fn position(&self) -> Vec3;

    /// Moves the body through the physics engine so contacts and sweeps
    /// are generated along the way.
    fn move_kinematic_to(&mut self, position: Vec3);

    /// Places the body at `position` instantly, without a sweep.
    fn teleport(&mut self, position: Vec3);
}

/// Moves a kinematic body along a [`WaypointSet`] and pushes riders.
#[derive(Debug, Clone)]
pub struct PlatformController {
    waypoints: WaypointSet,
    settings: MotionSettings,
    state: CycleState,
    sample: MotionSample,
    drives_body: bool,
}

impl PlatformController {
    /// Builds a controller for a platform whose owner entity is `owner_class`.
    ///
    /// An owner classified as [`EntityClass::Agent`] is not a platform: the
    /// controller still cycles its waypoints but never moves the body.
    pub fn new(
        waypoints: WaypointSet,
        settings: MotionSettings,
        owner_class: EntityClass,
    ) -> Result<Self, PlatformError> {
        settings.validate()?;

        let drives_body = owner_class != EntityClass::Agent;
        if !drives_body {
            tracing::warn!(
                "Moving platform controller attached to an agent; it will not move the body. \
                 Only use it on platforms"
            );
        }

        let state = CycleState::new(waypoints.len(), &settings);
        let sample = MotionSample::at_rest(waypoints.get(0).unwrap_or(Vec3::ZERO));

        Ok(Self {
            waypoints,
            settings,
            state,
            sample,
            drives_body,
        })
    }

    /// Advances the cycle by `dt` seconds and moves `body` to its new
    /// position on the active leg.
    ///
    /// Does nothing once a PlayOnce cycle has finished or when there are no
    /// waypoints. Returns the cycle transition that happened this step.
    pub fn on_fixed_step<B: KinematicBody + ?Sized>(
        &mut self,
        dt: f32,
        body: &mut B,
    ) -> Option<Transition> {
        if self.is_inert() {
            return None;
        }

        let transition = self.state.tick(f64::from(dt));

        if transition == Some(Transition::Restarted)
            && self.drives_body
            && let Some(first) = self.waypoints.get(0)
        {
            body.teleport(first);
        }

        if !self.drives_body {
            return transition;
        }

        let Some(target) = motion::evaluate(
            &self.waypoints,
            &self.state,
            self.state.timer(),
            self.settings.interpolation,
        ) else {
            return transition;
        };

        let before = body.position();
        body.move_kinematic_to(target);
        self.sample.record(before, target);

        transition
    }

    /// Handles one tick of sustained contact with `rider`.
    ///
    /// Non-rider bodies are ignored. For riders, the velocity correction is
    /// added to the rider's current velocity and returned.
    pub fn on_contact_persist<B, R>(
        &self,
        dt: f32,
        body: &B,
        rider: &mut R,
    ) -> Result<Option<RiderCorrection>, PlatformError>
    where
        B: KinematicBody + ?Sized,
        R: RiderBody + ?Sized,
    {
        if !rider.class().is_rider() {
            return Ok(None);
        }
        let Some(correction) = self.rider_correction(dt, body.position()) else {
            return Ok(None);
        };
        rider::apply(rider, correction.delta_velocity)?;
        Ok(Some(correction))
    }

    /// Correction a rider touching this platform should receive this tick,
    /// given the platform's actual `position`.
    ///
    /// Does not touch any rider, so hosts can combine corrections from
    /// several platforms before applying them.
    pub fn rider_correction(&self, dt: f32, position: Vec3) -> Option<RiderCorrection> {
        if !self.drives_body {
            return None;
        }
        let predicted = self.predicted_position(dt)?;
        let velocity = self.sample.velocity(dt);
        let correction = rider::compute_correction(predicted, position, velocity, dt);

        if correction.is_large(self.settings.correction_warn_threshold) {
            tracing::warn!(
                timer = self.state.timer(),
                progress = motion::progress(
                    self.state.timer() + f64::from(dt),
                    self.state.leg_duration(),
                    self.settings.interpolation,
                ),
                predicted = ?predicted,
                position = ?position,
                velocity = ?velocity,
                last_step = ?self.sample.velocity_last_step,
                delta = ?correction.delta_velocity,
                from = ?self.waypoints.get(self.state.previous_index()),
                to = ?self.waypoints.get(self.state.current_index()),
                "Large rider velocity correction"
            );
        }

        Some(correction)
    }

    /// Position one step of `dt` ahead on the active leg, without
    /// committing anything.
    pub fn predicted_position(&self, dt: f32) -> Option<Vec3> {
        motion::evaluate(
            &self.waypoints,
            &self.state,
            self.state.timer() + f64::from(dt),
            self.settings.interpolation,
        )
    }

    fn is_inert(&self) -> bool {
        self.waypoints.is_empty() || self.state.is_finished()
    }

    /// Cycle state (active leg and timer).
    pub fn state(&self) -> &CycleState {
        &self.state
    }

    /// Last commanded position and velocity estimates.
    pub fn sample(&self) -> &MotionSample {
        &self.sample
    }

    /// The waypoints being followed.
    pub fn waypoints(&self) -> &WaypointSet {
        &self.waypoints
    }

    /// Settings the controller was built with.
    pub fn settings(&self) -> &MotionSettings {
        &self.settings
    }

    /// True once a PlayOnce cycle has ended.
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// False when the owner is an agent and the body is never moved.
    pub fn drives_body(&self) -> bool {
        self.drives_body
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
