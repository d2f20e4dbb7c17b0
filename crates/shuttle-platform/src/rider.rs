//! Rider velocity transfer.
//!
//! A kinematically moved platform does not hand its velocity to bodies
//! resting on it. On every tick a rider stays in contact, the platform
//! predicts where it will be one step ahead and adds the difference between
//! that predicted velocity and its current velocity estimate to the rider.

use glam::Vec3;

use crate::error::PlatformError;
use crate::waypoints::EntityClass;

/// A body touching a platform whose velocity may be corrected.
pub trait RiderBody {
    /// Classification of the body; only riders are corrected.
    fn class(&self) -> EntityClass;

    /// Current linear velocity in m/s, or `None` if the body has none.
    fn linear_velocity(&self) -> Option<Vec3>;

    /// Overwrites the linear velocity.
    fn set_linear_velocity(&mut self, velocity: Vec3);
}

/// Velocity correction computed for one rider contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiderCorrection {
    /// Velocity to add to the rider, m/s. Vertical component is always zero.
    pub delta_velocity: Vec3,
    /// Platform position predicted one step ahead.
    pub predicted_position: Vec3,
    /// Platform velocity implied by the prediction, m/s.
    pub predicted_velocity: Vec3,
}

impl RiderCorrection {
    /// True when the correction exceeds `threshold` m/s.
    pub fn is_large(&self, threshold: f32) -> bool {
        self.delta_velocity.length_squared() > threshold * threshold
    }
}

/// Computes the correction for a platform at `position` moving at
/// `platform_velocity` m/s, which will be at `predicted` one step of `dt`
/// seconds from now.
///
/// Vertical motion is left to gravity and ground contact, so `y` is zeroed.
pub fn compute_correction(
    predicted: Vec3,
    position: Vec3,
    platform_velocity: Vec3,
    dt: f32,
) -> RiderCorrection {
    if dt <= 0.0 {
        return RiderCorrection {
            delta_velocity: Vec3::ZERO,
            predicted_position: predicted,
            predicted_velocity: Vec3::ZERO,
        };
    }
    let predicted_velocity = (predicted - position) / dt;
    let mut delta_velocity = predicted_velocity - platform_velocity;
    delta_velocity.y = 0.0;
    RiderCorrection {
        delta_velocity,
        predicted_position: predicted,
        predicted_velocity,
    }
}

/// Adds `delta` to the rider's velocity.
///
/// The rider must expose a velocity; a missing one means the contact was
/// misclassified and is reported as [`PlatformError::RiderWithoutVelocity`].
pub fn apply<R: RiderBody + ?Sized>(rider: &mut R, delta: Vec3) -> Result<Vec3, PlatformError> {
    let current = rider
        .linear_velocity()
        .ok_or(PlatformError::RiderWithoutVelocity)?;
    let updated = current + delta;
    rider.set_linear_velocity(updated);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRider {
        class: EntityClass,
        velocity: Option<Vec3>,
    }

    impl RiderBody for TestRider {
        fn class(&self) -> EntityClass {
            self.class
        }

        fn linear_velocity(&self) -> Option<Vec3> {
            self.velocity
        }

        fn set_linear_velocity(&mut self, velocity: Vec3) {
            self.velocity = Some(velocity);
        }
    }

    #[test]
    fn test_constant_velocity_from_rest_estimate() {
        let dt = 0.02;
        let position = Vec3::new(1.0, 0.0, 0.0);
        let predicted = position + Vec3::new(2.0, 0.0, 0.0) * dt;

        let c = compute_correction(predicted, position, Vec3::ZERO, dt);
        assert!((c.delta_velocity - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
        assert!((c.predicted_velocity - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_prior_estimate_is_subtracted() {
        let dt = 0.02;
        let velocity = Vec3::new(2.0, 0.0, 0.0);
        let c = compute_correction(velocity * dt, Vec3::ZERO, velocity, dt);
        assert!(c.delta_velocity.length() < 1e-4);
    }

    #[test]
    fn test_vertical_component_is_zeroed() {
        let dt = 0.02;
        let predicted = Vec3::new(0.04, 0.5, -0.02);
        let c = compute_correction(predicted, Vec3::ZERO, Vec3::ZERO, dt);
        assert_eq!(c.delta_velocity.y, 0.0);
        assert!((c.delta_velocity.x - 2.0).abs() < 1e-4);
        assert!((c.delta_velocity.z + 1.0).abs() < 1e-4);
        assert!(c.predicted_velocity.y > 0.0);
    }

    #[test]
    fn test_large_correction_threshold() {
        let c = compute_correction(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, Vec3::ZERO, 0.02);
        assert!(c.is_large(1.0));
        assert!(!c.is_large(100.0));
    }

    #[test]
    fn test_apply_is_additive() {
        let mut rider = TestRider {
            class: EntityClass::Player,
            velocity: Some(Vec3::new(1.0, -3.0, 0.0)),
        };
        let updated = apply(&mut rider, Vec3::new(2.0, 0.0, 0.5)).unwrap();
        assert_eq!(updated, Vec3::new(3.0, -3.0, 0.5));
        assert_eq!(rider.velocity, Some(updated));
    }

    #[test]
    fn test_apply_without_velocity_fails() {
        let mut rider = TestRider {
            class: EntityClass::Agent,
            velocity: None,
        };
        assert_eq!(
            apply(&mut rider, Vec3::X),
            Err(PlatformError::RiderWithoutVelocity)
        );
    }
}
