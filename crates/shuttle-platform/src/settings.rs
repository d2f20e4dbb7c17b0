//! Motion settings: cycle policy, interpolation mode, and leg timings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// Rule governing how the waypoint index advances after each leg completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Run through the waypoints once and stop at the last one.
    PlayOnce,
    /// Wrap from the last waypoint back to the first, forever.
    #[default]
    Loop,
    /// Bounce back and forth between the first and last waypoints.
    PingPong,
    /// Run to the last waypoint, then snap back to the first and start over.
    StartToEnd,
}

/// How leg progress maps to position along the leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Constant speed along the leg.
    #[default]
    Linear,
    /// Smooth start and stop (smoothstep).
    Eased,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

impl FromStr for CyclePolicy {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "play_once" | "playonce" | "once" => Ok(Self::PlayOnce),
            "loop" => Ok(Self::Loop),
            "ping_pong" | "pingpong" => Ok(Self::PingPong),
            "start_to_end" | "starttoend" => Ok(Self::StartToEnd),
            _ => Err(PlatformError::UnknownCyclePolicy(s.to_string())),
        }
    }
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlayOnce => "play_once",
            Self::Loop => "loop",
            Self::PingPong => "ping_pong",
            Self::StartToEnd => "start_to_end",
        };
        f.write_str(name)
    }
}

impl FromStr for InterpolationMode {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "linear" | "lerp" => Ok(Self::Linear),
            "eased" | "ease" => Ok(Self::Eased),
            _ => Err(PlatformError::UnknownInterpolation(s.to_string())),
        }
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linear => "linear",
            Self::Eased => "eased",
        })
    }
}

/// Per-platform motion configuration. Immutable once a controller is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Seconds to traverse one leg.
    pub leg_duration: f32,
    /// Seconds to wait at each waypoint after arriving.
    pub inter_leg_delay: f32,
    /// Fraction (0–1) of one cycle period to pre-advance the timer by.
    pub offset: f32,
    /// How the waypoint index advances.
    pub cycle_policy: CyclePolicy,
    /// How progress along a leg is shaped.
    pub interpolation: InterpolationMode,
    /// Rider corrections above this speed (m/s) are reported as diagnostics.
    pub correction_warn_threshold: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            leg_duration: 2.0,
            inter_leg_delay: 0.0,
            offset: 0.0,
            cycle_policy: CyclePolicy::Loop,
            interpolation: InterpolationMode::Linear,
            correction_warn_threshold: 1.0,
        }
    }
}

impl MotionSettings {
    /// Length of one full cycle step: travel plus wait.
    pub fn period(&self) -> f64 {
        f64::from(self.leg_duration) + f64::from(self.inter_leg_delay)
    }

    /// Checks every field is finite and within range.
    pub fn validate(&self) -> Result<(), PlatformError> {
        if !self.leg_duration.is_finite() || self.leg_duration <= 0.0 {
            return Err(PlatformError::InvalidSettings(format!(
                "leg_duration must be a positive number of seconds, got {}",
                self.leg_duration
            )));
        }
        if !self.inter_leg_delay.is_finite() || self.inter_leg_delay < 0.0 {
            return Err(PlatformError::InvalidSettings(format!(
                "inter_leg_delay must be zero or more seconds, got {}",
                self.inter_leg_delay
            )));
        }
        if !(0.0..=1.0).contains(&self.offset) {
            return Err(PlatformError::InvalidSettings(format!(
                "offset must lie in [0, 1], got {}",
                self.offset
            )));
        }
        if !self.correction_warn_threshold.is_finite() || self.correction_warn_threshold < 0.0 {
            return Err(PlatformError::InvalidSettings(format!(
                "correction_warn_threshold must be zero or more, got {}",
                self.correction_warn_threshold
            )));
        }
        Ok(())
    }
}
