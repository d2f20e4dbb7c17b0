//! Waypoint-following motion for kinematic platforms.
//!
//! A [`PlatformController`] moves a kinematic body between the positions of a
//! [`WaypointSet`] on a fixed timestep, choosing legs with a [`CycleState`]
//! and shaping motion along each leg with linear or eased interpolation. On
//! contact it corrects the velocity of riding bodies so they move with the
//! platform instead of sliding off.
//!
//! The crate is engine-agnostic: hosts plug in through [`SceneHost`],
//! [`KinematicBody`], and [`RiderBody`].

mod controller;
mod cycle;
mod error;
mod motion;
mod rider;
mod settings;
mod waypoints;

pub use controller::{KinematicBody, PlatformController};
pub use cycle::{CycleState, Direction, Transition};
pub use error::PlatformError;
pub use motion::{MotionSample, ease, evaluate, progress};
pub use rider::{RiderBody, RiderCorrection, apply as apply_correction, compute_correction};
pub use settings::{CyclePolicy, InterpolationMode, MotionSettings};
pub use waypoints::{EntityClass, SceneHost, WaypointSet};
