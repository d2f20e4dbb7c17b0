//! Command-line argument parsing for the platform simulation.

use std::path::PathBuf;

use clap::Parser;
use shuttle_platform::{CyclePolicy, InterpolationMode};

use crate::Config;

/// Shuttle command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "shuttle", about = "Waypoint-driven moving platform simulation")]
pub struct CliArgs {
    /// Seconds to traverse one leg.
    #[arg(long)]
    pub leg_duration: Option<f32>,

    /// Seconds to wait at each waypoint.
    #[arg(long)]
    pub delay: Option<f32>,

    /// Phase offset as a fraction of one cycle period (0-1).
    #[arg(long)]
    pub offset: Option<f32>,

    /// Cycle policy (play-once, loop, ping-pong, start-to-end).
    #[arg(long)]
    pub cycle: Option<CyclePolicy>,

    /// Interpolation mode (linear, eased).
    #[arg(long)]
    pub interpolation: Option<InterpolationMode>,

    /// Number of fixed steps to simulate.
    #[arg(long)]
    pub steps: Option<u32>,

    /// Seconds per fixed step.
    #[arg(long)]
    pub fixed_dt: Option<f32>,

    /// Draw waypoint gizmos.
    #[arg(long)]
    pub show_waypoints: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(leg) = args.leg_duration {
            self.platform.leg_duration = leg;
        }
        if let Some(delay) = args.delay {
            self.platform.inter_leg_delay = delay;
        }
        if let Some(offset) = args.offset {
            self.platform.offset = offset;
        }
        if let Some(policy) = args.cycle {
            self.platform.cycle_policy = policy;
        }
        if let Some(mode) = args.interpolation {
            self.platform.interpolation = mode;
        }
        if let Some(steps) = args.steps {
            self.simulation.steps = steps;
        }
        if let Some(dt) = args.fixed_dt {
            self.simulation.fixed_dt = dt;
        }
        if let Some(show) = args.show_waypoints {
            self.debug.show_waypoints = show;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
