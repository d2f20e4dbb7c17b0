//! Headless moving-platform demo.
//!
//! Builds one platform following the configured waypoints with a rider
//! standing on it, runs the fixed-step schedule and reports positions.
//!
//! Run with: `cargo run -p shuttle-demo -- --cycle ping-pong --interpolation eased`

mod scene;

use clap::Parser;
use shuttle_config::{CliArgs, Config, default_config_dir};
use shuttle_physics::{DebugLineBuffer, create_world, fixed_step_schedule};
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().or_else(default_config_dir);
    let (mut config, load_error) = match config_dir.as_deref().map(Config::load_or_create) {
        Some(Ok(config)) => (config, None),
        Some(Err(err)) => (Config::default(), Some(err)),
        None => (Config::default(), None),
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    shuttle_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if let Some(err) = load_error {
        warn!("Using default config: {err}");
    }
    if let Err(err) = config.validate() {
        error!("{err}");
        std::process::exit(1);
    }

    info!(
        "Platform: {} waypoints | leg={}s delay={}s offset={} | {} / {}",
        config.simulation.waypoints.len(),
        config.platform.leg_duration,
        config.platform.inter_leg_delay,
        config.platform.offset,
        config.platform.cycle_policy,
        config.platform.interpolation,
    );

    let mut world = create_world(config.simulation.fixed_dt, config.riders.conflict_policy);
    let demo = match scene::build(&mut world, &config) {
        Ok(demo) => demo,
        Err(err) => {
            error!("Failed to build scene: {err}");
            std::process::exit(1);
        }
    };

    let mut schedule = fixed_step_schedule();
    let interval = config.debug.report_interval;
    for step in 1..=config.simulation.steps {
        world.resource_mut::<DebugLineBuffer>().clear();
        schedule.run(&mut world);
        if interval != 0 && step % interval == 0 {
            demo.report(&world, step);
        }
    }

    demo.report(&world, config.simulation.steps);
    info!("Simulation finished after {} steps", config.simulation.steps);
}
