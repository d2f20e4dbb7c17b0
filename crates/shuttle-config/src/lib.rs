//! Configuration for the moving-platform simulation.
//!
//! Settings persist to disk as RON, can be overridden from the command line
//! via clap, and support hot-reload detection.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, RiderConfig, SimulationConfig, default_config_dir};
pub use error::ConfigError;
