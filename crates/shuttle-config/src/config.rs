//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shuttle_physics::{ConflictPolicy, DEFAULT_FIXED_DT};
use shuttle_platform::MotionSettings;

use crate::error::ConfigError;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Motion settings shared by every platform.
    pub platform: MotionSettings,
    /// Fixed-step loop and demo scene.
    pub simulation: SimulationConfig,
    /// Rider contact handling.
    pub riders: RiderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Fixed-step loop and scene layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds per fixed step.
    pub fixed_dt: f32,
    /// Number of fixed steps the demo runs.
    pub steps: u32,
    /// Waypoint positions of the demo platform, in visiting order.
    pub waypoints: Vec<[f32; 3]>,
    /// Half extents of the platform collider.
    pub platform_half_extents: [f32; 3],
}

/// Rider body and correction settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiderConfig {
    /// How corrections from several platforms touching one rider combine.
    pub conflict_policy: ConflictPolicy,
    /// Half extents of the demo rider collider.
    pub half_extents: [f32; 3],
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Draw waypoint marker gizmos.
    pub show_waypoints: bool,
    /// Log platform and rider positions every this many steps (0 = never).
    pub report_interval: u32,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            steps: 600,
            waypoints: vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [10.0, 0.0, 10.0]],
            platform_half_extents: [2.0, 0.2, 2.0],
        }
    }
}

impl Default for RiderConfig {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::Sum,
            half_extents: [0.3, 0.5, 0.3],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_waypoints: false,
            report_interval: 60,
            log_level: "info".to_string(),
        }
    }
}

/// Platform default config directory: `<config dir>/shuttle`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("shuttle"))
}

fn positive_extents(name: &str, extents: [f32; 3]) -> Result<(), ConfigError> {
    if extents.iter().all(|e| e.is_finite() && *e > 0.0) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be positive, got {extents:?}"
        )))
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Checks every value a simulation run depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.platform
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        let dt = self.simulation.fixed_dt;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fixed_dt must be positive, got {dt}"
            )));
        }
        positive_extents(
            "platform_half_extents",
            self.simulation.platform_half_extents,
        )?;
        positive_extents("rider half_extents", self.riders.half_extents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuttle_platform::{CyclePolicy, InterpolationMode};

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("leg_duration: 2.0"));
        assert!(ron_str.contains("cycle_policy: loop"));
        assert!(ron_str.contains("conflict_policy: sum"));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(platform: (leg_duration: 4.0), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.platform.leg_duration, 4.0);
        assert_eq!(config.platform.inter_leg_delay, 0.0);
        assert_eq!(config.simulation, SimulationConfig::default());
        assert_eq!(config.riders, RiderConfig::default());
    }

    #[test]
    fn test_policies_parse_from_ron() {
        let ron_str = "(platform: (cycle_policy: ping_pong, interpolation: eased), \
                       riders: (conflict_policy: strongest))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.platform.cycle_policy, CyclePolicy::PingPong);
        assert_eq!(config.platform.interpolation, InterpolationMode::Eased);
        assert_eq!(config.riders.conflict_policy, ConflictPolicy::Strongest);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.platform.leg_duration = 3.5;
        config.platform.cycle_policy = CyclePolicy::StartToEnd;
        config.simulation.waypoints = vec![[1.0, 2.0, 3.0]];

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shuttle");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.platform.inter_leg_delay = 1.5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.platform.inter_leg_delay), Some(1.5));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_default_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.platform.leg_duration = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.simulation.fixed_dt = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.riders.half_extents = [0.3, 0.0, 0.3];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_default_config_dir_ends_with_shuttle() {
        if let Some(dir) = default_config_dir() {
            assert!(dir.ends_with("shuttle"));
        }
    }
}
