//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level Tellus configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Surface-walk tuning.
    pub walk: WalkConfig,
    /// Parameters of the body generated by the demo.
    pub body: BodyConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
    /// Headless demo run settings.
    pub demo: DemoConfig,
}

/// Tuning constants for the surface locomotion controller.
///
/// Speeds and accelerations are given at reference gravity; the walker
/// scales them by `max(min_gravity_scale, gravity / reference_gravity)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WalkConfig {
    /// Radians of yaw/pitch per unit of pointer motion.
    pub mouse_sensitivity: f32,
    /// Invert vertical look.
    pub invert_y: bool,
    /// Pitch limit in degrees (symmetric).
    pub pitch_limit_deg: f32,
    /// Head clearance above the ground as a fraction of body radius.
    pub head_height_fraction: f32,
    /// Lower bound on head clearance, in world units.
    pub min_head_height: f32,
    /// Gravity that maps to a gravity scale of 1.0.
    pub reference_gravity: f32,
    /// Lower bound on the gravity scale.
    pub min_gravity_scale: f32,
    /// Tangential acceleration from movement keys.
    pub acceleration: f32,
    /// Hard cap on tangential speed.
    pub max_tangential_speed: f32,
    /// Vertical speed applied on jump.
    pub jump_speed: f32,
    /// Downward acceleration toward the body center.
    pub gravity_strength: f32,
    /// Exponential decay rate of the vertical velocity component (1/s).
    pub vertical_damping_rate: f32,
    /// Exponential decay rate of the tangential velocity component (1/s).
    pub tangential_damping_rate: f32,
    /// Smallest radius used by the no-hit surface fallback.
    pub fallback_min_radius: f32,
    /// Walking near plane as a fraction of head height.
    pub near_plane_fraction: f32,
    /// Smallest near plane the walker will set.
    pub min_near_plane: f32,
}

/// Parameters of the generated body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Base radius in world units.
    pub radius: f32,
    /// Surface gravity in m/s².
    pub gravity: f32,
    /// Spin rate in radians per second about the body's +Y axis.
    pub spin_rate: f32,
    /// Icosphere subdivision level of the collision mesh.
    pub subdivisions: u32,
    /// Relief amplitude as a fraction of radius (0 = perfect sphere).
    pub relief: f32,
    /// Number of craters stamped into the surface.
    pub craters: u32,
    /// Number of mountains raised on the surface.
    pub mountains: u32,
    /// Seed for crater/mountain placement.
    pub seed: u64,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (action name -> key name), e.g. `"Jump": "KeyJ"`.
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write JSON logs to the log directory.
    pub log_to_file: bool,
}

/// Headless demo run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to simulate.
    pub frames: u32,
    /// Fixed frame time in seconds.
    pub dt: f32,
    /// Orbit camera distance as a multiple of body radius.
    pub camera_distance: f32,
    /// Seconds between scripted jumps (0 disables jumping).
    pub jump_interval: f32,
}

// --- Default implementations ---

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.0024,
            invert_y: false,
            pitch_limit_deg: 85.0,
            head_height_fraction: 0.025,
            min_head_height: 0.02,
            reference_gravity: 9.81,
            min_gravity_scale: 0.5,
            acceleration: 2.4,
            max_tangential_speed: 1.2,
            jump_speed: 2.6,
            gravity_strength: 8.5,
            vertical_damping_rate: 4.5,
            tangential_damping_rate: 2.2,
            fallback_min_radius: 0.1,
            near_plane_fraction: 0.2,
            min_near_plane: 0.001,
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            gravity: 9.81,
            spin_rate: 0.05,
            subdivisions: 4,
            relief: 0.04,
            craters: 12,
            mountains: 6,
            seed: 42,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 1200,
            dt: 1.0 / 60.0,
            camera_distance: 3.0,
            jump_interval: 4.0,
        }
    }
}

impl WalkConfig {
    /// Pitch limit in radians.
    #[must_use]
    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit_deg.to_radians()
    }

    /// Checks that every value is usable by the walker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("walk.mouse_sensitivity", self.mouse_sensitivity),
            ("walk.reference_gravity", self.reference_gravity),
            ("walk.max_tangential_speed", self.max_tangential_speed),
            ("walk.fallback_min_radius", self.fallback_min_radius),
            ("walk.min_near_plane", self.min_near_plane),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be positive and finite",
                });
            }
        }
        if !(self.pitch_limit_deg > 0.0 && self.pitch_limit_deg < 90.0) {
            return Err(ConfigError::InvalidValue {
                field: "walk.pitch_limit_deg",
                reason: "must be within (0, 90)",
            });
        }
        if self.vertical_damping_rate < 0.0 || self.tangential_damping_rate < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "walk.*_damping_rate",
                reason: "must not be negative",
            });
        }
        Ok(())
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
            config.walk.validate()?;
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
        new_config.walk.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_walk_tuning() {
        let walk = WalkConfig::default();
        assert!((walk.mouse_sensitivity - 0.0024).abs() < 1e-9);
        assert!((walk.pitch_limit() - 85.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(walk.max_tangential_speed, 1.2);
        assert_eq!(walk.reference_gravity, 9.81);
        assert!(walk.validate().is_ok());
    }

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("jump_speed: 2.6"));
        assert!(ron_str.contains("subdivisions: 4"));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(walk: (acceleration: 3.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.walk.acceleration, 3.0);
        assert_eq!(config.walk.jump_speed, WalkConfig::default().jump_speed);
        assert_eq!(config.body, BodyConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.body.radius = 25.0;
        config.walk.invert_y = true;
        config
            .input
            .keybindings
            .insert("Jump".to_string(), "KeyJ".to_string());

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.body.gravity = 3.7;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.body.gravity), Some(3.7));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_pitch_limit_rejected() {
        let walk = WalkConfig {
            pitch_limit_deg: 95.0,
            ..Default::default()
        };
        assert!(matches!(
            walk.validate(),
            Err(ConfigError::InvalidValue {
                field: "walk.pitch_limit_deg",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_file_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.ron"),
            "(walk: (mouse_sensitivity: -1.0))",
        )
        .unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
