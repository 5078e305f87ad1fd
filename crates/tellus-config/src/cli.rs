//! Command-line argument parsing for the Tellus demo.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tellus command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tellus", about = "Walk on the surface of a spinning body")]
pub struct CliArgs {
    /// Body radius in world units.
    #[arg(long)]
    pub radius: Option<f32>,

    /// Surface gravity in m/s².
    #[arg(long)]
    pub gravity: Option<f32>,

    /// Body spin rate in radians per second.
    #[arg(long)]
    pub spin_rate: Option<f32>,

    /// Relief amplitude as a fraction of radius.
    #[arg(long)]
    pub relief: Option<f32>,

    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Fixed frame time in seconds.
    #[arg(long)]
    pub dt: Option<f32>,

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
        if let Some(r) = args.radius {
            self.body.radius = r;
        }
        if let Some(g) = args.gravity {
            self.body.gravity = g;
        }
        if let Some(s) = args.spin_rate {
            self.body.spin_rate = s;
        }
        if let Some(relief) = args.relief {
            self.body.relief = relief;
        }
        if let Some(frames) = args.frames {
            self.demo.frames = frames;
        }
        if let Some(dt) = args.dt {
            self.demo.dt = dt;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            radius: Some(50.0),
            gravity: Some(1.62),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.body.radius, 50.0);
        assert_eq!(config.body.gravity, 1.62);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.demo.frames, 1200);
        assert_eq!(config.body.spin_rate, 0.05);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["tellus", "--radius", "12.5", "--frames", "30"]);
        assert_eq!(args.radius, Some(12.5));
        assert_eq!(args.frames, Some(30));
        assert!(args.config.is_none());
    }
}
