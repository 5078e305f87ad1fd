//! Body size and gravity as the walker sees them.

use tellus_config::WalkConfig;

/// Current size and surface gravity of the body being walked on.
///
/// Polled through the session's provider on every entry and every frame;
/// the body may be regenerated or rescaled at any time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyInfo {
    pub radius: f32,
    /// Surface gravity magnitude in m/s².
    pub gravity: f32,
}

impl BodyInfo {
    /// Eye clearance above the ground, proportional to the body's size.
    #[must_use]
    pub fn head_height(&self, config: &WalkConfig) -> f32 {
        let scaled = self.radius * config.head_height_fraction;
        if scaled.is_finite() {
            scaled.max(config.min_head_height)
        } else {
            config.min_head_height
        }
    }

    /// Scales movement tuning so light bodies still feel responsive.
    #[must_use]
    pub fn gravity_scale(&self, config: &WalkConfig) -> f32 {
        let scale = self.gravity / config.reference_gravity;
        if scale.is_finite() {
            scale.max(config.min_gravity_scale)
        } else {
            config.min_gravity_scale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_height_follows_radius_with_floor() {
        let config = WalkConfig::default();
        let large = BodyInfo { radius: 10.0, gravity: 9.81 };
        assert!((large.head_height(&config) - 0.25).abs() < 1e-6);
        let tiny = BodyInfo { radius: 0.1, gravity: 9.81 };
        assert_eq!(tiny.head_height(&config), 0.02);
    }

    #[test]
    fn test_gravity_scale_has_floor() {
        let config = WalkConfig::default();
        let earth = BodyInfo { radius: 1.0, gravity: 9.81 };
        assert!((earth.gravity_scale(&config) - 1.0).abs() < 1e-6);
        let asteroid = BodyInfo { radius: 1.0, gravity: 0.2 };
        assert_eq!(asteroid.gravity_scale(&config), 0.5);
        let heavy = BodyInfo { radius: 1.0, gravity: 19.62 };
        assert!((heavy.gravity_scale(&config) - 2.0).abs() < 1e-5);
    }
}
