// =============================================================================
// CONFIG.RS: Simulation tuning
//
// Every constant the movement, viewport and render code depends on lives
// here so that alternate tunings can be tested or loaded from a JSON file.
// =============================================================================

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tuning values for the simulation and the frame builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Constant speed (world units per reference frame) while a key is held.
    pub move_speed: f32,
    /// Per-reference-frame velocity multiplier when no key is held, in (0, 1).
    pub velocity_decay: f32,
    /// Avatar circle radius in world units.
    pub avatar_radius: f32,
    /// Duration of the reference frame the speed values are tuned for.
    pub reference_frame_ms: f32,
    /// Largest frame delta (seconds) fed into one tick; longer stalls are clipped.
    pub max_frame_dt: f32,
    /// Background grid spacing.
    pub tile_size: f32,
    /// Side length of the square minimap in screen pixels.
    pub minimap_size: f32,
    /// Remote avatars not refreshed for this many ticks are evicted.
    pub stale_after_ticks: u64,
    /// Ticks a notice stays on screen before expiring.
    pub notice_ticks: u64,
    /// Colour broadcast for the local avatar.
    pub player_color: String,
    /// Initial local avatar position.
    pub spawn: [f32; 2],
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            velocity_decay: 0.8,
            avatar_radius: 12.0,
            reference_frame_ms: 1000.0 / 60.0,
            max_frame_dt: 0.25,
            tile_size: 32.0,
            minimap_size: 150.0,
            stale_after_ticks: 300,
            notice_ticks: 360,
            player_color: "red".into(),
            spawn: [400.0, 300.0],
        }
    }
}

impl SimConfig {
    /// Load a config from a JSON file.  Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: SimConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: format!("must be positive, got {v}") })
            }
        }

        positive("move_speed", self.move_speed)?;
        positive("avatar_radius", self.avatar_radius)?;
        positive("reference_frame_ms", self.reference_frame_ms)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        if !(self.tile_size >= 1.0 && self.tile_size.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "tile_size",
                reason: format!("must be at least 1, got {}", self.tile_size),
            });
        }
        positive("minimap_size", self.minimap_size)?;

        if !(self.velocity_decay > 0.0 && self.velocity_decay < 1.0) {
            return Err(ConfigError::Invalid {
                field: "velocity_decay",
                reason: format!("must be in (0, 1), got {}", self.velocity_decay),
            });
        }
        Ok(())
    }

    /// Ratio of an elapsed frame to the reference frame.
    pub fn frame_ratio(&self, dt_seconds: f32) -> f32 {
        let dt = dt_seconds.clamp(0.0, self.max_frame_dt);
        dt * 1000.0 / self.reference_frame_ms
    }

    /// Frame duration (seconds) that yields a ratio of exactly one.
    pub fn reference_dt(&self) -> f32 {
        self.reference_frame_ms / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn decay_of_one_is_rejected() {
        let cfg = SimConfig { velocity_decay: 1.0, ..SimConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { field: "velocity_decay", .. })));
    }

    #[test]
    fn sub_pixel_tile_is_rejected() {
        let cfg = SimConfig { tile_size: 0.01, ..SimConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { field: "tile_size", .. })));
    }

    #[test]
    fn zero_speed_is_rejected() {
        let cfg = SimConfig { move_speed: 0.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SimConfig = serde_json::from_str(r#"{ "move_speed": 7.5 }"#).unwrap();
        assert_eq!(cfg.move_speed, 7.5);
        assert_eq!(cfg.velocity_decay, 0.8);
        assert_eq!(cfg.player_color, "red");
    }

    #[test]
    fn frame_ratio_is_clipped() {
        let cfg = SimConfig::default();
        assert!((cfg.frame_ratio(cfg.reference_dt()) - 1.0).abs() < 1e-4);
        assert!((cfg.frame_ratio(10.0) - cfg.frame_ratio(cfg.max_frame_dt)).abs() < 1e-4);
        assert_eq!(cfg.frame_ratio(-1.0), 0.0);
    }
}
