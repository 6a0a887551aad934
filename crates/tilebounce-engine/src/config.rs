//! Game configuration.
//!
//! A single immutable [`GameConfig`] is built at startup and handed to every
//! component that needs sizing. Cell size is derived from the window size and
//! the number of cells a scene shows, so nothing reads global sizing state.
//!
//! Configs are JSON. Every field has a default, so a file only needs to list
//! what it overrides:
//!
//! ```
//! use tilebounce_engine::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "starting_lives": 5 }"#).unwrap();
//! assert_eq!(config.starting_lives, 5);
//! assert_eq!(config.physics_scale, 30.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tilebounce_grid::geometry::{CellSize, PhysicsScale, Vec2};

use crate::viewport::LayoutMode;

/// Errors produced while loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Startup configuration for a game.
///
/// Pixel values are in world/pixel space; speeds and gravity are in physics
/// units (pixels divided by [`physics_scale`](Self::physics_scale)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Screen width in pixels. Also the reference size for the split layouts.
    pub window_width: f32,
    pub window_height: f32,
    /// Cells visible across one screen; cell width = window width / this.
    pub scene_cols: u32,
    pub scene_rows: u32,
    /// Camera extent in pixels for the player-focused layout.
    pub follow_view_width: f32,
    pub follow_view_height: f32,
    /// Pixels per physics unit.
    pub physics_scale: f32,
    /// Downward gravity in physics units per second squared.
    pub gravity: f32,
    /// Seconds per simulation tick.
    pub fixed_dt: f32,
    pub starting_lives: u32,
    /// Ball radius in pixels at normal size.
    pub ball_radius: f32,
    /// Horizontal ball speed while a direction is held.
    pub move_speed: f32,
    /// Upward speed given by a jump.
    pub jump_speed: f32,
    /// Radius multiplier after a size-up pickup.
    pub maximize_factor: f32,
    /// Radius multiplier after a size-down pickup.
    pub minimize_factor: f32,
    /// Duration of wave and flag animations, in seconds.
    pub effect_duration: f32,
    pub layout: LayoutMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 1920.0,
            window_height: 1080.0,
            scene_cols: 48,
            scene_rows: 27,
            follow_view_width: 960.0,
            follow_view_height: 540.0,
            physics_scale: 30.0,
            gravity: 9.8,
            fixed_dt: 1.0 / 60.0,
            starting_lives: 3,
            ball_radius: 15.0,
            move_speed: 5.0,
            jump_speed: 7.0,
            maximize_factor: 1.5,
            minimize_factor: 0.6,
            effect_duration: 1.0,
            layout: LayoutMode::PlayerFocused,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Reject values that would make sizing or simulation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("follow_view_width", self.follow_view_width),
            ("follow_view_height", self.follow_view_height),
            ("physics_scale", self.physics_scale),
            ("fixed_dt", self.fixed_dt),
            ("ball_radius", self.ball_radius),
            ("maximize_factor", self.maximize_factor),
            ("minimize_factor", self.minimize_factor),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive and finite, got {value}"),
                });
            }
        }
        let finite = [
            ("gravity", self.gravity),
            ("move_speed", self.move_speed),
            ("jump_speed", self.jump_speed),
            ("effect_duration", self.effect_duration),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }
        for (field, value) in [("scene_cols", self.scene_cols), ("scene_rows", self.scene_rows)] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1".to_owned(),
                });
            }
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// Pixel size of one grid cell.
    pub fn cell_size(&self) -> CellSize {
        CellSize::new(
            self.window_width / self.scene_cols as f32,
            self.window_height / self.scene_rows as f32,
        )
    }

    pub fn scale(&self) -> PhysicsScale {
        PhysicsScale(self.physics_scale)
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.window_width, self.window_height)
    }

    pub fn follow_extent(&self) -> Vec2 {
        Vec2::new(self.follow_view_width, self.follow_view_height)
    }
}
