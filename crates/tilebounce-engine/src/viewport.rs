//! Camera layout modes.
//!
//! A [`LayoutMode`] decides which part of the world the camera shows. The
//! split modes divide the screen into halves or quadrants and snap the camera
//! to whichever one the player stands in; the player-focused mode follows the
//! ball with a fixed extent.

use serde::{Deserialize, Serialize};
use tilebounce_grid::geometry::{Vec2, ViewRect};

use crate::config::GameConfig;
use crate::render::Camera2D;
use crate::EngineError;

/// How the camera frames the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// The whole map.
    FullMap,
    /// Left or right half of the screen.
    VerticalSplit,
    /// One quarter of the screen.
    QuadrantSplit,
    /// Centered on the player.
    #[default]
    PlayerFocused,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 4] = [
        LayoutMode::FullMap,
        LayoutMode::VerticalSplit,
        LayoutMode::QuadrantSplit,
        LayoutMode::PlayerFocused,
    ];

    /// Map a numeric mode index (as sent by a UI) to a layout.
    pub fn from_index(index: i32) -> Result<Self, EngineError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(EngineError::UnknownLayoutMode { index })
    }

    pub fn index(self) -> i32 {
        match self {
            LayoutMode::FullMap => 0,
            LayoutMode::VerticalSplit => 1,
            LayoutMode::QuadrantSplit => 2,
            LayoutMode::PlayerFocused => 3,
        }
    }
}

/// Camera rectangle for `mode`.
///
/// `screen` is the window size the split layouts divide; `map_size` is the
/// level's pixel extent; `follow_extent` is the camera size used when
/// following the player. The split layouts compare the player against the
/// screen midpoints, not the map midpoints.
pub fn compute_view(
    mode: LayoutMode,
    player: Vec2,
    screen: Vec2,
    map_size: Vec2,
    follow_extent: Vec2,
) -> ViewRect {
    let (w, h) = (screen.x, screen.y);
    match mode {
        LayoutMode::FullMap => {
            ViewRect::new(Vec2::new(map_size.x / 2.0, map_size.y / 2.0), map_size)
        }
        LayoutMode::VerticalSplit => {
            let x = if player.x < w / 2.0 { w / 4.0 } else { 3.0 * w / 4.0 };
            ViewRect::new(Vec2::new(x, h / 2.0), Vec2::new(w / 2.0, h))
        }
        LayoutMode::QuadrantSplit => {
            let x = if player.x < w / 2.0 { w / 4.0 } else { 3.0 * w / 4.0 };
            let y = if player.y < h / 2.0 { h / 4.0 } else { 3.0 * h / 4.0 };
            ViewRect::new(Vec2::new(x, y), Vec2::new(w / 2.0, h / 2.0))
        }
        LayoutMode::PlayerFocused => ViewRect::new(player, follow_extent),
    }
}

/// Holds the active layout mode and drives the camera from it.
#[derive(Debug, Clone)]
pub struct ViewportController {
    mode: LayoutMode,
    screen: Vec2,
    follow_extent: Vec2,
}

impl ViewportController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            mode: config.layout,
            screen: config.screen_size(),
            follow_extent: config.follow_extent(),
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LayoutMode) {
        if mode != self.mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "layout mode changed");
        }
        self.mode = mode;
    }

    /// Switch by numeric index. An unknown index is logged and leaves the
    /// current mode in place.
    pub fn apply_index(&mut self, index: i32) -> Result<LayoutMode, EngineError> {
        match LayoutMode::from_index(index) {
            Ok(mode) => {
                self.set_mode(mode);
                Ok(mode)
            }
            Err(err) => {
                tracing::warn!(index, current = ?self.mode, "ignoring layout change: {err}");
                Err(err)
            }
        }
    }

    /// Point `camera` at the view for the current mode.
    pub fn update(&self, camera: &mut Camera2D, player: Vec2, map_size: Vec2) {
        camera.set_view(compute_view(
            self.mode,
            player,
            self.screen,
            map_size,
            self.follow_extent,
        ));
    }
}
