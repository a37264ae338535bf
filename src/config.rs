//! Tunables for the renderer and the player kinematics.
//!
//! Every field has a default matching the stock game, so a config file
//! only needs the values it changes:
//!
//! ```toml
//! [render]
//! width = 640
//! height = 400
//! textured_walls = false
//!
//! [movement]
//! pivot_speed = 0.04
//! ```
//!
//! Lengths that are not set (`torch_range`, `move_speed`, `entity_radius`,
//! `reach`) default to the same multiple of `render.cell_size` as the stock
//! values are of `DEFAULT_CELL_SIZE`.

use std::{f32::consts::PI, fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

/// Wall projection calibration: `height = cell · WALL_PROJECTION / depth`.
pub const WALL_PROJECTION: f32 = 280.0;
/// Sprite projection calibration. Deliberately different from walls.
pub const SPRITE_PROJECTION: f32 = 300.0;
/// Extra slack added to `FOV/2` before a sprite is culled.
///
/// Added to an angle in radians, so 20 disables angular culling for
/// every practical purpose. Kept as found; see DESIGN.md.
pub const SPRITE_CULL_MARGIN: f32 = 20.0;
/// Gain of the sprite opacity ramp (`opacity = gain · (1 − d/range)`).
pub const SPRITE_LIGHT_GAIN: f32 = 2.4;

pub const DEFAULT_WIDTH: usize = 300;
pub const DEFAULT_HEIGHT: usize = 200;
pub const DEFAULT_FOV: f32 = PI / 3.0;
pub const DEFAULT_CELL_SIZE: f32 = 63.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Renderer-side constants, read-only during a frame.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Horizontal field of view in radians.
    pub fov: f32,
    /// World units per grid cell.
    pub cell_size: f32,
    pub torch_range: f32,
    pub torch_intensity: f32,
    pub wall_projection: f32,
    pub sprite_projection: f32,
    pub sprite_cull_margin: f32,
    pub sprite_light_gain: f32,
    /// Alpha of the full-screen darkening pass.
    pub ambient_alpha: f32,
    /// `false` selects flat two-tone walls.
    pub textured_walls: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::for_cell(DEFAULT_CELL_SIZE)
    }
}

impl RenderConfig {
    /// Stock values for a world of `cell_size` units per cell.
    pub fn for_cell(cell_size: f32) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fov: DEFAULT_FOV,
            cell_size,
            torch_range: cell_size * 8.0,
            torch_intensity: 1.2,
            wall_projection: WALL_PROJECTION,
            sprite_projection: SPRITE_PROJECTION,
            sprite_cull_margin: SPRITE_CULL_MARGIN,
            sprite_light_gain: SPRITE_LIGHT_GAIN,
            ambient_alpha: 0.4,
            textured_walls: true,
        }
    }
}

/// Per-frame movement constants.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MoveConfig {
    /// World units per frame at full forward input.
    pub move_speed: f32,
    /// Radians per frame at full turn input.
    pub pivot_speed: f32,
    /// Radians per pixel of pointer motion.
    pub mouse_sensitivity: f32,
    /// How many steps ahead the wall probe looks.
    pub proximity_limit: f32,
    /// Minimum distance kept to any live entity.
    pub entity_radius: f32,
    /// Furthest a melee strike reaches.
    pub reach: f32,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self::for_cell(DEFAULT_CELL_SIZE)
    }
}

impl MoveConfig {
    pub fn for_cell(cell_size: f32) -> Self {
        Self {
            move_speed: cell_size / 2.0 / 10.0,
            pivot_speed: 0.05,
            mouse_sensitivity: 0.003,
            proximity_limit: 10.0,
            entity_radius: cell_size * 0.4,
            reach: cell_size * 1.5,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub movement: MoveConfig,
}

impl Config {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(src)?;
        let mut cfg: Config = toml::from_str(src)?;
        cfg.scale_unset_lengths(&table);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Re-derive every length the file left out from its `cell_size`.
    fn scale_unset_lengths(&mut self, table: &toml::Table) {
        let is_set = |section: &str, key: &str| {
            table
                .get(section)
                .and_then(toml::Value::as_table)
                .is_some_and(|t| t.contains_key(key))
        };
        let render = RenderConfig::for_cell(self.render.cell_size);
        let movement = MoveConfig::for_cell(self.render.cell_size);

        if !is_set("render", "torch_range") {
            self.render.torch_range = render.torch_range;
        }
        if !is_set("movement", "move_speed") {
            self.movement.move_speed = movement.move_speed;
        }
        if !is_set("movement", "entity_radius") {
            self.movement.entity_radius = movement.entity_radius;
        }
        if !is_set("movement", "reach") {
            self.movement.reach = movement.reach;
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let src = fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.render;
        if r.width == 0 || r.height == 0 {
            return Err(ConfigError::Invalid("render size must be non-zero"));
        }
        // FOV ≥ π would let both axis families miss on one column
        if !(r.fov > 0.0 && r.fov < PI) {
            return Err(ConfigError::Invalid("fov must lie in (0, π)"));
        }
        if !(r.cell_size > 0.0) {
            return Err(ConfigError::Invalid("cell_size must be positive"));
        }
        if !(r.torch_range > 0.0) {
            return Err(ConfigError::Invalid("torch_range must be positive"));
        }
        if !(0.0..=1.0).contains(&r.ambient_alpha) {
            return Err(ConfigError::Invalid("ambient_alpha must lie in [0, 1]"));
        }
        Ok(())
    }
}
