//! Level description: the tile grid, where the player starts, and which
//! billboards populate it.
//!
//! Levels are plain TOML so they can be written by hand:
//!
//! ```toml
//! name = "courtyard"
//! size = 4
//! cells = [1,1,1,1, 1,0,0,1, 1,0,0,1, 1,1,1,1]
//! player_start = [94.5, 94.5]   # world units
//! player_angle = 0.0            # radians, 0 = +Y
//!
//! [[barrels]]
//! x = 150.0
//! y = 150.0
//! ```

use std::{fs, io, path::Path};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::world::{
    grid::{GridError, Probe, TileGrid},
    texture::TextureId,
};

/// Where one barrel is placed and which damage frame it starts on.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct BarrelSpawn {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub texture: TextureId,
}

impl BarrelSpawn {
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Runtime snapshot of one map (immutable after load).
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub grid: TileGrid,
    pub start: Vec2,
    pub heading: f32,
    pub barrels: Vec<BarrelSpawn>,
}

#[derive(Error, Debug)]
pub enum LevelError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed level file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("player start ({x}, {y}) is not inside an empty cell")]
    StartBlocked { x: f32, y: f32 },
}

#[derive(Deserialize)]
struct LevelFile {
    #[serde(default)]
    name: String,
    size: usize,
    cells: Vec<TextureId>,
    player_start: [f32; 2],
    #[serde(default)]
    player_angle: f32,
    #[serde(default)]
    barrels: Vec<BarrelSpawn>,
}

impl Level {
    /// Assemble a level, checking the start lies on a passable cell.
    pub fn new(
        name: impl Into<String>,
        grid: TileGrid,
        start: Vec2,
        heading: f32,
        barrels: Vec<BarrelSpawn>,
        cell_size: f32,
    ) -> Result<Self, LevelError> {
        if grid.probe_world(start, cell_size) != Probe::Empty {
            return Err(LevelError::StartBlocked {
                x: start.x,
                y: start.y,
            });
        }
        Ok(Self {
            name: name.into(),
            grid,
            start,
            heading,
            barrels,
        })
    }

    pub fn from_toml_str(src: &str, cell_size: f32) -> Result<Self, LevelError> {
        let file: LevelFile = toml::from_str(src)?;
        let grid = TileGrid::new(file.size, file.cells)?;
        let [x, y] = file.player_start;
        let level = Self::new(
            file.name,
            grid,
            Vec2::new(x, y),
            file.player_angle,
            file.barrels,
            cell_size,
        )?;
        tracing::debug!(
            name = %level.name,
            size = level.grid.size(),
            barrels = level.barrels.len(),
            "level parsed"
        );
        Ok(level)
    }

    pub fn from_file<P: AsRef<Path>>(path: P, cell_size: f32) -> Result<Self, LevelError> {
        let src = fs::read_to_string(path)?;
        Self::from_toml_str(&src, cell_size)
    }
}
