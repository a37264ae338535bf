//! Randomised depth-first maze with barrels scattered through the
//! corridors.
//!
//! Cells on odd coordinates are rooms; the walls between two rooms are
//! knocked out as the walk visits them. The border is re-walled with a
//! random pick from [`WALL_TYPES`] afterwards.

use glam::Vec2;
use rand::Rng;

use crate::world::{
    grid::{EMPTY, TileGrid},
    level::{BarrelSpawn, Level, LevelError},
    texture::TextureId,
};

pub const WALL_TYPES: [TextureId; 2] = [4, 5];
/// Cell the player spawns in; always carved.
pub const START_CELL: (usize, usize) = (2, 1);
pub const BARREL_CHANCE: f64 = 0.162;
/// Barrels sit this fraction of a cell in from the corner they occupy.
const BARREL_MARGIN: f32 = 0.30;

const DIRECTIONS: [(i64, i64); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

/// Generate a `size`×`size` maze level. `size` is clamped to at least 5.
pub fn generate<R: Rng>(size: usize, cell_size: f32, rng: &mut R) -> Result<Level, LevelError> {
    let size = size.max(5);
    let mut cells = carve(size, rng);
    wall_border(&mut cells, size, rng);
    let (sc, sr) = START_CELL;
    cells[sr * size + sc] = EMPTY;

    let grid = TileGrid::new(size, cells)?;
    let barrels = scatter_barrels(&grid, cell_size, rng);
    let start = Vec2::new(
        (sc as f32 + 0.5) * cell_size,
        (sr as f32 + 0.5) * cell_size,
    );

    tracing::info!(size, barrels = barrels.len(), "generated maze");
    Level::new("maze", grid, start, 0.0, barrels, cell_size)
}

fn carve<R: Rng>(size: usize, rng: &mut R) -> Vec<TextureId> {
    let n = size as i64;
    let idx = |x: i64, y: i64| (y * n + x) as usize;
    let mut maze = vec![WALL_TYPES[0]; size * size];
    let mut visited = vec![false; size * size];

    let rooms = (n - 1) / 2;
    let sx = rng.gen_range(0..rooms) * 2 + 1;
    let sy = rng.gen_range(0..rooms) * 2 + 1;
    let mut stack = vec![(sx, sy)];
    visited[idx(sx, sy)] = true;
    maze[idx(sx, sy)] = EMPTY;

    while let Some(&(x, y)) = stack.last() {
        let neighbours: Vec<(i64, i64)> = DIRECTIONS
            .iter()
            .map(|(dx, dy)| (x + dx, y + dy))
            .filter(|&(nx, ny)| nx > 0 && nx < n - 1 && ny > 0 && ny < n - 1)
            .filter(|&(nx, ny)| !visited[idx(nx, ny)])
            .collect();

        if neighbours.is_empty() {
            stack.pop();
            continue;
        }
        let (nx, ny) = neighbours[rng.gen_range(0..neighbours.len())];
        maze[idx((x + nx) / 2, (y + ny) / 2)] = EMPTY;
        visited[idx(nx, ny)] = true;
        maze[idx(nx, ny)] = EMPTY;
        stack.push((nx, ny));
    }
    maze
}

fn wall_border<R: Rng>(maze: &mut [TextureId], size: usize, rng: &mut R) {
    let mut pick = || WALL_TYPES[rng.gen_range(0..WALL_TYPES.len())];
    for i in 0..size {
        maze[i] = pick();
        maze[(size - 1) * size + i] = pick();
        maze[i * size] = pick();
        maze[i * size + size - 1] = pick();
    }
}

fn scatter_barrels<R: Rng>(grid: &TileGrid, cell_size: f32, rng: &mut R) -> Vec<BarrelSpawn> {
    let size = grid.size();
    let margin = cell_size * BARREL_MARGIN;
    let far = cell_size - margin;
    let mut out = Vec::new();

    for row in 0..size {
        for col in 0..size {
            if (col, row) == START_CELL || grid.cells()[row * size + col] != EMPTY {
                continue;
            }
            if !rng.gen_bool(BARREL_CHANCE) {
                continue;
            }
            let (ox, oy) = match rng.gen_range(0..4) {
                0 => (margin, margin),
                1 => (far, margin),
                2 => (margin, far),
                _ => (far, far),
            };
            out.push(BarrelSpawn {
                x: col as f32 * cell_size + ox,
                y: row as f32 * cell_size + oy,
                texture: 0,
            });
        }
    }
    out
}
