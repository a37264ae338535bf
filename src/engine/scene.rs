//! Per-frame depth-buffer assembly.
//!
//! One wall item per screen column, then every visible billboard, all in
//! the same list. Nothing is drawn until the list is complete.

use crate::{
    config::RenderConfig,
    engine::{
        billboard::{SpriteSnapshot, project_sprites},
        raycast::{Axis, RayCast, RayIntersection},
        types::View,
    },
    renderer::{DrawItem, HORIZONTAL_WALL_COLOUR, VERTICAL_WALL_COLOUR},
    world::{CameraPose, TileGrid},
};

/// Everything the builder works out for one column's wall.
#[derive(Clone, Copy, Debug)]
pub struct ColumnHit {
    pub column: usize,
    pub ray_angle: f32,
    pub hit: RayIntersection,
    /// Distance along the ray.
    pub raw_depth: f32,
    /// `raw_depth · cos(heading − ray_angle)`.
    pub depth: f32,
    /// `cell · wall_projection / depth`.
    pub height: f32,
}

/// Cast the ray for `column` and resolve its wall, if any.
pub fn cast_column(
    grid: &TileGrid,
    camera: &CameraPose,
    view: &View,
    cfg: &RenderConfig,
    column: usize,
) -> Option<ColumnHit> {
    let ray_angle = view.ray_angle(camera.heading(), column);
    let hit = RayCast::new(grid, cfg.cell_size, camera.pos, ray_angle).nearest()?;
    let depth = hit.depth * (camera.heading() - ray_angle).cos();
    Some(ColumnHit {
        column,
        ray_angle,
        hit,
        raw_depth: hit.depth,
        depth,
        height: wall_height(depth, cfg),
    })
}

/// Screen height of a wall at fisheye-corrected `depth`.
#[inline]
pub fn wall_height(depth: f32, cfg: &RenderConfig) -> f32 {
    // a camera standing on a wall face sees it at depth 0
    cfg.cell_size * cfg.wall_projection / depth.max(f32::EPSILON)
}

/// Resolve one column hit into its draw item.
pub fn wall_item(col: &ColumnHit, cfg: &RenderConfig) -> DrawItem {
    let column = col.column as i32;
    if cfg.textured_walls {
        DrawItem::TexturedWall {
            column,
            depth: col.depth,
            height: col.height,
            texture: col.hit.texture,
            offset: col.hit.texture_offset(cfg.cell_size),
        }
    } else {
        let colour = match col.hit.axis {
            Axis::Vertical => VERTICAL_WALL_COLOUR,
            Axis::Horizontal => HORIZONTAL_WALL_COLOUR,
        };
        DrawItem::FlatWall {
            column,
            depth: col.depth,
            height: col.height,
            colour,
        }
    }
}

/// Append one wall item per column that hits something.
pub fn build_walls(grid: &TileGrid, camera: &CameraPose, cfg: &RenderConfig, out: &mut Vec<DrawItem>) {
    let view = View::from_config(cfg);
    out.extend(
        (0..view.columns)
            .filter_map(|c| cast_column(grid, camera, &view, cfg, c))
            .map(|hit| wall_item(&hit, cfg)),
    );
}

/// Fill `out` with the whole frame's unsorted depth buffer.
pub fn build_scene(
    grid: &TileGrid,
    camera: &CameraPose,
    sprites: &[SpriteSnapshot],
    cfg: &RenderConfig,
    out: &mut Vec<DrawItem>,
) {
    out.clear();
    build_walls(grid, camera, cfg, out);
    let walls = out.len();
    project_sprites(camera, sprites, cfg, out);
    tracing::trace!(walls, sprites = out.len() - walls, "scene assembled");
}
