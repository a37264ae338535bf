//! Billboard projection: entity positions → screen-space sprite items.

use glam::Vec2;
use hecs::Entity;

use crate::{
    config::RenderConfig,
    engine::types::View,
    renderer::DrawItem,
    world::{CameraPose, TextureId},
};

/// What the scene builder needs to know about one billboard entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSnapshot {
    pub entity: Entity,
    pub pos: Vec2,
    pub texture: TextureId,
}

/// Screen placement of one sprite, before it becomes a [`DrawItem`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Radial distance; sprites are not fisheye-corrected.
    pub depth: f32,
    /// Wrapped angle from the heading to the sprite, in `(−π, π]`.
    pub relative: f32,
    pub column: i32,
    pub height: f32,
}

/// Place one sprite on screen, or `None` if it is culled.
///
/// Culled when it sits exactly on the camera, when its position is not
/// finite, or when `|relative| > half_fov + margin`.
pub fn project(camera: &CameraPose, pos: Vec2, view: &View, cfg: &RenderConfig) -> Option<Projected> {
    if !pos.is_finite() {
        return None;
    }
    let depth = camera.pos.distance(pos);
    if depth <= 0.0 {
        return None;
    }
    let relative = camera.relative_angle(pos);
    if relative.abs() > view.half_fov + cfg.sprite_cull_margin {
        return None;
    }
    let column = (view.central_column - relative / view.step).floor() as i32;
    Some(Projected {
        depth,
        relative,
        column,
        height: cfg.cell_size * cfg.sprite_projection / depth,
    })
}

/// Append one [`DrawItem::Sprite`] per visible snapshot.
pub fn project_sprites(
    camera: &CameraPose,
    sprites: &[SpriteSnapshot],
    cfg: &RenderConfig,
    out: &mut Vec<DrawItem>,
) {
    let view = View::from_config(cfg);
    for s in sprites {
        if !s.pos.is_finite() {
            tracing::warn!(entity = ?s.entity, pos = ?s.pos, "sprite with non-finite position skipped");
            continue;
        }
        let Some(p) = project(camera, s.pos, &view, cfg) else {
            continue;
        };
        out.push(DrawItem::Sprite {
            column: p.column,
            depth: p.depth,
            texture: s.texture,
            height: p.height,
            entity: s.entity,
        });
    }
}
