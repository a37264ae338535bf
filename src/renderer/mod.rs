//! Rendering abstraction layer and compositor.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! The scene builder produces a list of [`DrawItem`]s; the compositor
//! ([`RendererExt::composite`]) sorts them back-to-front and hands each one
//! to a type that implements [`Renderer`].
//!
//! * There is no per-pixel depth test. Correct overlap comes purely from
//!   painting far items first.
//! * Walls and sprites are lit by two separate formulas through two
//!   separate channels (black overlay vs. opacity); see [`wall_shade`] and
//!   [`sprite_opacity`].

use hecs::Entity;

use crate::{
    config::RenderConfig,
    world::{Texture, TextureBank, TextureId},
};

pub mod overlay;
pub mod software;

pub use software::Software;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

pub const VERTICAL_WALL_COLOUR: Rgba = 0xFF_AAAAAA;
pub const HORIZONTAL_WALL_COLOUR: Rgba = 0xFF_555555;

/// One fully-resolved draw command for a single frame.
///
/// `column` is the screen column the item is centred on; sprites may sit
/// partly or entirely off-screen. `depth` is the camera-space distance used
/// for sorting: fisheye-corrected for walls, radial for sprites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawItem {
    TexturedWall {
        column: i32,
        depth: f32,
        height: f32,
        texture: TextureId,
        /// Hit coordinate along the wall, `0 ≤ offset < cell_size`.
        offset: f32,
    },
    FlatWall {
        column: i32,
        depth: f32,
        height: f32,
        colour: Rgba,
    },
    Sprite {
        column: i32,
        depth: f32,
        texture: TextureId,
        height: f32,
        entity: Entity,
    },
}

impl DrawItem {
    #[inline]
    pub fn depth(&self) -> f32 {
        match *self {
            DrawItem::TexturedWall { depth, .. }
            | DrawItem::FlatWall { depth, .. }
            | DrawItem::Sprite { depth, .. } => depth,
        }
    }

    #[inline]
    pub fn column(&self) -> i32 {
        match *self {
            DrawItem::TexturedWall { column, .. }
            | DrawItem::FlatWall { column, .. }
            | DrawItem::Sprite { column, .. } => column,
        }
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        !matches!(self, DrawItem::Sprite { .. })
    }
}

/// What to paint into one wall column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WallPaint {
    /// Texture id plus normalised horizontal sample position `u ∈ [0, 1)`.
    Texture { id: TextureId, u: f32 },
    Flat(Rgba),
}

/// One wall column as the back-end sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColumn {
    pub column: i32,
    pub height: f32,
    pub paint: WallPaint,
    /// Alpha of the black overlay drawn on top, `0 ≤ shade ≤ 1`.
    pub shade: f32,
}

/// One billboard quad as the back-end sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteQuad {
    pub column: i32,
    pub size: f32,
    pub texture: TextureId,
    /// Global alpha applied to every opaque texel, `0 ≤ opacity ≤ 1`.
    pub opacity: f32,
}

/// Light reaching depth `d` from the camera's torch, before clamping.
#[inline]
fn falloff(depth: f32, range: f32) -> f32 {
    1.0 - (depth / range).min(1.0)
}

/// Black-overlay alpha for a wall at `depth`.
///
/// `light = intensity · (1 − min(d/range, 1))`, `shade = 1 − light`.
#[inline]
pub fn wall_shade(depth: f32, cfg: &RenderConfig) -> f32 {
    let light = cfg.torch_intensity * falloff(depth, cfg.torch_range);
    (1.0 - light).clamp(0.0, 1.0)
}

/// Opacity of a sprite at `depth`.
///
/// `opacity = gain · (1 − min(d/range, 1))`, with its own gain.
#[inline]
pub fn sprite_opacity(depth: f32, cfg: &RenderConfig) -> f32 {
    (cfg.sprite_light_gain * falloff(depth, cfg.torch_range)).clamp(0.0, 1.0)
}

/// Stable sort, farthest first. NaN depths sort as farthest.
pub fn sort_back_to_front(items: &mut [DrawItem]) {
    items.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Paint one 1-px wall column, vertically centred, then shade it.
    fn draw_wall(&mut self, wall: &WallColumn, bank: &TextureBank);

    /// Paint one billboard centred on its column and the horizon.
    fn draw_sprite(&mut self, sprite: &SpriteQuad, bank: &TextureBank);

    /// Blend black over the whole viewport with `alpha`.
    fn darken(&mut self, alpha: f32);

    /// Solid rectangle, clipped to the viewport.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Rgba);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: Rgba);

    /// Copy `tex` with its top-left at `(x, y)`, skipping transparent texels.
    fn blit(&mut self, tex: &Texture, x: i32, y: i32);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Compositor on top of any [`Renderer`].
pub trait RendererExt: Renderer {
    /// Sort `items` back-to-front and paint them, then apply the ambient
    /// pass. `items` is left in painted order.
    fn composite(&mut self, items: &mut [DrawItem], bank: &TextureBank, cfg: &RenderConfig) {
        sort_back_to_front(items);
        for item in items.iter() {
            match *item {
                DrawItem::TexturedWall {
                    column,
                    depth,
                    height,
                    texture,
                    offset,
                } => self.draw_wall(
                    &WallColumn {
                        column,
                        height,
                        paint: WallPaint::Texture {
                            id: texture,
                            u: offset / cfg.cell_size,
                        },
                        shade: wall_shade(depth, cfg),
                    },
                    bank,
                ),
                DrawItem::FlatWall {
                    column,
                    depth,
                    height,
                    colour,
                } => self.draw_wall(
                    &WallColumn {
                        column,
                        height,
                        paint: WallPaint::Flat(colour),
                        shade: wall_shade(depth, cfg),
                    },
                    bank,
                ),
                DrawItem::Sprite {
                    column,
                    depth,
                    texture,
                    height,
                    ..
                } => self.draw_sprite(
                    &SpriteQuad {
                        column,
                        size: height,
                        texture,
                        opacity: sprite_opacity(depth, cfg),
                    },
                    bank,
                ),
            }
        }
        self.darken(cfg.ambient_alpha);
    }

    /// One-shot frame: clear, composite, submit.
    fn draw_frame<F>(
        &mut self,
        items: &mut [DrawItem],
        bank: &TextureBank,
        cfg: &RenderConfig,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(cfg.width, cfg.height);
        self.composite(items, bank, cfg);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(column: i32, depth: f32) -> DrawItem {
        DrawItem::FlatWall {
            column,
            depth,
            height: 10.0,
            colour: VERTICAL_WALL_COLOUR,
        }
    }

    fn sprite(column: i32, depth: f32) -> DrawItem {
        DrawItem::Sprite {
            column,
            depth,
            texture: 0,
            height: 10.0,
            entity: Entity::DANGLING,
        }
    }

    /// Records what the compositor asked for, in order.
    #[derive(Default)]
    struct Recorder {
        walls: Vec<WallColumn>,
        sprites: Vec<SpriteQuad>,
        order: Vec<&'static str>,
        darkened: Option<f32>,
    }

    impl Renderer for Recorder {
        fn begin_frame(&mut self, _: usize, _: usize) {}
        fn draw_wall(&mut self, wall: &WallColumn, _: &TextureBank) {
            self.walls.push(*wall);
            self.order.push("wall");
        }
        fn draw_sprite(&mut self, sprite: &SpriteQuad, _: &TextureBank) {
            self.sprites.push(*sprite);
            self.order.push("sprite");
        }
        fn darken(&mut self, alpha: f32) {
            self.darkened = Some(alpha);
            self.order.push("ambient");
        }
        fn fill_rect(&mut self, _: i32, _: i32, _: i32, _: i32, _: Rgba) {}
        fn draw_line(&mut self, _: i32, _: i32, _: i32, _: i32, _: Rgba) {}
        fn blit(&mut self, _: &Texture, _: i32, _: i32) {}
        fn end_frame<F>(&mut self, submit: F)
        where
            F: FnOnce(&[Rgba], usize, usize),
        {
            submit(&[], 0, 0);
        }
    }

    #[test]
    fn sort_is_farthest_first_and_stable() {
        let mut items = vec![wall(0, 5.0), sprite(1, 9.0), wall(2, 5.0), sprite(3, 1.0)];
        sort_back_to_front(&mut items);
        let cols: Vec<i32> = items.iter().map(DrawItem::column).collect();
        // equal depths keep their input order (0 before 2)
        assert_eq!(cols, vec![1, 0, 2, 3]);
    }

    #[test]
    fn composite_paints_far_to_near_then_ambient() {
        let cfg = RenderConfig::default();
        let bank = TextureBank::new();
        let mut items = vec![sprite(4, 10.0), wall(4, 50.0), sprite(4, 80.0)];
        let mut rec = Recorder::default();
        rec.composite(&mut items, &bank, &cfg);

        assert_eq!(rec.order, vec!["sprite", "wall", "sprite", "ambient"]);
        assert_eq!(rec.darkened, Some(cfg.ambient_alpha));
        // painted order is left in the slice
        assert!(items.windows(2).all(|w| w[0].depth() >= w[1].depth()));
    }

    #[test]
    fn textured_offset_is_normalised_by_cell() {
        let cfg = RenderConfig::default();
        let mut items = vec![DrawItem::TexturedWall {
            column: 0,
            depth: 1.0,
            height: 5.0,
            texture: 3,
            offset: cfg.cell_size / 4.0,
        }];
        let mut rec = Recorder::default();
        rec.composite(&mut items, &TextureBank::new(), &cfg);
        match rec.walls[0].paint {
            WallPaint::Texture { id, u } => {
                assert_eq!(id, 3);
                assert!((u - 0.25).abs() < 1e-6);
            }
            WallPaint::Flat(_) => panic!("expected textured paint"),
        }
    }

    #[test]
    fn wall_and_sprite_lighting_differ() {
        let cfg = RenderConfig::default();
        // at the camera: walls fully lit, sprites fully opaque
        assert_eq!(wall_shade(0.0, &cfg), 0.0);
        assert_eq!(sprite_opacity(0.0, &cfg), 1.0);
        // beyond torch range: walls black, sprites invisible
        assert_eq!(wall_shade(cfg.torch_range * 2.0, &cfg), 1.0);
        assert_eq!(sprite_opacity(cfg.torch_range * 2.0, &cfg), 0.0);
        // halfway the two channels disagree: gain 2.4 keeps sprites opaque
        let half = cfg.torch_range * 0.5;
        let expected_shade = 1.0 - cfg.torch_intensity * 0.5;
        assert!((wall_shade(half, &cfg) - expected_shade).abs() < 1e-6);
        assert_eq!(sprite_opacity(half, &cfg), 1.0);
    }
}
