//! ---------------------------------------------------------------------------
//! Software (CPU) column renderer
//!
//! * Fills an internal `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Relies on the compositor to feed items *back-to-front*, so no Z-buffer
//!   is needed: nearer columns and sprites simply overwrite farther ones.
//! ---------------------------------------------------------------------------

use crate::{
    renderer::{Renderer, Rgba, SpriteQuad, WallColumn, WallPaint},
    world::{Texture, TextureBank},
};

/// Upper half of the cleared frame.
pub const CEILING_COLOUR: Rgba = 0xFF_383838;
/// Lower half of the cleared frame.
pub const FLOOR_COLOUR: Rgba = 0xFF_5A5046;
/// Painted when a wall id has no texture in the bank.
pub const MISSING_WALL_COLOUR: Rgba = 0xFF_808080;

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Software {
    pub scratch: Vec<Rgba>,
    pub width: usize,
    pub height: usize,
    pub half_h: f32,
}

/*──────────────────────── pixel helpers ──────────────────────────────*/

/// Scale every colour channel by `k ∈ [0, 1]`, keeping alpha opaque.
#[inline]
fn scale_rgb(px: Rgba, k: f32) -> Rgba {
    let ch = |shift: u32| (((px >> shift) & 0xFF) as f32 * k) as u32;
    0xFF_000000 | (ch(16) << 16) | (ch(8) << 8) | ch(0)
}

/// `dst · (1 − a) + src · a` per channel.
#[inline]
fn blend(dst: Rgba, src: Rgba, a: f32) -> Rgba {
    let ch = |shift: u32| {
        let d = ((dst >> shift) & 0xFF) as f32;
        let s = ((src >> shift) & 0xFF) as f32;
        (d + (s - d) * a) as u32
    };
    0xFF_000000 | (ch(16) << 16) | (ch(8) << 8) | ch(0)
}

#[inline]
fn is_transparent(px: Rgba) -> bool {
    px >> 24 == 0
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.half_h = h as f32 * 0.5;
            self.scratch.resize(w * h, 0);
        }
        let horizon = (h / 2) * w;
        self.scratch[..horizon].fill(CEILING_COLOUR);
        self.scratch[horizon..].fill(FLOOR_COLOUR);
    }

    fn draw_wall(&mut self, wall: &WallColumn, bank: &TextureBank) {
        if wall.column < 0 || wall.column >= self.width as i32 || !(wall.height > 0.0) {
            return;
        }
        let col = wall.column as usize;
        let top = self.half_h - wall.height * 0.5;
        let y0 = top.max(0.0) as usize;
        let y1 = (self.half_h + wall.height * 0.5).min(self.height as f32) as usize;
        let keep = 1.0 - wall.shade;

        let tex = match wall.paint {
            WallPaint::Texture { id, u } => match bank.wall(id) {
                Ok(tex) => Some((tex, u.clamp(0.0, 1.0))),
                Err(err) => {
                    tracing::trace!(%err, "wall texture fallback");
                    None
                }
            },
            WallPaint::Flat(_) => None,
        };

        match (tex, wall.paint) {
            (Some((tex, u)), _) => {
                let v_step = tex.h as f32 / wall.height;
                for y in y0..y1 {
                    let v = ((y as f32 - top) * v_step) as usize;
                    let texel = tex.texel(u, v);
                    self.scratch[y * self.width + col] = scale_rgb(texel, keep);
                }
            }
            (None, paint) => {
                let colour = match paint {
                    WallPaint::Flat(c) => c,
                    WallPaint::Texture { .. } => MISSING_WALL_COLOUR,
                };
                let shaded = scale_rgb(colour, keep);
                for y in y0..y1 {
                    self.scratch[y * self.width + col] = shaded;
                }
            }
        }
    }

    fn draw_sprite(&mut self, sprite: &SpriteQuad, bank: &TextureBank) {
        let tex = match bank.sprite(sprite.texture) {
            Ok(tex) => tex,
            Err(err) => {
                tracing::trace!(%err, "sprite skipped");
                return;
            }
        };
        let size = sprite.size;
        if !(size >= 1.0) || sprite.opacity <= 0.0 {
            return;
        }

        let left = sprite.column as f32 - size * 0.5;
        let top = self.half_h - size * 0.5;
        let x0 = left.max(0.0) as i32;
        let x1 = (left + size).min(self.width as f32) as i32;
        let y0 = top.max(0.0) as i32;
        let y1 = (top + size).min(self.height as f32) as i32;
        let step = tex.w.max(tex.h) as f32 / size;

        for x in x0..x1 {
            let u = ((x as f32 - left) * step) as usize;
            if u >= tex.w {
                continue;
            }
            for y in y0..y1 {
                let v = ((y as f32 - top) * step) as usize;
                if v >= tex.h {
                    break;
                }
                let texel = tex.pixels[v * tex.w + u];
                if is_transparent(texel) {
                    continue;
                }
                let idx = y as usize * self.width + x as usize;
                self.scratch[idx] = blend(self.scratch[idx], texel, sprite.opacity);
            }
        }
    }

    fn darken(&mut self, alpha: f32) {
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for px in &mut self.scratch {
            *px = scale_rgb(*px, keep);
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for yy in y0..y1 {
            let row = yy as usize * self.width;
            for xx in x0..x1 {
                self.scratch[row + xx as usize] = colour;
            }
        }
    }

    /// Integer Bresenham line-drawing algorithm.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: Rgba) {
        let mut x0 = x0;
        let mut y0 = y0;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if (0..self.width as i32).contains(&x0) && (0..self.height as i32).contains(&y0) {
                self.scratch[y0 as usize * self.width + x0 as usize] = colour;
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn blit(&mut self, tex: &Texture, x: i32, y: i32) {
        for ty in 0..tex.h {
            let sy = y + ty as i32;
            if !(0..self.height as i32).contains(&sy) {
                continue;
            }
            for tx in 0..tex.w {
                let sx = x + tx as i32;
                let texel = tex.pixels[ty * tex.w + tx];
                if is_transparent(texel) || !(0..self.width as i32).contains(&sx) {
                    continue;
                }
                self.scratch[sy as usize * self.width + sx as usize] = texel;
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

impl Software {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.scratch[y * self.width + x]
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
