// Format-agnostic repository of textures.
// The renderer and world logic interact through `TextureId` only; decoding
// image files is the job of an outside loader.

use crate::renderer::Rgba;

/// Runtime handle for a texture in one of the bank's tables.
///
/// Wall ids are the grid cell codes themselves (`1..`), sprite and weapon
/// ids are zero-based frame indices.
pub type TextureId = u16;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
/// Alpha 0 marks a transparent texel (sprites, weapon frames).
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        Texture::checker("CHECKER", 8, 0xFF_A0A0A0, 0xFF_404040)
    }
}

impl Texture {
    pub fn solid(name: &str, w: usize, h: usize, colour: Rgba) -> Self {
        Texture {
            name: name.to_string(),
            w,
            h,
            pixels: vec![colour; w * h],
        }
    }

    pub fn checker(name: &str, side: usize, light: Rgba, dark: Rgba) -> Self {
        let mut pixels = vec![0; side * side];
        for y in 0..side {
            for x in 0..side {
                pixels[y * side + x] = if (x ^ y) & 1 == 0 { light } else { dark };
            }
        }
        Texture {
            name: name.to_string(),
            w: side,
            h: side,
            pixels,
        }
    }

    /// Running-bond brick pattern on a 64×64 tile.
    pub fn bricks(name: &str, brick: Rgba, mortar: Rgba) -> Self {
        const SIDE: usize = 64;
        const ROW_H: usize = 16;
        const BRICK_W: usize = 32;
        let mut pixels = vec![brick; SIDE * SIDE];
        for y in 0..SIDE {
            let row = y / ROW_H;
            let shift = if row % 2 == 0 { 0 } else { BRICK_W / 2 };
            for x in 0..SIDE {
                let horizontal_joint = y % ROW_H == 0;
                let vertical_joint = (x + shift) % BRICK_W == 0;
                if horizontal_joint || vertical_joint {
                    pixels[y * SIDE + x] = mortar;
                }
            }
        }
        Texture {
            name: name.to_string(),
            w: SIDE,
            h: SIDE,
            pixels,
        }
    }

    /// Vertical planks, alternating two tones.
    pub fn planks(name: &str, a: Rgba, b: Rgba) -> Self {
        const SIDE: usize = 64;
        let mut pixels = vec![0; SIDE * SIDE];
        for y in 0..SIDE {
            for x in 0..SIDE {
                let plank = x / 8;
                pixels[y * SIDE + x] = if x % 8 == 0 {
                    0xFF_201008
                } else if plank % 2 == 0 {
                    a
                } else {
                    b
                };
            }
        }
        Texture {
            name: name.to_string(),
            w: SIDE,
            h: SIDE,
            pixels,
        }
    }

    /// Upright barrel silhouette on a transparent background.
    /// `dents` carves notches into the rim, one per damage stage.
    pub fn barrel(name: &str, body: Rgba, band: Rgba, dents: usize) -> Self {
        const SIDE: usize = 32;
        let mut pixels = vec![0; SIDE * SIDE];
        for y in 4..SIDE {
            let bulge = if (10..26).contains(&y) { 1 } else { 0 };
            for x in (7 - bulge)..(25 + bulge) {
                let colour = if y == 9 || y == 26 { band } else { body };
                pixels[y * SIDE + x] = colour;
            }
        }
        for d in 0..dents.min(4) {
            let x0 = 8 + d * 4;
            for y in 4..(8 + d * 2) {
                for x in x0..(x0 + 3) {
                    pixels[y * SIDE + x] = 0;
                }
            }
        }
        Texture {
            name: name.to_string(),
            w: SIDE,
            h: SIDE,
            pixels,
        }
    }

    /// Crowbar-ish weapon frame; `swing` (0‥) tilts the shaft left.
    pub fn weapon(name: &str, swing: usize) -> Self {
        const W: usize = 48;
        const H: usize = 48;
        let mut pixels = vec![0; W * H];
        let tilt = swing as i32 * 3;
        for y in 8..H {
            let cx = 30 - tilt + (H - y) as i32 * tilt / 40;
            for dx in -2..=2 {
                let x = cx + dx;
                if (0..W as i32).contains(&x) {
                    pixels[y * W + x as usize] = if dx.abs() == 2 {
                        0xFF_3A1010
                    } else {
                        0xFF_C02020
                    };
                }
            }
        }
        Texture {
            name: name.to_string(),
            w: W,
            h: H,
            pixels,
        }
    }

    /// Texel at normalised `u ∈ [0, 1)` and integer row `v`, clamped.
    #[inline]
    pub fn texel(&self, u: f32, v: usize) -> Rgba {
        let x = ((u * self.w as f32) as usize).min(self.w - 1);
        self.pixels[v.min(self.h - 1) * self.w + x]
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Wall id 0 means "no wall"; anything past the table is unknown.
    #[error("wall texture id {0} out of range")]
    BadWall(TextureId),

    #[error("sprite texture id {0} out of range")]
    BadSprite(TextureId),

    #[error("weapon frame {0} out of range")]
    BadWeaponFrame(TextureId),

    #[error("texture `{0}` has zero size")]
    Empty(String),
}

/// Read-only lookup tables filled once at level load.
///
/// * Walls are addressed by grid cell code, **1-based**.
/// * Sprites and weapon frames are zero-based.
///
/// **Thread-safety:** access `TextureBank` from a single thread; nothing
/// mutates it after startup.
#[derive(Default)]
pub struct TextureBank {
    walls: Vec<Texture>,
    sprites: Vec<Texture>,
    weapon: Vec<Texture>,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    /// Procedural stand-ins for the art the host would normally decode:
    /// five wall ids, four barrel damage frames, five weapon frames.
    pub fn builtin() -> Self {
        let mut bank = Self::new();
        let walls = [
            Texture::bricks("RED_BRICK", 0xFF_8C2A1E, 0xFF_B0A898),
            Texture::bricks("GREY_BRICK", 0xFF_6E6E78, 0xFF_2C2C30),
            Texture::planks("WOOD", 0xFF_7A5230, 0xFF_6A4424),
            Texture::bricks("MOSS_STONE", 0xFF_4F6A3A, 0xFF_303828),
            Texture::checker("TILE", 8, 0xFF_9A9A80, 0xFF_5C5C48),
        ];
        for tex in walls {
            // builtin textures are never empty
            let _ = bank.insert_wall(tex);
        }
        for dents in 0..4 {
            let _ = bank.insert_sprite(Texture::barrel(
                &format!("BARREL{dents}"),
                0xFF_3C6E3C,
                0xFF_22331E,
                dents,
            ));
        }
        for swing in 0..5 {
            let _ = bank.insert_weapon_frame(Texture::weapon(&format!("CROWBAR{swing}"), swing));
        }
        bank
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn weapon_frames(&self) -> usize {
        self.weapon.len()
    }

    /// Borrow the wall texture for grid code `id`.
    pub fn wall(&self, id: TextureId) -> Result<&Texture, TextureError> {
        (id as usize)
            .checked_sub(1)
            .and_then(|i| self.walls.get(i))
            .ok_or(TextureError::BadWall(id))
    }

    pub fn sprite(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.sprites
            .get(id as usize)
            .ok_or(TextureError::BadSprite(id))
    }

    pub fn weapon_frame(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.weapon
            .get(id as usize)
            .ok_or(TextureError::BadWeaponFrame(id))
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Append a wall texture; returns the grid code that selects it.
    pub fn insert_wall(&mut self, tex: Texture) -> Result<TextureId, TextureError> {
        Self::check(&tex)?;
        self.walls.push(tex);
        Ok(self.walls.len() as TextureId)
    }

    pub fn insert_sprite(&mut self, tex: Texture) -> Result<TextureId, TextureError> {
        Self::check(&tex)?;
        self.sprites.push(tex);
        Ok((self.sprites.len() - 1) as TextureId)
    }

    pub fn insert_weapon_frame(&mut self, tex: Texture) -> Result<TextureId, TextureError> {
        Self::check(&tex)?;
        self.weapon.push(tex);
        Ok((self.weapon.len() - 1) as TextureId)
    }

    fn check(tex: &Texture) -> Result<(), TextureError> {
        if tex.w == 0 || tex.h == 0 || tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::Empty(tex.name.clone()));
        }
        Ok(())
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(colour: Rgba) -> Texture {
        Texture::solid("Dummy", 2, 2, colour)
    }

    #[test]
    fn walls_are_one_based() {
        let mut bank = TextureBank::new();
        let red = bank.insert_wall(dummy_tex(0xFF_FF0000)).unwrap();
        let blue = bank.insert_wall(dummy_tex(0xFF_0000FF)).unwrap();

        assert_eq!(red, 1);
        assert_eq!(blue, 2);
        assert_eq!(bank.wall(1).unwrap().pixels[0], 0xFF_FF0000);
        assert_eq!(bank.wall(2).unwrap().pixels[0], 0xFF_0000FF);
        assert_eq!(bank.wall(0).unwrap_err(), TextureError::BadWall(0));
        assert_eq!(bank.wall(3).unwrap_err(), TextureError::BadWall(3));
    }

    #[test]
    fn sprites_are_zero_based() {
        let mut bank = TextureBank::new();
        assert_eq!(bank.insert_sprite(dummy_tex(1)).unwrap(), 0);
        assert!(bank.sprite(0).is_ok());
        assert_eq!(bank.sprite(1).unwrap_err(), TextureError::BadSprite(1));
    }

    #[test]
    fn empty_texture_rejected() {
        let mut bank = TextureBank::new();
        let err = bank
            .insert_wall(Texture::solid("NOPE", 0, 4, 0))
            .unwrap_err();
        assert_eq!(err, TextureError::Empty("NOPE".into()));
        assert_eq!(bank.wall_count(), 0);
    }

    #[test]
    fn builtin_bank_is_populated() {
        let bank = TextureBank::builtin();
        assert_eq!(bank.wall_count(), 5);
        assert_eq!(bank.sprite_count(), 4);
        assert_eq!(bank.weapon_frames(), 5);
        // barrel frames have transparent corners
        assert_eq!(bank.sprite(0).unwrap().pixels[0] >> 24, 0);
    }

    #[test]
    fn texel_clamps_u() {
        let tex = Texture::checker("C", 2, 1, 2);
        assert_eq!(tex.texel(0.0, 0), 1);
        assert_eq!(tex.texel(0.99, 0), 2);
        assert_eq!(tex.texel(1.0, 0), 2);
        assert_eq!(tex.texel(0.0, 9), 2);
    }
}
