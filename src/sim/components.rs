use bitflags::bitflags;
use glam::Vec2;

use crate::world::TextureId;

/// World-space position on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Drawn as a camera-facing sprite with this texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Billboard {
    pub texture: TextureId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub hp: u8,
    pub max: u8,
}

impl Health {
    pub const fn full(max: u8) -> Self {
        Self { hp: max, max }
    }

    /// Damage frame to show: 0 while untouched, one more per lost point.
    #[inline]
    pub fn frame(&self) -> TextureId {
        (self.max - self.hp.min(self.max)) as TextureId
    }
}

/// Ignores strikes while `secs > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invincible {
    pub secs: f32,
}

/// Residual push velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Knockback(pub Vec2);

bitflags! {
    /// Edge-triggered buttons sampled once per frame.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const FIRE       = 0x01;
        const TOGGLE_MAP = 0x02;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (right / left)
    pub look_dx: f32, // pointer pixels, positive turns left
    pub buttons: Buttons,
}

impl InputCmd {
    #[inline]
    pub fn fire(&self) -> bool {
        self.buttons.contains(Buttons::FIRE)
    }

    #[inline]
    pub fn toggle_map(&self) -> bool {
        self.buttons.contains(Buttons::TOGGLE_MAP)
    }
}
