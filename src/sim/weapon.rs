//! Melee weapon animation.
//!
//! A swing plays the frames forward to the last one, where the blow lands,
//! then back down to frame 0 and idles. Frames advance on a fixed interval
//! independent of the render rate.

use crate::world::TextureId;

pub const FRAME_INTERVAL: f32 = 1.0 / 25.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponState {
    Idle,
    /// `rising` flips once at the last frame.
    Swing { frame: TextureId, rising: bool },
}

/// Emitted by [`Weapon::advance`] on the frame the blow connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponEvent {
    Impact,
}

#[derive(Clone, Debug)]
pub struct Weapon {
    state: WeaponState,
    frames: TextureId,
    acc: f32,
}

impl Weapon {
    pub fn new(frames: usize) -> Self {
        Self {
            state: WeaponState::Idle,
            frames: frames.min(TextureId::MAX as usize) as TextureId,
            acc: 0.0,
        }
    }

    #[inline]
    pub fn state(&self) -> WeaponState {
        self.state
    }

    /// Frame the HUD should draw.
    #[inline]
    pub fn frame(&self) -> TextureId {
        match self.state {
            WeaponState::Idle => 0,
            WeaponState::Swing { frame, .. } => frame,
        }
    }

    /// Start a swing. Ignored while one is already playing.
    pub fn trigger(&mut self) -> bool {
        if self.state != WeaponState::Idle || self.frames < 2 {
            return false;
        }
        self.state = WeaponState::Swing {
            frame: 0,
            rising: true,
        };
        self.acc = 0.0;
        true
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> Option<WeaponEvent> {
        if self.state == WeaponState::Idle {
            return None;
        }
        self.acc += dt.max(0.0);
        let mut event = None;
        while self.acc >= FRAME_INTERVAL {
            self.acc -= FRAME_INTERVAL;
            if self.step() {
                event = Some(WeaponEvent::Impact);
            }
            if self.state == WeaponState::Idle {
                self.acc = 0.0;
                break;
            }
        }
        event
    }

    /// One frame of the ping-pong; true when the last frame is reached.
    fn step(&mut self) -> bool {
        let last = self.frames - 1;
        let WeaponState::Swing { frame, rising } = self.state else {
            return false;
        };
        let peak = rising && frame + 1 >= last;
        self.state = match (rising, frame) {
            (true, f) if f + 1 >= last => WeaponState::Swing {
                frame: last,
                rising: false,
            },
            (true, f) => WeaponState::Swing {
                frame: f + 1,
                rising: true,
            },
            (false, 0) | (false, 1) => WeaponState::Idle,
            (false, f) => WeaponState::Swing {
                frame: f - 1,
                rising: false,
            },
        };
        peak
    }
}
