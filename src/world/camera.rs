use glam::Vec2;

use crate::world::angle::{direction, wrap_pi, wrap_tau};

/// Player view-point in world space.
///
/// * Only **yaw** (heading) exists – the grid has a single wall height.
/// * `heading` is kept in `[0, 2π)`; 0 looks toward +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub pos: Vec2, // world units, same scale as the grid cell size
    heading: f32,
}

impl CameraPose {
    pub fn new(pos: Vec2, heading: f32) -> Self {
        Self {
            pos,
            heading: wrap_tau(heading),
        }
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn set_heading(&mut self, heading: f32) {
        self.heading = wrap_tau(heading);
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        direction(self.heading)
    }

    /// Unit vector toward the right-hand edge of the screen.
    ///
    /// Column angles decrease left → right, so this is `forward` rotated
    /// by −π/2: `(x, y) -> (−y, x)`.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        self.forward().perp()
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Rotate by `delta` radians (positive = toward the left screen edge).
    pub fn turn(&mut self, delta: f32) {
        self.heading = wrap_tau(self.heading + delta);
    }

    /// Angle of world point `p` relative to the heading, in `(−π, π]`.
    ///
    /// Positive means left of centre.
    #[inline]
    pub fn relative_angle(&self, p: Vec2) -> f32 {
        let d = p - self.pos;
        wrap_pi(d.x.atan2(d.y) - self.heading)
    }
}
