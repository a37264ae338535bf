use crate::config::RenderConfig;

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_h: f32, // pre-derived for speed
    pub half_w: f32, // pre-derived for speed
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_w: w as f32 * 0.5,
            half_h: h as f32 * 0.5,
        }
    }
}

/// Angular layout of the view cone, reused by walls and sprites.
#[derive(Clone, Copy, Debug)]
pub struct View {
    pub columns: usize,
    pub fov: f32,
    pub half_fov: f32,
    /// Radians between two neighbouring columns (`fov / columns`).
    pub step: f32,
    /// Column a sprite dead ahead lands on (`columns/2 − 1`).
    pub central_column: f32,
}

impl View {
    pub fn new(columns: usize, fov: f32) -> Self {
        Self {
            columns,
            fov,
            half_fov: fov * 0.5,
            step: fov / columns as f32,
            central_column: (columns / 2) as f32 - 1.0,
        }
    }

    pub fn from_config(cfg: &RenderConfig) -> Self {
        Self::new(cfg.width, cfg.fov)
    }

    /// World angle of the ray through `column`; sweeps left → right.
    #[inline]
    pub fn ray_angle(&self, heading: f32, column: usize) -> f32 {
        heading + self.half_fov - column as f32 * self.step
    }
}
