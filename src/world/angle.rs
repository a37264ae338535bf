//! Angle normalisation shared by the camera, the ray caster and the
//! billboard projection.
//!
//! * Headings are **stored** in `[0, 2π)`.
//! * Angles *relative* to the heading are re-centred to `(−π, π]`.

use std::f32::consts::{PI, TAU};

/// Wrap `angle` into `[0, 2π)`.
#[inline]
pub fn wrap_tau(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Wrap `angle` into `(−π, π]`.
#[inline]
pub fn wrap_pi(angle: f32) -> f32 {
    let a = wrap_tau(angle);
    if a > PI { a - TAU } else { a }
}

/// Unit direction for `angle` in world space.
///
/// Angle 0 looks toward +Y, angle π/2 toward +X:
/// `dir = (sin a, cos a)`.
#[inline]
pub fn direction(angle: f32) -> glam::Vec2 {
    let (s, c) = angle.sin_cos();
    glam::Vec2::new(s, c)
}
