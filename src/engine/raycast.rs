//! Ray/grid intersection.
//!
//! A ray is probed against the two families of grid lines separately:
//! the *vertical* lines `x = k·cell` and the *horizontal* lines
//! `y = k·cell`. Each scan steps one grid line at a time (DDA) and stops at
//! the first solid cell, after `size` lines, or when it leaves the grid.
//! The caller keeps whichever family hit nearer.
//!
//! Ray direction convention is `(sin a, cos a)`.

use glam::Vec2;

use crate::world::{Probe, TextureId, TileGrid};

/// Which family of grid lines an intersection lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Lines of constant x; the wall face runs along y.
    Vertical,
    /// Lines of constant y; the wall face runs along x.
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayIntersection {
    pub point: Vec2,
    /// Distance along the ray; `INFINITY` when nothing was hit.
    pub depth: f32,
    /// Cell code of the wall hit, 0 when nothing was hit.
    pub texture: TextureId,
    pub axis: Axis,
}

impl RayIntersection {
    #[inline]
    pub fn miss(axis: Axis) -> Self {
        Self {
            point: Vec2::ZERO,
            depth: f32::INFINITY,
            texture: 0,
            axis,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.depth.is_finite()
    }

    /// Where along the wall face the ray landed, `0 ≤ offset < cell`.
    ///
    /// Taken from the hit point's coordinate *across* the ray's stepping
    /// axis, never from the depth.
    #[inline]
    pub fn texture_offset(&self, cell_size: f32) -> f32 {
        let along = match self.axis {
            Axis::Vertical => self.point.y,
            Axis::Horizontal => self.point.x,
        };
        let off = along.rem_euclid(cell_size);
        if off >= cell_size { 0.0 } else { off }
    }
}

/// Scan the vertical grid lines along the ray `(sin, cos)`.
pub fn cast_vertical(
    grid: &TileGrid,
    cell_size: f32,
    origin: Vec2,
    sin: f32,
    cos: f32,
) -> RayIntersection {
    scan(grid, cell_size, origin, Axis::Vertical, sin, cos)
}

/// Scan the horizontal grid lines along the ray `(sin, cos)`.
pub fn cast_horizontal(
    grid: &TileGrid,
    cell_size: f32,
    origin: Vec2,
    sin: f32,
    cos: f32,
) -> RayIntersection {
    scan(grid, cell_size, origin, Axis::Horizontal, sin, cos)
}

/// Both scans plus the nearer of the two.
#[derive(Clone, Copy, Debug)]
pub struct RayCast {
    pub vertical: RayIntersection,
    pub horizontal: RayIntersection,
}

impl RayCast {
    pub fn new(grid: &TileGrid, cell_size: f32, origin: Vec2, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            vertical: cast_vertical(grid, cell_size, origin, sin, cos),
            horizontal: cast_horizontal(grid, cell_size, origin, sin, cos),
        }
    }

    /// The vertical hit wins only when strictly nearer; ties go to the
    /// horizontal family. `None` when neither family hit anything.
    pub fn nearest(&self) -> Option<RayIntersection> {
        let pick = if self.vertical.depth < self.horizontal.depth {
            self.vertical
        } else {
            self.horizontal
        };
        pick.is_hit().then_some(pick)
    }
}

/// Shared DDA loop. `main` is the coordinate stepped one cell at a time,
/// `cross` the one solved from the slope.
fn scan(
    grid: &TileGrid,
    cell_size: f32,
    origin: Vec2,
    axis: Axis,
    sin: f32,
    cos: f32,
) -> RayIntersection {
    let (main0, cross0, d_main, d_cross) = match axis {
        Axis::Vertical => (origin.x, origin.y, sin, cos),
        Axis::Horizontal => (origin.y, origin.x, cos, sin),
    };

    // Grid lines are tracked by integer index; `line` is always rebuilt
    // from it so the probed cell never drifts with accumulated error.
    let step: i64 = if d_main > 0.0 { 1 } else { -1 };
    let mut idx = (main0 / cell_size).floor() as i64;
    if step > 0 {
        idx += 1;
    }

    for _ in 0..grid.size() {
        let line = idx as f32 * cell_size;
        // `abs` folds the -0.0 of an origin sitting exactly on the line
        let depth = ((line - main0) / d_main).abs();
        // ray parallel to this family: no crossing at all
        if !depth.is_finite() {
            break;
        }
        let cross = cross0 + depth * d_cross;

        let main_idx = if step < 0 { idx - 1 } else { idx };
        let cross_idx = (cross / cell_size).floor() as i64;

        let (col, row, point) = match axis {
            Axis::Vertical => (main_idx, cross_idx, Vec2::new(line, cross)),
            Axis::Horizontal => (cross_idx, main_idx, Vec2::new(cross, line)),
        };

        match grid.probe(col, row) {
            Probe::Outside => break,
            Probe::Wall(texture) => {
                return RayIntersection {
                    point,
                    depth,
                    texture,
                    axis,
                };
            }
            Probe::Empty => {}
        }
        idx += step;
    }
    RayIntersection::miss(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::EMPTY;
    use std::f32::consts::{FRAC_PI_2, PI};

    const CELL: f32 = 64.0;

    fn room() -> TileGrid {
        // 8×8, border id 1, one pillar id 3 at (5, 2)
        let mut g = TileGrid::bordered(8, 1).unwrap();
        g.set(5, 2, 3);
        g
    }

    fn centre(col: usize, row: usize) -> Vec2 {
        Vec2::new((col as f32 + 0.5) * CELL, (row as f32 + 0.5) * CELL)
    }

    #[test]
    fn straight_into_adjacent_wall_each_direction() {
        let g = room();
        let pos = centre(1, 1);
        // +Y, +X, −Y, −X
        for (angle, tex) in [(0.0, 1), (FRAC_PI_2, 1), (PI, 1), (-FRAC_PI_2, 1)] {
            let hit = RayCast::new(&g, CELL, pos, angle).nearest();
            if angle == 0.0 || angle == FRAC_PI_2 {
                // facing the interior: far wall
                assert!(hit.unwrap().depth > CELL);
            } else {
                let hit = hit.unwrap();
                assert!(hit.depth <= CELL, "angle {angle}: depth {}", hit.depth);
                assert!((hit.depth - CELL * 0.5).abs() < 1e-3);
                assert_eq!(hit.texture, tex);
            }
        }
    }

    #[test]
    fn pillar_texture_is_reported() {
        let g = room();
        // from (5, 4) looking toward −Y reaches the pillar at (5, 2)
        let hit = RayCast::new(&g, CELL, centre(5, 4), PI).nearest().unwrap();
        assert_eq!(hit.texture, 3);
        assert_eq!(hit.axis, Axis::Horizontal);
        assert!((hit.depth - 1.5 * CELL).abs() < 1e-2);
    }

    #[test]
    fn empty_grid_misses_both_families() {
        let g = TileGrid::new(4, vec![EMPTY; 16]).unwrap();
        let cast = RayCast::new(&g, CELL, centre(1, 1), 0.3);
        assert_eq!(cast.vertical.depth, f32::INFINITY);
        assert_eq!(cast.horizontal.depth, f32::INFINITY);
        assert_eq!(cast.vertical.texture, 0);
        assert!(cast.nearest().is_none());
    }

    #[test]
    fn axis_parallel_ray_does_not_panic() {
        let g = room();
        let pos = centre(3, 3);
        // sin = 0 exactly: vertical family never crosses
        let v = cast_vertical(&g, CELL, pos, 0.0, 1.0);
        assert!(!v.is_hit());
        let h = cast_horizontal(&g, CELL, pos, 0.0, 1.0);
        assert!(h.is_hit());
        // same with a grid-aligned origin (0 / 0)
        let on_line = Vec2::new(3.0 * CELL, 3.5 * CELL);
        assert!(!cast_vertical(&g, CELL, on_line, 0.0, 1.0).is_hit());
        assert!(!cast_vertical(&g, CELL, on_line, -0.0, -1.0).is_hit());
    }

    #[test]
    fn tie_goes_to_horizontal() {
        let g = room();
        let cast = RayCast {
            vertical: RayIntersection {
                point: Vec2::ZERO,
                depth: 10.0,
                texture: 1,
                axis: Axis::Vertical,
            },
            horizontal: RayIntersection {
                point: Vec2::ZERO,
                depth: 10.0,
                texture: 2,
                axis: Axis::Horizontal,
            },
        };
        assert_eq!(cast.nearest().unwrap().axis, Axis::Horizontal);
        // and a genuine diagonal into a corner resolves without panicking
        let corner = RayCast::new(&g, CELL, centre(1, 1), -3.0 * PI / 4.0);
        assert!(corner.nearest().is_some());
    }

    #[test]
    fn texture_offset_uses_hit_point() {
        let g = room();
        // looking +X from an off-centre spot: vertical family, offset = y mod cell
        let pos = Vec2::new(2.5 * CELL, 3.0 * CELL + 10.0);
        let hit = RayCast::new(&g, CELL, pos, FRAC_PI_2).nearest().unwrap();
        assert_eq!(hit.axis, Axis::Vertical);
        assert!((hit.texture_offset(CELL) - 10.0).abs() < 1e-2);

        let neg = RayIntersection {
            point: Vec2::new(-1.0, 0.0),
            depth: 1.0,
            texture: 1,
            axis: Axis::Horizontal,
        };
        assert!((neg.texture_offset(CELL) - (CELL - 1.0)).abs() < 1e-4);
    }

    #[test]
    fn scan_stops_at_grid_edge_without_border() {
        // open-ended corridor: ray leaves the grid before any wall
        let mut g = TileGrid::new(4, vec![EMPTY; 16]).unwrap();
        g.set(0, 0, 2);
        let cast = RayCast::new(&g, CELL, centre(2, 2), 0.0);
        assert!(cast.nearest().is_none());
    }

    #[test]
    fn fractional_cell_sizes_match_the_reference_scale() {
        let g = TileGrid::bordered(8, 1).unwrap();
        let cast = |cell: f32, deg: i32| {
            let pos = Vec2::splat(4.5 * cell);
            RayCast::new(&g, cell, pos, (deg as f32).to_radians()).nearest()
        };
        for cell in [0.3, 0.7, 1.1, 3.3, 100.7] {
            for deg in 0..360 {
                let want = cast(CELL, deg).unwrap();
                let got = cast(cell, deg)
                    .unwrap_or_else(|| panic!("cell {cell} deg {deg}: no wall"));
                assert_eq!(got.texture, want.texture, "cell {cell} deg {deg}");
                let (a, b) = (got.depth / cell, want.depth / CELL);
                assert!((a - b).abs() < 1e-3, "cell {cell} deg {deg}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn straight_ray_in_small_cells_finds_the_border() {
        let g = TileGrid::bordered(9, 1).unwrap();
        let hit = RayCast::new(&g, 1.1, Vec2::splat(4.95), FRAC_PI_2)
            .nearest()
            .unwrap();
        assert_eq!(hit.axis, Axis::Vertical);
        // border face at x = 8 · 1.1
        assert!((hit.depth - (8.0 * 1.1 - 4.95)).abs() < 1e-4, "{}", hit.depth);
    }

    #[test]
    fn origin_on_a_wall_face_reports_zero_depth() {
        let g = room();
        let v = cast_vertical(&g, CELL, Vec2::new(CELL, 3.5 * CELL), -1.0, 0.0);
        assert!(v.is_hit());
        assert_eq!(v.depth, 0.0);
        assert!(v.depth.is_sign_positive());
    }
}
