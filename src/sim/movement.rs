//! Player kinematics: yaw, then per-axis sliding movement.
//!
//! Each axis is resolved on its own so the player slides along a wall
//! instead of sticking to it. The tile probe looks `proximity_limit` steps
//! ahead, which keeps the camera well clear of wall faces.

use glam::Vec2;

use super::InputCmd;
use crate::{
    config::MoveConfig,
    world::{CameraPose, TileGrid},
};

/// Which axes the last move actually committed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub moved_x: bool,
    pub moved_y: bool,
}

impl MoveOutcome {
    #[inline]
    pub fn blocked(&self) -> bool {
        !self.moved_x && !self.moved_y
    }
}

/// World displacement requested by `cmd` at `heading`.
#[inline]
pub fn wish_delta(camera: &CameraPose, cmd: &InputCmd, cfg: &MoveConfig) -> Vec2 {
    (camera.forward() * cmd.forward + camera.right() * cmd.strafe) * cfg.move_speed
}

/// Apply one frame of `cmd` to `camera`.
///
/// `obstacles` are the positions of live entities; the camera may not come
/// within `entity_radius` of one while getting closer to it, but it may
/// always back away.
pub fn move_camera(
    camera: &mut CameraPose,
    cmd: &InputCmd,
    grid: &TileGrid,
    obstacles: &[Vec2],
    cfg: &MoveConfig,
    cell_size: f32,
) -> MoveOutcome {
    camera.turn(cmd.turn * cfg.pivot_speed + cmd.look_dx * cfg.mouse_sensitivity);

    let delta = wish_delta(camera, cmd, cfg);
    let mut out = MoveOutcome::default();
    if !delta.is_finite() {
        return out;
    }

    if delta.x != 0.0 {
        let step = Vec2::new(delta.x, 0.0);
        if axis_free(camera.pos, step, grid, obstacles, cfg, cell_size) {
            camera.pos += step;
            out.moved_x = true;
        }
    }
    if delta.y != 0.0 {
        let step = Vec2::new(0.0, delta.y);
        if axis_free(camera.pos, step, grid, obstacles, cfg, cell_size) {
            camera.pos += step;
            out.moved_y = true;
        }
    }

    if !out.moved_x && !out.moved_y && delta != Vec2::ZERO {
        tracing::trace!(pos = ?camera.pos, ?delta, "movement blocked");
    }
    out
}

fn axis_free(
    pos: Vec2,
    step: Vec2,
    grid: &TileGrid,
    obstacles: &[Vec2],
    cfg: &MoveConfig,
    cell_size: f32,
) -> bool {
    if grid.blocks(pos + step * cfg.proximity_limit, cell_size) {
        return false;
    }
    let next = pos + step;
    !obstacles.iter().any(|&o| {
        let d = next.distance(o);
        d < cfg.entity_radius && d < pos.distance(o)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const CELL: f32 = 64.0;

    fn cfg() -> MoveConfig {
        MoveConfig {
            move_speed: CELL / 20.0,
            entity_radius: CELL * 0.4,
            ..MoveConfig::default()
        }
    }

    fn room() -> TileGrid {
        TileGrid::bordered(8, 1).unwrap()
    }

    fn fwd() -> InputCmd {
        InputCmd {
            forward: 1.0,
            ..InputCmd::default()
        }
    }

    #[test]
    fn forward_in_open_space() {
        let mut cam = CameraPose::new(Vec2::new(4.0 * CELL, 4.0 * CELL), 0.0);
        let before = cam.pos;
        let out = move_camera(&mut cam, &fwd(), &room(), &[], &cfg(), CELL);
        assert!(out.moved_y);
        assert!((cam.pos.y - before.y - CELL / 20.0).abs() < 1e-4);
        assert!((cam.pos.x - before.x).abs() < 1e-4);
    }

    #[test]
    fn wall_ahead_denies_move() {
        // facing the −Y border from under half a cell away
        let mut cam = CameraPose::new(Vec2::new(4.5 * CELL, 1.4 * CELL), std::f32::consts::PI);
        let before = cam.pos;
        let out = move_camera(&mut cam, &fwd(), &room(), &[], &cfg(), CELL);
        assert!(!out.moved_y);
        assert!((cam.pos - before).length() < 1e-3);
    }

    #[test]
    fn slides_along_wall() {
        // heading diagonally into the +X border: x is denied, y goes through
        let mut cam = CameraPose::new(Vec2::new(6.7 * CELL, 4.5 * CELL), FRAC_PI_2 / 2.0);
        let out = move_camera(&mut cam, &fwd(), &room(), &[], &cfg(), CELL);
        assert!(!out.moved_x);
        assert!(out.moved_y);
    }

    #[test]
    fn outside_grid_blocks() {
        let grid = TileGrid::new(2, vec![0; 4]).unwrap();
        let mut cam = CameraPose::new(Vec2::new(CELL, 1.9 * CELL), 0.0);
        let out = move_camera(&mut cam, &fwd(), &grid, &[], &cfg(), CELL);
        assert!(out.blocked());
    }

    #[test]
    fn entity_blocks_approach_but_not_retreat() {
        let cfg = cfg();
        let start = Vec2::new(4.5 * CELL, 4.0 * CELL);
        let barrel = start + Vec2::new(0.0, cfg.entity_radius - 1.0);

        let mut cam = CameraPose::new(start, 0.0);
        let out = move_camera(&mut cam, &fwd(), &room(), &[barrel], &cfg, CELL);
        assert!(!out.moved_y);

        let back = InputCmd {
            forward: -1.0,
            ..InputCmd::default()
        };
        let out = move_camera(&mut cam, &back, &room(), &[barrel], &cfg, CELL);
        assert!(out.moved_y);
    }

    #[test]
    fn turn_and_look_wrap_heading() {
        let cfg = cfg();
        let mut cam = CameraPose::new(Vec2::new(4.0 * CELL, 4.0 * CELL), 0.01);
        let cmd = InputCmd {
            turn: -1.0,
            ..InputCmd::default()
        };
        move_camera(&mut cam, &cmd, &room(), &[], &cfg, CELL);
        let h = cam.heading();
        assert!((0.0..std::f32::consts::TAU).contains(&h));
        assert!((h - (std::f32::consts::TAU + 0.01 - cfg.pivot_speed)).abs() < 1e-4);

        let look = InputCmd {
            look_dx: 10.0,
            ..InputCmd::default()
        };
        let before = cam.heading();
        move_camera(&mut cam, &look, &room(), &[], &cfg, CELL);
        assert!((cam.heading() - (before + 10.0 * cfg.mouse_sensitivity)).abs() < 1e-4);
    }
}
