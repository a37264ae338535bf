//! HUD drawn after the 3-D view: the weapon and the minimap.
//! Neither participates in depth sorting.

use crate::{
    renderer::{Renderer, Rgba},
    world::{CameraPose, TextureBank, TextureId, TileGrid},
};

pub const MINIMAP_SCALE: i32 = 5;
const MINIMAP_WALL: Rgba = 0xFF_555555;
const MINIMAP_FLOOR: Rgba = 0xFF_AAAAAA;
const MINIMAP_PLAYER: Rgba = 0xFF_0000FF;
const HEADING_LINE: f32 = 5.0;

/// Top-down grid in the top-left corner with the player marker.
pub fn draw_minimap<R: Renderer + ?Sized>(
    r: &mut R,
    grid: &TileGrid,
    camera: &CameraPose,
    cell_size: f32,
) {
    let n = grid.size();
    for (i, &code) in grid.cells().iter().enumerate() {
        let (col, row) = ((i % n) as i32, (i / n) as i32);
        let colour = if code != 0 { MINIMAP_WALL } else { MINIMAP_FLOOR };
        r.fill_rect(
            col * MINIMAP_SCALE,
            row * MINIMAP_SCALE,
            MINIMAP_SCALE,
            MINIMAP_SCALE,
            colour,
        );
    }

    let to_map = |v: f32| v / cell_size * MINIMAP_SCALE as f32;
    let px = to_map(camera.pos.x);
    let py = to_map(camera.pos.y);
    let tip = camera.forward() * HEADING_LINE;
    r.fill_rect(px as i32 - 1, py as i32 - 1, 3, 3, MINIMAP_PLAYER);
    r.draw_line(
        px as i32,
        py as i32,
        (px + tip.x) as i32,
        (py + tip.y) as i32,
        MINIMAP_PLAYER,
    );
}

/// Current weapon frame, bottom-centre of the view.
pub fn draw_weapon<R: Renderer + ?Sized>(
    r: &mut R,
    bank: &TextureBank,
    frame: TextureId,
    width: usize,
    height: usize,
) {
    match bank.weapon_frame(frame) {
        Ok(tex) => {
            let x = (width as i32 - tex.w as i32) / 2;
            let y = height as i32 - tex.h as i32;
            r.blit(tex, x, y);
        }
        Err(err) => tracing::trace!(%err, "weapon frame skipped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Software;
    use glam::Vec2;

    #[test]
    fn minimap_marks_walls_and_player() {
        let grid = TileGrid::bordered(4, 1).unwrap();
        let cam = CameraPose::new(Vec2::new(2.0, 2.0), 0.0);
        let mut sw = Software::default();
        sw.begin_frame(40, 40);
        draw_minimap(&mut sw, &grid, &cam, 1.0);

        assert_eq!(sw.pixel(0, 0), MINIMAP_WALL);
        assert_eq!(sw.pixel(6, 6), MINIMAP_FLOOR);
        assert_eq!(sw.pixel(10, 10), MINIMAP_PLAYER);
        // heading 0 looks toward +Y → line runs down the map
        assert_eq!(sw.pixel(10, 14), MINIMAP_PLAYER);
    }

    #[test]
    fn weapon_sits_on_bottom_edge() {
        let bank = TextureBank::builtin();
        let mut sw = Software::default();
        sw.begin_frame(100, 60);
        draw_weapon(&mut sw, &bank, 0, 100, 60);
        let touched = (0..100).any(|x| sw.pixel(x, 59) == 0xFF_C02020);
        assert!(touched);
        // unknown frame: nothing drawn, no panic
        draw_weapon(&mut sw, &bank, 99, 100, 60);
    }
}
