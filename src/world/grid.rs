use glam::Vec2;
use thiserror::Error;

use crate::world::texture::TextureId;

/// Cell code of a passable cell.
pub const EMPTY: TextureId = 0;

/// Result of probing one cell of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    Empty,
    /// Solid cell carrying its wall texture id.
    Wall(TextureId),
    /// Column or row outside `0..size`; treated as blocking.
    Outside,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("grid side must be non-zero")]
    ZeroSize,

    #[error("grid side {0} is too large")]
    TooLarge(usize),

    #[error("grid of side {size} needs {expected} cells, got {got}")]
    CellCount {
        size: usize,
        expected: usize,
        got: usize,
    },
}

/// Square N×N map of cell codes, row-major.
///
/// Immutable once a level is loaded; a level change replaces it wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    size: usize,
    cells: Vec<TextureId>,
}

fn cell_count(size: usize) -> Result<usize, GridError> {
    match size {
        0 => Err(GridError::ZeroSize),
        _ => size.checked_mul(size).ok_or(GridError::TooLarge(size)),
    }
}

impl TileGrid {
    pub fn new(size: usize, cells: Vec<TextureId>) -> Result<Self, GridError> {
        let expected = cell_count(size)?;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                size,
                expected,
                got: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// All-empty interior with a one-cell border of `wall`.
    pub fn bordered(size: usize, wall: TextureId) -> Result<Self, GridError> {
        let mut cells = vec![EMPTY; cell_count(size)?];
        for i in 0..size {
            cells[i] = wall;
            cells[(size - 1) * size + i] = wall;
            cells[i * size] = wall;
            cells[i * size + size - 1] = wall;
        }
        Self::new(size, cells)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cells(&self) -> &[TextureId] {
        &self.cells
    }

    /// Row-major index of `(col, row)`, or `None` when outside the grid.
    #[inline]
    pub fn index(&self, col: i64, row: i64) -> Option<usize> {
        let n = self.size as i64;
        if (0..n).contains(&col) && (0..n).contains(&row) {
            Some((row * n + col) as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn probe(&self, col: i64, row: i64) -> Probe {
        match self.index(col, row) {
            None => Probe::Outside,
            Some(i) => match self.cells[i] {
                EMPTY => Probe::Empty,
                tex => Probe::Wall(tex),
            },
        }
    }

    /// Probe the cell containing world point `p`.
    #[inline]
    pub fn probe_world(&self, p: Vec2, cell_size: f32) -> Probe {
        if !p.is_finite() {
            return Probe::Outside;
        }
        let col = (p.x / cell_size).floor() as i64;
        let row = (p.y / cell_size).floor() as i64;
        self.probe(col, row)
    }

    /// True when `p` lies in a wall or outside the grid.
    #[inline]
    pub fn blocks(&self, p: Vec2, cell_size: f32) -> bool {
        self.probe_world(p, cell_size) != Probe::Empty
    }

    pub fn set(&mut self, col: usize, row: usize, code: TextureId) {
        if let Some(i) = self.index(col as i64, row as i64) {
            self.cells[i] = code;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(TileGrid::new(0, vec![]).unwrap_err(), GridError::ZeroSize);
        assert_eq!(
            TileGrid::new(3, vec![0; 8]).unwrap_err(),
            GridError::CellCount {
                size: 3,
                expected: 9,
                got: 8
            }
        );
        let huge = usize::MAX / 2;
        assert_eq!(TileGrid::new(huge, vec![]).unwrap_err(), GridError::TooLarge(huge));
        assert_eq!(TileGrid::bordered(huge, 1).unwrap_err(), GridError::TooLarge(huge));
    }

    #[test]
    fn bordered_layout() {
        let g = TileGrid::bordered(4, 7).unwrap();
        assert_eq!(g.probe(0, 0), Probe::Wall(7));
        assert_eq!(g.probe(3, 2), Probe::Wall(7));
        assert_eq!(g.probe(1, 1), Probe::Empty);
        assert_eq!(g.probe(2, 2), Probe::Empty);
    }

    #[test]
    fn out_of_bounds_is_outside_not_wrapped() {
        let g = TileGrid::bordered(4, 1).unwrap();
        // col 4 on row 1 would alias row 2 col 0 in a flat index
        assert_eq!(g.probe(4, 1), Probe::Outside);
        assert_eq!(g.probe(-1, 0), Probe::Outside);
        assert_eq!(g.probe(0, 4), Probe::Outside);
    }

    #[test]
    fn world_probe_blocks_outside() {
        let g = TileGrid::bordered(4, 1).unwrap();
        assert!(!g.blocks(Vec2::new(1.5, 1.5), 1.0));
        assert!(g.blocks(Vec2::new(0.5, 1.5), 1.0));
        assert!(g.blocks(Vec2::new(-0.5, 1.5), 1.0));
        assert!(g.blocks(Vec2::new(f32::NAN, 1.0), 1.0));
    }
}
