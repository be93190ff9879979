//! Hit point -> board cell -> board action.

use crate::board::{Board, BoardModel};
use crate::error::{CoreError, CoreResult};
use crate::ray::PlaneHit;

/// What a click does to the picked cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickAction {
    Reveal,
    ToggleFlag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

/// Maps ground-plane hits to grid cells. Cell `(x, y)` covers
/// `[x * cell_size, (x + 1) * cell_size) x [y * cell_size, (y + 1) * cell_size)`.
#[derive(Clone, Copy, Debug)]
pub struct PickResolver {
    cell_size: f32,
    size_x: u32,
    size_y: u32,
}

impl PickResolver {
    pub fn new(cell_size: f32, size_x: u32, size_y: u32) -> CoreResult<Self> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(CoreError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            size_x,
            size_y,
        })
    }

    pub fn for_board(board: &Board, cell_size: f32) -> CoreResult<Self> {
        let (size_x, size_y) = board.size();
        Self::new(cell_size, size_x, size_y)
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// `None` for a miss or a hit outside the grid.
    pub fn resolve(&self, hit: &PlaneHit) -> Option<CellCoord> {
        let p = hit.point()?;
        if !p.is_finite() {
            log::warn!("Ignoring non-finite pick point {p:?}");
            return None;
        }
        let x = (p.x / self.cell_size).floor();
        let y = (p.y / self.cell_size).floor();
        if x < 0.0 || y < 0.0 || x >= self.size_x as f32 || y >= self.size_y as f32 {
            log::debug!("Pick at ({:.3}, {:.3}) is off the board", p.x, p.y);
            return None;
        }
        Some(CellCoord {
            x: x as i32,
            y: y as i32,
        })
    }

    /// Resolve and apply `action`. Misses and off-board hits are no-ops.
    pub fn dispatch<B: BoardModel + ?Sized>(
        &self,
        board: &mut B,
        hit: &PlaneHit,
        action: PickAction,
    ) -> Option<CellCoord> {
        let coord = self.resolve(hit)?;
        let cell = board.get_cell(coord.x, coord.y)?;
        match action {
            PickAction::Reveal => board.reveal(cell),
            PickAction::ToggleFlag => board.toggle_flag(cell),
        }
        log::debug!("{action:?} on cell ({}, {})", coord.x, coord.y);
        Some(coord)
    }
}
