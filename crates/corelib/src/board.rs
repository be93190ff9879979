//! Tiny board model: dense parallel arrays indexed by `CellId`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{CoreError, CoreResult};

/// Cell id (dense, `y * size_x + x`).
pub type CellId = u32;

/// What the pick resolver needs from a board.
pub trait BoardModel {
    /// `None` when `(x, y)` is outside the grid.
    fn get_cell(&self, x: i32, y: i32) -> Option<CellId>;
    fn reveal(&mut self, cell: CellId);
    fn toggle_flag(&mut self, cell: CellId);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

/// What a cell currently shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Hidden,
    Flagged,
    Mine,
    Number(u8),
}

impl Tile {
    /// Atlas slot: 0..=8 numbers, 9 mine, 10 flag, 11 hidden.
    #[inline]
    pub fn index(self) -> u32 {
        match self {
            Tile::Number(n) => n as u32,
            Tile::Mine => 9,
            Tile::Flagged => 10,
            Tile::Hidden => 11,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    size_x: u32,
    size_y: u32,
    mines: Vec<bool>,
    revealed: Vec<bool>,
    flagged: Vec<bool>,
    adjacent: Vec<u8>,
    mine_count: u32,
    revealed_count: u32,
    exploded: bool,
}

impl Board {
    /// Random layout. `seed` makes it reproducible.
    pub fn new(size_x: u32, size_y: u32, mine_count: u32, seed: Option<u64>) -> CoreResult<Self> {
        let cells = checked_cells(size_x, size_y)?;
        if mine_count > cells {
            return Err(CoreError::TooManyMines {
                mines: mine_count,
                cells,
            });
        }

        let mut mines = vec![false; cells as usize];
        mines[..mine_count as usize].fill(true);
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        mines.shuffle(&mut rng);

        log::info!("Board {size_x}x{size_y} with {mine_count} mines (seed={seed:?})");
        Ok(Self::with_layout(size_x, size_y, mines))
    }

    /// Fixed layout, mines at the given coordinates.
    pub fn from_mines(size_x: u32, size_y: u32, positions: &[(i32, i32)]) -> CoreResult<Self> {
        let cells = checked_cells(size_x, size_y)?;
        let mut mines = vec![false; cells as usize];
        for &(x, y) in positions {
            let id = cell_index(size_x, size_y, x, y).ok_or(CoreError::CellOutOfBounds { x, y })?;
            mines[id as usize] = true;
        }
        Ok(Self::with_layout(size_x, size_y, mines))
    }

    fn with_layout(size_x: u32, size_y: u32, mines: Vec<bool>) -> Self {
        let len = mines.len();
        let mut board = Self {
            size_x,
            size_y,
            mine_count: mines.iter().filter(|&&m| m).count() as u32,
            mines,
            revealed: vec![false; len],
            flagged: vec![false; len],
            adjacent: vec![0; len],
            revealed_count: 0,
            exploded: false,
        };
        for id in 0..len as u32 {
            let count = board
                .neighbors(id)
                .filter(|&n| board.mines[n as usize])
                .count();
            board.adjacent[id as usize] = count as u8;
        }
        board
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.size_x, self.size_y)
    }

    #[inline]
    pub fn mine_count(&self) -> u32 {
        self.mine_count
    }

    #[inline]
    pub fn revealed_count(&self) -> u32 {
        self.revealed_count
    }

    #[inline]
    pub fn is_mine(&self, cell: CellId) -> bool {
        self.mines.get(cell as usize).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_revealed(&self, cell: CellId) -> bool {
        self.revealed.get(cell as usize).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_flagged(&self, cell: CellId) -> bool {
        self.flagged.get(cell as usize).copied().unwrap_or(false)
    }

    #[inline]
    pub fn adjacent_mines(&self, cell: CellId) -> u8 {
        self.adjacent.get(cell as usize).copied().unwrap_or(0)
    }

    pub fn status(&self) -> GameStatus {
        if self.exploded {
            GameStatus::Lost
        } else if self.revealed_count + self.mine_count == self.mines.len() as u32 {
            GameStatus::Won
        } else {
            GameStatus::Playing
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        let i = self.get_cell(x, y)? as usize;
        Some(if self.revealed[i] {
            if self.mines[i] {
                Tile::Mine
            } else {
                Tile::Number(self.adjacent[i])
            }
        } else if self.flagged[i] {
            Tile::Flagged
        } else {
            Tile::Hidden
        })
    }

    /// Text dump, row `y = 0` first. `reveal_all` shows the solution.
    pub fn render_text(&self, reveal_all: bool) -> String {
        let mut out = String::with_capacity(((self.size_x + 1) * self.size_y) as usize * 3);
        for y in 0..self.size_y as i32 {
            for x in 0..self.size_x as i32 {
                let i = (y as u32 * self.size_x + x as u32) as usize;
                let ch = if reveal_all || self.revealed[i] {
                    match (self.mines[i], self.adjacent[i]) {
                        (true, _) => '\u{00A4}',
                        (false, 0) => '\u{2591}',
                        (false, n) => char::from(b'0' + n),
                    }
                } else if self.flagged[i] {
                    'F'
                } else {
                    '\u{2588}'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    fn neighbors(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        let x = (cell % self.size_x) as i32;
        let y = (cell / self.size_x) as i32;
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(move |(dx, dy)| cell_index(self.size_x, self.size_y, x + dx, y + dy))
    }

    fn mark_revealed(&mut self, i: usize) {
        self.revealed[i] = true;
        self.revealed_count += 1;
    }
}

impl BoardModel for Board {
    fn get_cell(&self, x: i32, y: i32) -> Option<CellId> {
        cell_index(self.size_x, self.size_y, x, y)
    }

    /// Revealed and flagged cells are left alone. A mine reveals every
    /// unflagged cell; an empty cell opens its neighbourhood.
    fn reveal(&mut self, cell: CellId) {
        let i = cell as usize;
        if i >= self.mines.len() || self.revealed[i] || self.flagged[i] {
            return;
        }
        self.mark_revealed(i);

        if self.mines[i] {
            log::info!("Mine hit at cell {cell}, game over");
            self.exploded = true;
            for j in 0..self.mines.len() {
                if !self.revealed[j] && !self.flagged[j] {
                    self.mark_revealed(j);
                }
            }
            return;
        }

        // Flood fill, iterative to keep large empty regions off the call stack.
        let mut stack = Vec::new();
        if self.adjacent[i] == 0 {
            stack.push(cell);
        }
        while let Some(c) = stack.pop() {
            let open: Vec<CellId> = self
                .neighbors(c)
                .filter(|&n| !self.revealed[n as usize] && !self.flagged[n as usize])
                .collect();
            for n in open {
                self.mark_revealed(n as usize);
                if self.adjacent[n as usize] == 0 {
                    stack.push(n);
                }
            }
        }
    }

    /// Revealed cells cannot be flagged.
    fn toggle_flag(&mut self, cell: CellId) {
        let i = cell as usize;
        if i < self.flagged.len() && !self.revealed[i] {
            self.flagged[i] = !self.flagged[i];
        }
    }
}

fn checked_cells(size_x: u32, size_y: u32) -> CoreResult<u32> {
    size_x
        .checked_mul(size_y)
        .filter(|&c| c > 0)
        .ok_or(CoreError::EmptyBoard { size_x, size_y })
}

#[inline]
fn cell_index(size_x: u32, size_y: u32, x: i32, y: i32) -> Option<CellId> {
    if x < 0 || y < 0 || x as u32 >= size_x || y as u32 >= size_y {
        return None;
    }
    Some(y as u32 * size_x + x as u32)
}
