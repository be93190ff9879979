//! Core errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("field of view must lie in (0, pi) radians, got {0}")]
    InvalidFov(f32),
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("screen size must be non-zero, got {width}x{height}")]
    InvalidScreenSize { width: u32, height: u32 },
    #[error("basis vector `{0}` has zero length")]
    DegenerateBasis(&'static str),
    #[error("basis is not orthonormal (max deviation {0})")]
    NonOrthonormalBasis(f32),
    #[error("basis is left-handed: forward x left must equal up")]
    LeftHandedBasis,
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    #[error("board must have at least one cell, got {size_x}x{size_y}")]
    EmptyBoard { size_x: u32, size_y: u32 },
    #[error("{mines} mines do not fit on a board with {cells} cells")]
    TooManyMines { mines: u32, cells: u32 },
    #[error("cell ({x}, {y}) lies outside the board")]
    CellOutOfBounds { x: i32, y: i32 },
}

pub type CoreResult<T> = Result<T, CoreError>;
