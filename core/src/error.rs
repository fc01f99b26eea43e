use thiserror::Error;

use crate::types::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid configuration: {bombs} bombs do not fit a {size}x{size} board")]
    InvalidConfig { size: Coord, bombs: CellCount },
    #[error("coordinates outside the board")]
    InvalidCoords,
    #[error("layout does not provide exactly {expected} distinct positions, got {actual}")]
    InvalidLayout {
        expected: CellCount,
        actual: CellCount,
    },
}

pub type Result<T> = core::result::Result<T, GameError>;
