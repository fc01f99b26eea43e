use serde::{Deserialize, Serialize};

use crate::types::Coord;

/// One grid cell. Mutated only through `Board` commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub(crate) hidden: bool,
    pub(crate) flagged: bool,
    pub(crate) contains_bomb: bool,
    pub(crate) peeking: bool,
    pub(crate) exploded: bool,
    pub(crate) bomb_touch_count: u8,
    row: Coord,
    column: Coord,
}

impl Tile {
    pub(crate) fn new(row: Coord, column: Coord) -> Self {
        Self {
            hidden: true,
            flagged: false,
            contains_bomb: false,
            peeking: false,
            exploded: false,
            bomb_touch_count: 0,
            row,
            column,
        }
    }

    /// Clears all state except the position identity, for in-place reuse
    /// across consecutive games on a same-sized board.
    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.row, self.column);
    }

    pub const fn hidden(&self) -> bool {
        self.hidden
    }

    pub const fn flagged(&self) -> bool {
        self.flagged
    }

    pub const fn contains_bomb(&self) -> bool {
        self.contains_bomb
    }

    pub const fn peeking(&self) -> bool {
        self.peeking
    }

    pub const fn exploded(&self) -> bool {
        self.exploded
    }

    /// Number of adjacent bombs. Meaningful only once the tile is revealed
    /// and is not itself a bomb.
    pub const fn bomb_touch_count(&self) -> u8 {
        self.bomb_touch_count
    }

    pub const fn row(&self) -> Coord {
        self.row
    }

    pub const fn column(&self) -> Coord {
        self.column
    }

    pub const fn position(&self) -> (Coord, Coord) {
        (self.row, self.column)
    }

    /// Display classification, recomputed on demand from the tile state.
    ///
    /// Precedence: exploded, then covered (flagged or plain) unless peeking,
    /// then wrong flag, then bomb, then empty, then the numeric label.
    pub fn style(&self) -> TileStyle {
        use TileStyle::*;

        if self.exploded {
            return Exploded;
        }
        if self.hidden && !self.peeking {
            return if self.flagged { Flagged } else { Hidden };
        }
        if !self.hidden && self.flagged && !self.contains_bomb {
            return WrongFlag;
        }
        if self.contains_bomb {
            return Bomb;
        }
        if self.bomb_touch_count == 0 {
            return Empty;
        }
        Number(self.bomb_touch_count)
    }
}

/// What a renderer should draw for a tile. Deterministic over the tile
/// state, no hidden inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileStyle {
    Exploded,
    Flagged,
    Hidden,
    WrongFlag,
    Bomb,
    Empty,
    Number(u8),
}
