use std::collections::{BTreeSet, VecDeque};
use std::ops::BitOr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::generator::MinefieldGenerator;
use crate::tile::Tile;
use crate::types::{CellCount, Coord, Coord2, NeighborIter, NeighborIterExt, ToNdIndex};
use crate::GameConfig;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// Both end states are terminal; commands issued afterwards are silent
/// no-ops until the next `new_game`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Outcome of a reveal command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game.
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when a cascade touches several tiles.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Outcome of a flag command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// The aggregate root: grid, mine layout, and the game-state machine.
///
/// All rules live here; tiles never mutate themselves. One board serves a
/// whole session, with `new_game` reinitializing it between games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    tiles: Array2<Tile>,
    bomb_tiles: BTreeSet<Coord2>,
    revealed_tiles: Vec<Coord2>,
    bombs_left_to_flag: CellCount,
    state: GameState,
}

impl Board {
    pub fn new(config: GameConfig, generator: impl MinefieldGenerator) -> Result<Self> {
        config.validate()?;
        let bomb_tiles = generator.generate(config)?;
        let mut board = Self {
            config,
            tiles: Self::fresh_grid(config.size),
            bomb_tiles,
            revealed_tiles: Vec::new(),
            bombs_left_to_flag: config.bombs,
            state: GameState::InProgress,
        };
        board.plant_mines();
        Ok(board)
    }

    /// Reinitializes the board for a fresh game. Callable at any time,
    /// including after a terminal state. Reuses the tile grid in place when
    /// the size is unchanged, reallocates otherwise. Errors leave the
    /// previous game untouched.
    pub fn new_game(
        &mut self,
        config: GameConfig,
        generator: impl MinefieldGenerator,
    ) -> Result<()> {
        config.validate()?;
        let bomb_tiles = generator.generate(config)?;

        if config.size == self.config.size {
            for tile in self.tiles.iter_mut() {
                tile.reset();
            }
        } else {
            self.tiles = Self::fresh_grid(config.size);
        }

        self.config = config;
        self.bomb_tiles = bomb_tiles;
        self.revealed_tiles.clear();
        self.bombs_left_to_flag = config.bombs;
        self.state = GameState::InProgress;
        self.plant_mines();

        log::debug!(
            "new game: {}x{} with {} bombs",
            config.size,
            config.size,
            config.bombs
        );
        Ok(())
    }

    fn fresh_grid(size: Coord) -> Array2<Tile> {
        let size = usize::from(size);
        Array2::from_shape_fn((size, size), |(row, col)| {
            Tile::new(row as Coord, col as Coord)
        })
    }

    fn plant_mines(&mut self) {
        for &coords in &self.bomb_tiles {
            self.tiles[coords.to_nd_index()].contains_bomb = true;
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord {
        self.config.size
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn total_bombs(&self) -> CellCount {
        self.config.bombs
    }

    /// How many flags remain in the budget.
    pub fn bombs_left_to_flag(&self) -> CellCount {
        self.bombs_left_to_flag
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_tiles.len() as CellCount
    }

    pub fn tile_at(&self, coords: Coord2) -> Result<Tile> {
        let coords = self.validate_coords(coords)?;
        Ok(self.tiles[coords.to_nd_index()])
    }

    /// Row-major iteration over all tiles, for renderers.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Reveals a tile, cascading through its zero-adjacency region when the
    /// tile touches no bombs. Revealing a flagged tile clears the flag and
    /// refunds the budget. A bomb reveal ends the game immediately without
    /// computing adjacency.
    pub fn reveal_tile(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.state.is_finished() || !self.tiles[coords.to_nd_index()].hidden {
            return Ok(RevealOutcome::NoChange);
        }

        let mut outcome = self.reveal_single_tile(coords);
        if matches!(outcome, RevealOutcome::HitMine) {
            return Ok(outcome);
        }

        if self.tiles[coords.to_nd_index()].bomb_touch_count == 0 {
            outcome = outcome | self.flood_fill(coords);
        }

        Ok(if self.check_win() {
            RevealOutcome::Won
        } else {
            outcome
        })
    }

    /// Uncovers one tile and maintains the flag budget and reveal log.
    /// Does not cascade and does not run the win check.
    fn reveal_single_tile(&mut self, coords: Coord2) -> RevealOutcome {
        let tile = &mut self.tiles[coords.to_nd_index()];
        tile.hidden = false;
        if tile.flagged {
            tile.flagged = false;
            self.bombs_left_to_flag += 1;
        }
        self.revealed_tiles.push(coords);

        if self.tiles[coords.to_nd_index()].contains_bomb {
            self.tiles[coords.to_nd_index()].exploded = true;
            log::debug!("bomb revealed at {:?}", coords);
            self.lose_game();
            return RevealOutcome::HitMine;
        }

        let count = self.count_adjacent_bombs(coords);
        self.tiles[coords.to_nd_index()].bomb_touch_count = count;
        log::trace!("revealed {:?}, touching {} bombs", coords, count);
        RevealOutcome::Revealed
    }

    /// Worklist traversal of the connected zero region starting from an
    /// already-revealed zero tile. Equivalent to recursively revealing every
    /// neighbor; the numbered border of the region is revealed too, and the
    /// traversal order is not observable in the final state. Zero regions
    /// never border a bomb, so the cascade cannot lose the game. Returns the
    /// per-tile outcomes merged through `BitOr`.
    fn flood_fill(&mut self, origin: Coord2) -> RevealOutcome {
        let mut outcome = RevealOutcome::NoChange;
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self.iter_neighbors(origin).collect();
        log::trace!("flood fill from {:?}", origin);

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }
            if !self.tiles[coords.to_nd_index()].hidden {
                continue;
            }

            outcome = outcome | self.reveal_single_tile(coords);

            if self.tiles[coords.to_nd_index()].bomb_touch_count == 0 {
                to_visit.extend(
                    self.iter_neighbors(coords)
                        .filter(|&pos| self.tiles[pos.to_nd_index()].hidden)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
        outcome
    }

    /// Flags or unflags a covered tile. Flagging draws on the budget and is
    /// silently refused once `bombs_left_to_flag` reaches zero; unflagging
    /// always refunds.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.state.is_finished() || !self.tiles[coords.to_nd_index()].hidden {
            return Ok(FlagOutcome::NoChange);
        }

        let tile = &mut self.tiles[coords.to_nd_index()];
        Ok(if tile.flagged {
            tile.flagged = false;
            self.bombs_left_to_flag += 1;
            FlagOutcome::Changed
        } else if self.bombs_left_to_flag > 0 {
            tile.flagged = true;
            self.bombs_left_to_flag -= 1;
            FlagOutcome::Changed
        } else {
            log::debug!("flag budget exhausted, ignoring flag at {:?}", coords);
            FlagOutcome::NoChange
        })
    }

    /// Toggles the peek overlay on every bomb tile. Does not change
    /// `hidden`; purely a rendering hint.
    pub fn toggle_cheat(&mut self) {
        if self.state.is_finished() {
            return;
        }
        for &coords in &self.bomb_tiles {
            let tile = &mut self.tiles[coords.to_nd_index()];
            tile.peeking = !tile.peeking;
        }
    }

    /// Flag-audit win path: the player declares they are done flagging.
    /// Wins when every bomb is flagged, otherwise the game is lost with the
    /// usual lose-reveal. Returns the resulting state.
    pub fn validate(&mut self) -> GameState {
        if self.state.is_finished() {
            return self.state;
        }

        let all_flagged = self
            .bomb_tiles
            .iter()
            .all(|&coords| self.tiles[coords.to_nd_index()].flagged);

        if all_flagged {
            log::debug!("all {} bombs flagged, game won", self.bomb_tiles.len());
            self.state = GameState::Won;
        } else {
            self.lose_game();
        }
        self.state
    }

    /// Terminal loss transition: unhides every non-exploded bomb and every
    /// flagged tile, so wrong flags become visible to the renderer.
    fn lose_game(&mut self) {
        if self.state.is_finished() {
            return;
        }
        self.state = GameState::Lost;
        log::debug!("game lost");

        for &coords in &self.bomb_tiles {
            let tile = &mut self.tiles[coords.to_nd_index()];
            if !tile.exploded {
                tile.hidden = false;
            }
        }
        for tile in self.tiles.iter_mut() {
            if tile.flagged {
                tile.hidden = false;
            }
        }
    }

    /// Called after every successful non-bomb reveal. Bombs stay as-is on a
    /// win; only the safe tiles need to be uncovered.
    fn check_win(&mut self) -> bool {
        if self.revealed_count() == self.config.safe_tiles() {
            self.state = GameState::Won;
            log::debug!("all safe tiles revealed, game won");
            true
        } else {
            false
        }
    }

    fn count_adjacent_bombs(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|pos| self.bomb_tiles.contains(pos))
            .count()
            .try_into()
            .unwrap()
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.config.size && coords.1 < self.config.size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.tiles.iter_neighbors(coords)
    }
}
