use std::collections::BTreeSet;

use crate::error::{GameError, Result};
use crate::types::{CellCount, Coord2};
use crate::GameConfig;

pub use random::*;

mod random;

/// Produces the mine positions for one game.
///
/// Implementations must return exactly `config.bombs` distinct in-bounds
/// positions for any config the board has already validated.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<BTreeSet<Coord2>>;
}

/// Explicit mine layout, for deterministic scenarios and replays.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedGenerator {
    coords: Vec<Coord2>,
}

impl FixedGenerator {
    pub fn new(coords: impl Into<Vec<Coord2>>) -> Self {
        Self {
            coords: coords.into(),
        }
    }
}

impl MinefieldGenerator for FixedGenerator {
    fn generate(self, config: GameConfig) -> Result<BTreeSet<Coord2>> {
        let mut positions = BTreeSet::new();
        for coords in self.coords {
            if coords.0 >= config.size || coords.1 >= config.size {
                return Err(GameError::InvalidCoords);
            }
            positions.insert(coords);
        }

        if positions.len() != usize::from(config.bombs) {
            return Err(GameError::InvalidLayout {
                expected: config.bombs,
                actual: positions.len() as CellCount,
            });
        }

        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_layout_rejects_out_of_bounds_mines() {
        let generator = FixedGenerator::new([(3, 0)]);
        let result = generator.generate(GameConfig::new(3, 1));
        assert_eq!(result, Err(GameError::InvalidCoords));
    }

    #[test]
    fn fixed_layout_rejects_duplicate_positions() {
        let generator = FixedGenerator::new([(0, 0), (0, 0)]);
        let result = generator.generate(GameConfig::new(3, 2));
        assert_eq!(
            result,
            Err(GameError::InvalidLayout {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn fixed_layout_rejects_count_mismatch() {
        let generator = FixedGenerator::new([(0, 1)]);
        let result = generator.generate(GameConfig::new(3, 2));
        assert_eq!(
            result,
            Err(GameError::InvalidLayout {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn fixed_layout_yields_requested_mines() {
        let generator = FixedGenerator::new([(0, 1), (2, 2)]);
        let positions = generator.generate(GameConfig::new(3, 2)).unwrap();
        assert_eq!(positions, BTreeSet::from([(0, 1), (2, 2)]));
    }
}
