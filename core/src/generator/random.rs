use super::*;
use crate::types::{CellCount, Coord};

/// Uniform mine placement by rejection sampling over the flattened index
/// space `[0, size * size)`: draw indices until the set holds the requested
/// bomb count. Terminates for every validated config since `bombs` is
/// strictly below the tile count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomGenerator {
    seed: u64,
}

impl RandomGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Fresh unpredictable seed for interactive play.
    pub fn from_entropy() -> Self {
        use rand::Rng;
        Self::new(rand::rng().random())
    }
}

impl MinefieldGenerator for RandomGenerator {
    fn generate(self, config: GameConfig) -> Result<BTreeSet<Coord2>> {
        use rand::prelude::*;

        let total_tiles = config.total_tiles();
        if config.bombs >= total_tiles {
            return Err(GameError::InvalidConfig {
                size: config.size,
                bombs: config.bombs,
            });
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut indices: BTreeSet<CellCount> = BTreeSet::new();
        while indices.len() < usize::from(config.bombs) {
            indices.insert(rng.random_range(0..total_tiles));
        }

        log::debug!(
            "placed {} mines on a {}x{} board, seed {}",
            indices.len(),
            config.size,
            config.size,
            self.seed
        );

        let size = CellCount::from(config.size);
        Ok(indices
            .into_iter()
            .map(|index| ((index / size) as Coord, (index % size) as Coord))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_bomb_count() {
        let config = GameConfig::new(8, 10);
        let positions = RandomGenerator::new(7).generate(config).unwrap();
        assert_eq!(positions.len(), 10);
        assert!(positions.iter().all(|&(r, c)| r < 8 && c < 8));
    }

    #[test]
    fn same_seed_reproduces_the_layout() {
        let config = GameConfig::new(16, 40);
        let first = RandomGenerator::new(42).generate(config).unwrap();
        let second = RandomGenerator::new(42).generate(config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn near_full_board_still_terminates() {
        let config = GameConfig::new(2, 3);
        let positions = RandomGenerator::new(0).generate(config).unwrap();
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn full_board_is_rejected() {
        let config = GameConfig::new(2, 4);
        let result = RandomGenerator::new(0).generate(config);
        assert!(matches!(result, Err(GameError::InvalidConfig { .. })));
    }
}
