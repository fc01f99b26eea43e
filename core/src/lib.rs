use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod board;
mod error;
mod generator;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub bombs: CellCount,
}

impl GameConfig {
    pub const fn new(size: Coord, bombs: CellCount) -> Self {
        Self { size, bombs }
    }

    /// Standard difficulty table: bomb counts scale linearly with board
    /// area relative to the 8x8 base.
    pub const fn preset(size: Coord, difficulty: Difficulty) -> Self {
        // widened so Expert on the largest boards cannot overflow
        let bombs = difficulty.base_bombs() as u32 * mult(size, size) as u32 / 64;
        Self::new(size, bombs as CellCount)
    }

    /// The board requires `size >= 1` and fewer bombs than tiles; anything
    /// else is a caller bug, not a playable game.
    pub fn validate(&self) -> Result<()> {
        if self.size >= 1 && self.bombs < self.total_tiles() {
            Ok(())
        } else {
            Err(GameError::InvalidConfig {
                size: self.size,
                bombs: self.bombs,
            })
        }
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn safe_tiles(&self) -> CellCount {
        self.total_tiles() - self.bombs
    }
}

impl Default for GameConfig {
    /// The classic opening game: 8x8 with 10 bombs.
    fn default() -> Self {
        Self::preset(8, Difficulty::Normal)
    }
}

/// Difficulty presets offered to the player, paired with board sizes of
/// 8, 16, or 32.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    /// Bomb count on the 8x8 base board.
    pub const fn base_bombs(self) -> CellCount {
        match self {
            Self::Normal => 10,
            Self::Hard => 15,
            Self::Expert => 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_the_classic_game() {
        let config = GameConfig::default();
        assert_eq!(config, GameConfig::new(8, 10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn presets_scale_with_board_area() {
        assert_eq!(GameConfig::preset(8, Difficulty::Hard).bombs, 15);
        assert_eq!(GameConfig::preset(16, Difficulty::Normal).bombs, 40);
        assert_eq!(GameConfig::preset(16, Difficulty::Expert).bombs, 80);
        assert_eq!(GameConfig::preset(32, Difficulty::Normal).bombs, 160);
        assert_eq!(GameConfig::preset(32, Difficulty::Expert).bombs, 320);
    }

    #[test]
    fn preset_bomb_counts_stay_playable() {
        for &size in &[8, 16, 32] {
            for &difficulty in &[Difficulty::Normal, Difficulty::Hard, Difficulty::Expert] {
                assert!(GameConfig::preset(size, difficulty).validate().is_ok());
            }
        }
    }

    #[test]
    fn overfull_config_is_rejected() {
        assert!(GameConfig::new(2, 4).validate().is_err());
        assert!(GameConfig::new(0, 0).validate().is_err());
        assert!(GameConfig::new(1, 0).validate().is_ok());
    }
}
