use core::time::Duration;

use crate::ai::Difficulty;
use crate::ship::ShipType;

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 6;
pub const STANDARD_FLEET: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 6),
    ShipType::new("Carrier", 6),
    ShipType::new("Battleship", 4),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 1),
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 6 + 6 + 4 + 4 + 3 + 1;

/// Pause between consecutive AI shots.
pub const DEFAULT_AI_DELAY: Duration = Duration::from_millis(500);

/// Delay substituted when a zero delay is configured.
pub const FALLBACK_AI_DELAY: Duration = Duration::from_secs(1);

/// On-disk encoding of the match result history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreFormat {
    #[default]
    Json,
    Bincode,
}

/// Runtime settings for a single match session.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub ai_delay: Duration,
    pub difficulty: Difficulty,
    /// Fixed RNG seed for reproducible placement and AI choices.
    pub seed: Option<u64>,
    #[cfg(feature = "std")]
    pub results_path: std::path::PathBuf,
    pub store_format: StoreFormat,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            ai_delay: DEFAULT_AI_DELAY,
            difficulty: Difficulty::Hard,
            seed: None,
            #[cfg(feature = "std")]
            results_path: std::path::PathBuf::from("data/match_results.json"),
            store_format: StoreFormat::Json,
        }
    }
}

impl MatchConfig {
    /// The configured AI delay, with zero replaced by [`FALLBACK_AI_DELAY`].
    pub fn effective_ai_delay(&self) -> Duration {
        if self.ai_delay.is_zero() {
            FALLBACK_AI_DELAY
        } else {
            self.ai_delay
        }
    }
}
