//! Common types for the combat core: cell states, shot results and board errors.

use crate::bitboard::BitBoardError;

/// State of a single cell on a display board.
///
/// `Hit` and `Miss` are terminal: a resolved cell never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    ShipPresent,
    Hit,
    Miss,
}

impl CellState {
    /// Returns `true` once the cell has been attacked.
    pub fn is_resolved(self) -> bool {
        matches!(self, CellState::Hit | CellState::Miss)
    }
}

/// Result of a shot against a logical board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotResult {
    /// Shot missed all ships.
    Miss,
    /// Shot hit a ship that is still afloat.
    Hit,
    /// Shot sank a ship, carrying its name and size.
    Sunk { name: &'static str, size: usize },
}

impl ShotResult {
    pub fn is_hit(&self) -> bool {
        !matches!(self, ShotResult::Miss)
    }

    pub fn sunk_name(&self) -> Option<&'static str> {
        match self {
            ShotResult::Sunk { name, .. } => Some(*name),
            _ => None,
        }
    }
}

/// Errors returned by board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error (e.g., invalid size or index).
    BitBoardError(BitBoardError),
    /// Specified ship index is out of range.
    InvalidIndex,
    /// Attempted to place a ship that is already placed.
    ShipAlreadyPlaced,
    /// Ship placement overlaps another ship.
    ShipOverlaps,
    /// Ship placement is out of bounds.
    ShipOutOfBounds,
    /// Unable to place ship (random placement failed).
    UnableToPlaceShip,
    /// The cell was already attacked.
    AlreadyAttacked,
    /// A hit landed on a cell no ship claims.
    UnknownShipHit,
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoardError(err)
    }
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            BoardError::InvalidIndex => write!(f, "Ship index is out of range"),
            BoardError::ShipAlreadyPlaced => write!(f, "Ship is already placed on the board"),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
            BoardError::AlreadyAttacked => write!(f, "Cell was already attacked"),
            BoardError::UnknownShipHit => write!(f, "Hit cell is not owned by any ship"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
