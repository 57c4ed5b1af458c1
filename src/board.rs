//! Display boards and the logical fleet board behind them.
//!
//! [`Board`] is the grid of [`CellState`] that attacks are resolved against and
//! that the presentation layer draws. [`FleetBoard`] knows which ship occupies
//! each cell, so a strike can report the ship it damaged or sank.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::bitboard::{BitBoard, BitBoardError};
use crate::common::{BoardError, CellState, ShotResult};
use crate::config::BOARD_SIZE;
use crate::ship::{Fleet, Orientation};

type BB = BitBoard<u128, { BOARD_SIZE as usize }>;

const GRID_SIZE: usize = BOARD_SIZE as usize;

/// Fixed 10×10 grid of cell states.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[CellState; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    /// An empty board of open water.
    pub fn new() -> Self {
        Self {
            cells: [[CellState::Empty; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Display board mirroring the ship footprint of `fleet`.
    pub fn from_fleet(fleet: &FleetBoard) -> Self {
        let mut board = Self::new();
        for (r, c) in fleet.occupied().iter_set_bits() {
            board.cells[r][c] = if fleet.is_attacked(r, c) {
                CellState::Hit
            } else {
                CellState::ShipPresent
            };
        }
        for (r, c) in fleet.attacked().iter_set_bits() {
            if board.cells[r][c] == CellState::Empty {
                board.cells[r][c] = CellState::Miss;
            }
        }
        board
    }

    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < GRID_SIZE && col < GRID_SIZE
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<CellState> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn cells(&self) -> &[[CellState; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Mark a ship segment at (row, col).
    pub fn set_ship(&mut self, row: usize, col: usize) -> Result<(), BoardError> {
        let cell = self.cell_mut(row, col)?;
        if cell.is_resolved() {
            return Err(BoardError::AlreadyAttacked);
        }
        *cell = CellState::ShipPresent;
        Ok(())
    }

    pub fn is_resolved(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(CellState::is_resolved)
    }

    /// Resolve an attack at (row, col): a ship segment becomes `Hit`, open
    /// water becomes `Miss`. Returns `true` on a hit.
    pub fn resolve(&mut self, row: usize, col: usize) -> Result<bool, BoardError> {
        let cell = self.cell_mut(row, col)?;
        match *cell {
            CellState::ShipPresent => {
                *cell = CellState::Hit;
                Ok(true)
            }
            CellState::Empty => {
                *cell = CellState::Miss;
                Ok(false)
            }
            CellState::Hit | CellState::Miss => Err(BoardError::AlreadyAttacked),
        }
    }

    /// Number of cells in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == state).count()
    }

    /// Cells that hold a ship segment, hit or not.
    pub fn ship_cells(&self) -> usize {
        self.count(CellState::ShipPresent) + self.count(CellState::Hit)
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut CellState, BoardError> {
        self.cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(BoardError::BitBoardError(BitBoardError::IndexOutOfBounds {
                row,
                col,
            }))
    }

    /// Overwrite (row, col) with the outcome of a strike resolved elsewhere.
    pub(crate) fn mark(&mut self, row: usize, col: usize, hit: bool) -> Result<(), BoardError> {
        let cell = self.cell_mut(row, col)?;
        if cell.is_resolved() {
            return Err(BoardError::AlreadyAttacked);
        }
        *cell = if hit { CellState::Hit } else { CellState::Miss };
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            for cell in row.iter() {
                let ch = match cell {
                    CellState::Empty => '.',
                    CellState::ShipPresent => 'S',
                    CellState::Hit => 'X',
                    CellState::Miss => 'o',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Logical board: a fleet, where each ship sits, and which cells were struck.
#[derive(Clone, PartialEq, Eq)]
pub struct FleetBoard {
    fleet: Fleet,
    masks: Vec<Option<BB>>,
    occupied: BB,
    attacked: BB,
}

impl FleetBoard {
    /// Board with `fleet` unplaced.
    pub fn new(fleet: Fleet) -> Self {
        let masks = vec![None; fleet.len()];
        Self {
            fleet,
            masks,
            occupied: BB::new(),
            attacked: BB::new(),
        }
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Footprint of every placed ship.
    pub fn occupied(&self) -> BB {
        self.occupied
    }

    /// Every cell struck so far.
    pub fn attacked(&self) -> BB {
        self.attacked
    }

    pub fn is_attacked(&self, row: usize, col: usize) -> bool {
        self.attacked.get(row, col).unwrap_or(false)
    }

    pub fn is_fully_placed(&self) -> bool {
        self.masks.iter().all(Option::is_some)
    }

    /// Index of the ship covering (row, col), if any.
    pub fn ship_at(&self, row: usize, col: usize) -> Option<usize> {
        self.masks
            .iter()
            .position(|m| m.is_some_and(|m| m.get(row, col).unwrap_or(false)))
    }

    /// Place ship `ship_index` with its bow at (row, col).
    pub fn place(
        &mut self,
        ship_index: usize,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        let Some(ship) = self.fleet.ships().get(ship_index) else {
            return Err(BoardError::InvalidIndex);
        };
        if self.masks[ship_index].is_some() {
            return Err(BoardError::ShipAlreadyPlaced);
        }
        let mask = footprint(ship.size(), orientation, row, col)?;
        if !(self.occupied & mask).is_empty() {
            return Err(BoardError::ShipOverlaps);
        }
        self.occupied |= mask;
        self.masks[ship_index] = Some(mask);
        if let Some(ship) = self.fleet.ship_mut(ship_index) {
            ship.set_orientation(orientation);
        }
        Ok(())
    }

    /// Returns a random non-overlapping (row, col, orientation) for `ship_index`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        ship_index: usize,
    ) -> Result<(usize, usize, Orientation), BoardError> {
        let size = self
            .fleet
            .ships()
            .get(ship_index)
            .ok_or(BoardError::InvalidIndex)?
            .size();
        if size == 0 || size > GRID_SIZE {
            return Err(BoardError::ShipOutOfBounds);
        }
        for _ in 0..100 {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_r, max_c) = match orient {
                Orientation::Horizontal => (GRID_SIZE - 1, GRID_SIZE - size),
                Orientation::Vertical => (GRID_SIZE - size, GRID_SIZE - 1),
            };
            let r = rng.random_range(0..=max_r);
            let c = rng.random_range(0..=max_c);
            let mask = footprint(size, orient, r, c)?;
            if (self.occupied & mask).is_empty() {
                return Ok((r, c, orient));
            }
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Randomly place every ship not yet on the board.
    pub fn place_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        for i in 0..self.masks.len() {
            if self.masks[i].is_some() {
                continue;
            }
            let (r, c, o) = self.random_placement(rng, i)?;
            self.place(i, r, c, o)?;
        }
        Ok(())
    }

    /// Strike (row, col), damaging whichever ship lies there.
    pub fn strike(&mut self, row: usize, col: usize) -> Result<ShotResult, BoardError> {
        if self.attacked.get(row, col)? {
            return Err(BoardError::AlreadyAttacked);
        }
        self.attacked.set(row, col)?;
        if !self.occupied.get(row, col)? {
            return Ok(ShotResult::Miss);
        }
        let index = self.ship_at(row, col).ok_or(BoardError::UnknownShipHit)?;
        let ship = self
            .fleet
            .ship_mut(index)
            .ok_or(BoardError::UnknownShipHit)?;
        if ship.register_hit() {
            Ok(ShotResult::Sunk {
                name: ship.name(),
                size: ship.size(),
            })
        } else {
            Ok(ShotResult::Hit)
        }
    }
}

impl fmt::Debug for FleetBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FleetBoard")
            .field("fleet", &self.fleet)
            .field("occupied", &self.occupied)
            .field("attacked", &self.attacked)
            .finish()
    }
}

/// Occupancy mask of a ship of `size` with its bow at (row, col).
fn footprint(
    size: usize,
    orientation: Orientation,
    row: usize,
    col: usize,
) -> Result<BB, BoardError> {
    let fits = match orientation {
        Orientation::Horizontal => row < GRID_SIZE && col + size <= GRID_SIZE,
        Orientation::Vertical => col < GRID_SIZE && row + size <= GRID_SIZE,
    };
    if !fits {
        return Err(BoardError::ShipOutOfBounds);
    }
    let mut mask = BB::new();
    for i in 0..size {
        let (r, c) = match orientation {
            Orientation::Horizontal => (row, col + i),
            Orientation::Vertical => (row + i, col),
        };
        mask.set(r, c)?;
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_rejects_overhang() {
        assert_eq!(
            footprint(3, Orientation::Horizontal, 0, 8).unwrap_err(),
            BoardError::ShipOutOfBounds
        );
        assert_eq!(
            footprint(3, Orientation::Vertical, 8, 0).unwrap_err(),
            BoardError::ShipOutOfBounds
        );
        assert_eq!(footprint(3, Orientation::Vertical, 7, 9).unwrap().count_ones(), 3);
    }
}
