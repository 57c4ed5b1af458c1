//! Resolution of single attacks against a board.
//!
//! [`AttackService`] knows nothing about turns: it mutates one cell, bumps the
//! attacker's counters and reports whether the attacker just won.

use crate::ai::{AiPlayer, AiShot};
use crate::board::{Board, FleetBoard};
use crate::common::{BoardError, ShotResult};

/// Anything the AI engine can shoot at.
pub trait Battlefield {
    type Error;

    /// Resolve a shot at (row, col).
    fn fire(&mut self, row: usize, col: usize) -> Result<ShotResult, Self::Error>;
}

impl Battlefield for FleetBoard {
    type Error = BoardError;

    fn fire(&mut self, row: usize, col: usize) -> Result<ShotResult, BoardError> {
        self.strike(row, col)
    }
}

/// Counters after a player attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub shots: usize,
    pub hits: usize,
    pub hit: bool,
    pub game_over: bool,
}

/// Counters and target after an AI attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiAttackOutcome {
    pub shot: AiShot,
    pub shots: usize,
    pub hits: usize,
    pub game_over: bool,
}

impl AiAttackOutcome {
    pub fn hit(&self) -> bool {
        self.shot.result.is_hit()
    }
}

/// Logical board with its display board kept in step.
struct MirroredTarget<'a> {
    logical: &'a mut FleetBoard,
    display: &'a mut Board,
}

impl Battlefield for MirroredTarget<'_> {
    type Error = BoardError;

    fn fire(&mut self, row: usize, col: usize) -> Result<ShotResult, BoardError> {
        let result = self.logical.strike(row, col)?;
        self.display.mark(row, col, result.is_hit())?;
        Ok(result)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AttackService;

impl AttackService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve an attack at (row, col) on `board`.
    ///
    /// The caller guarantees the cell is unresolved; an already resolved cell
    /// is reported as [`BoardError::AlreadyAttacked`] with counters untouched.
    pub fn resolve_attack(
        &self,
        board: &mut Board,
        row: usize,
        col: usize,
        shots: usize,
        hits: usize,
        total_ship_cells: usize,
    ) -> Result<AttackOutcome, BoardError> {
        let hit = board.resolve(row, col)?;
        let shots = shots + 1;
        let hits = if hit { hits + 1 } else { hits };
        Ok(AttackOutcome {
            shots,
            hits,
            hit,
            game_over: hits == total_ship_cells,
        })
    }

    /// Let `ai` choose a cell and resolve it against the defender's logical
    /// board, mirroring the outcome onto the display board. A sunk ship is
    /// also marked destroyed in the engine's model of the defender's fleet.
    ///
    /// Returns `Ok(None)` if the engine had nothing left to attack.
    pub fn resolve_ai_attack(
        &self,
        ai: &mut AiPlayer,
        logical: &mut FleetBoard,
        display: &mut Board,
        shots: usize,
        hits: usize,
        total_ship_cells: usize,
    ) -> Result<Option<AiAttackOutcome>, BoardError> {
        let mut target = MirroredTarget { logical, display };
        let Some(shot) = ai.attack(&mut target)? else {
            return Ok(None);
        };
        let shots = shots + 1;
        let hits = if shot.result.is_hit() { hits + 1 } else { hits };
        Ok(Some(AiAttackOutcome {
            shot,
            shots,
            hits,
            game_over: hits == total_ship_cells,
        }))
    }
}
