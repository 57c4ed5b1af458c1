//! Turn state machine of a match.
//!
//! `MatchService` validates every request against the match state, hands the
//! board work to [`AttackService`], schedules the AI's delayed replies and
//! records the final [`MatchResult`] in a [`ResultStore`].
//!
//! There is no timer: the AI's turn is a `(kind, due)` pair on the match that
//! the caller polls with [`MatchService::enemy_attack_step`].

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;
use log::{debug, info, warn};

use crate::ai::AiPlayer;
use crate::attack::AttackService;
use crate::board::{Board, FleetBoard};
use crate::common::BoardError;
use crate::config::{MatchConfig, FALLBACK_AI_DELAY};
use crate::game::{ActionKind, AttackEvent, Match, MatchResult, MatchStatus, Side};
use crate::store::ResultStore;

/// How a caller should treat a [`MatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request not allowed right now; nothing changed, retry with valid input.
    IllegalAction,
    /// The AI's delay has not elapsed; poll again later.
    NotReady,
    /// Runtime references missing or inconsistent; a setup bug upstream.
    Precondition,
    /// The match finished but its result could not be stored.
    Persistence,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    /// No match attached.
    MatchNotFound,
    /// The match is over and accepts no further actions.
    MatchFinished,
    /// The match has not been started.
    MatchNotInProgress,
    NotPlayersTurn,
    NotEnemyTurn,
    /// The AI has no pending attack.
    NoEnemyAttackScheduled,
    /// The pending AI attack is not due yet.
    ActionNotReady,
    /// Boards, fleets or the AI engine were not wired in.
    MatchNotReady,
    /// Out of bounds or already attacked. Does not consume the turn.
    InvalidAttackCell { row: usize, col: usize },
    /// The AI engine found nothing to attack while the match was running.
    AiExhausted,
    Board(BoardError),
    /// The match finished but appending its result failed.
    ResultNotSaved { result: MatchResult, reason: String },
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::MatchFinished
            | MatchError::MatchNotInProgress
            | MatchError::NotPlayersTurn
            | MatchError::NotEnemyTurn
            | MatchError::NoEnemyAttackScheduled
            | MatchError::InvalidAttackCell { .. } => ErrorKind::IllegalAction,
            MatchError::ActionNotReady => ErrorKind::NotReady,
            MatchError::MatchNotFound
            | MatchError::MatchNotReady
            | MatchError::AiExhausted
            | MatchError::Board(_) => ErrorKind::Precondition,
            MatchError::ResultNotSaved { .. } => ErrorKind::Persistence,
        }
    }
}

impl From<BoardError> for MatchError {
    fn from(err: BoardError) -> Self {
        MatchError::Board(err)
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::MatchNotFound => write!(f, "match not found"),
            MatchError::MatchFinished => write!(f, "match already finished"),
            MatchError::MatchNotInProgress => write!(f, "match is not in progress"),
            MatchError::NotPlayersTurn => write!(f, "not player's turn"),
            MatchError::NotEnemyTurn => write!(f, "not enemy's turn"),
            MatchError::NoEnemyAttackScheduled => write!(f, "no enemy attack scheduled"),
            MatchError::ActionNotReady => write!(f, "next action not ready"),
            MatchError::MatchNotReady => write!(f, "match runtime references not set"),
            MatchError::InvalidAttackCell { row, col } => {
                write!(f, "invalid attack cell ({}, {})", row, col)
            }
            MatchError::AiExhausted => write!(f, "AI found no cell to attack"),
            MatchError::Board(e) => write!(f, "board error: {}", e),
            MatchError::ResultNotSaved { reason, .. } => {
                write!(f, "match result not saved: {}", reason)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatchError {}

/// Both fleets, fully placed, handed over when a match starts.
#[derive(Debug, Clone)]
pub struct MatchSetup {
    /// The human player's fleet; the AI attacks it.
    pub player_fleet: FleetBoard,
    /// The computer's fleet; the player attacks it.
    pub enemy_fleet: FleetBoard,
}

pub struct MatchService<S: ResultStore> {
    attack: AttackService,
    ai_delay: Duration,
    store: S,
}

impl<S: ResultStore> MatchService<S> {
    /// Service recording results in `store`. A zero `ai_delay` falls back to
    /// [`FALLBACK_AI_DELAY`].
    pub fn new(store: S, ai_delay: Duration) -> Self {
        let ai_delay = if ai_delay.is_zero() {
            FALLBACK_AI_DELAY
        } else {
            ai_delay
        };
        Self {
            attack: AttackService::new(),
            ai_delay,
            store,
        }
    }

    pub fn from_config(store: S, config: &MatchConfig) -> Self {
        Self::new(store, config.effective_ai_delay())
    }

    pub fn ai_delay(&self) -> Duration {
        self.ai_delay
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// A new match waiting to be started.
    pub fn create(&self, id: &str) -> Match {
        Match::new(id)
    }

    /// Attach both fleets and start the match with the player to move.
    ///
    /// Each side wins by hitting every ship cell of the other side's fleet.
    pub fn start(&self, m: &mut Match, now: Duration, setup: MatchSetup) -> Result<(), MatchError> {
        if m.is_finished() {
            return Err(MatchError::MatchFinished);
        }
        if !setup.player_fleet.is_fully_placed() || !setup.enemy_fleet.is_fully_placed() {
            return Err(MatchError::MatchNotReady);
        }

        m.player_board = Some(Board::from_fleet(&setup.player_fleet));
        m.enemy_board = Some(Board::from_fleet(&setup.enemy_fleet));
        m.player.total_ship_cells = setup.enemy_fleet.fleet().total_cells();
        m.enemy.total_ship_cells = setup.player_fleet.fleet().total_cells();
        m.player_fleet = Some(setup.player_fleet);
        m.enemy_fleet = Some(setup.enemy_fleet);

        m.start(now);
        info!(
            "match {}: started, player needs {} hits, enemy needs {}",
            m.id(),
            m.player.total_ship_cells,
            m.enemy.total_ship_cells
        );
        Ok(())
    }

    /// Resolve the player's attack at (row, col) on the enemy board.
    ///
    /// A hit keeps the turn; a miss hands it to the AI, whose attack becomes
    /// due `ai_delay` after `now`. An invalid cell changes nothing.
    pub fn player_attack(
        &mut self,
        m: &mut Match,
        now: Duration,
        row: usize,
        col: usize,
    ) -> Result<AttackEvent, MatchError> {
        self.validate_player_attack(m, row, col)?;

        let board = m.enemy_board.as_mut().ok_or(MatchError::MatchNotReady)?;
        let outcome = self.attack.resolve_attack(
            board,
            row,
            col,
            m.player.shots,
            m.player.hits,
            m.player.total_ship_cells,
        )?;
        m.player.shots = outcome.shots;
        m.player.hits = outcome.hits;
        m.player.record_streak(outcome.hit);

        let sunk = match m.enemy_fleet.as_mut().map(|f| f.strike(row, col)) {
            Some(Ok(result)) => result.sunk_name(),
            Some(Err(e)) => {
                warn!("match {}: enemy fleet out of step at ({}, {}): {}", m.id(), row, col, e);
                None
            }
            None => None,
        };

        let mut ev = AttackEvent {
            attacker: Side::Player,
            row,
            col,
            valid: true,
            hit: outcome.hit,
            sunk,
            game_over: false,
            winner: None,
        };

        if outcome.game_over {
            self.finalize(m, now, Side::Player, &mut ev)?;
        } else if !outcome.hit {
            m.set_turn(Side::Enemy);
            m.schedule(ActionKind::EnemyAttack, now + self.ai_delay);
            debug!("match {}: player missed, AI due at {:?}", m.id(), now + self.ai_delay);
        }
        Ok(ev)
    }

    /// Run the AI's pending attack if it is due.
    ///
    /// `ActionNotReady` is the normal answer while the delay runs. A hit
    /// keeps the turn and schedules the next AI shot; a miss returns the turn
    /// to the player.
    pub fn enemy_attack_step(
        &mut self,
        m: &mut Match,
        now: Duration,
        ai: Option<&mut AiPlayer>,
    ) -> Result<AttackEvent, MatchError> {
        self.validate_enemy_step(m, now)?;
        if ai.is_none() || m.player_fleet.is_none() || m.player_board.is_none() {
            return Err(MatchError::MatchNotReady);
        }

        // Consume the schedule first so a re-entrant poll cannot run it twice.
        m.clear_next_action();
        let (Some(ai), Some(logical), Some(display)) =
            (ai, m.player_fleet.as_mut(), m.player_board.as_mut())
        else {
            return Err(MatchError::MatchNotReady);
        };

        let outcome = self
            .attack
            .resolve_ai_attack(
                ai,
                logical,
                display,
                m.enemy.shots,
                m.enemy.hits,
                m.enemy.total_ship_cells,
            )?
            .ok_or(MatchError::AiExhausted)?;
        let hit = outcome.hit();
        m.enemy.shots = outcome.shots;
        m.enemy.hits = outcome.hits;
        m.enemy.record_streak(hit);

        let mut ev = AttackEvent {
            attacker: Side::Enemy,
            row: outcome.shot.row,
            col: outcome.shot.col,
            valid: true,
            hit,
            sunk: outcome.shot.result.sunk_name(),
            game_over: false,
            winner: None,
        };

        if outcome.game_over {
            self.finalize(m, now, Side::Enemy, &mut ev)?;
        } else if hit {
            m.schedule(ActionKind::EnemyAttack, now + self.ai_delay);
        } else {
            m.set_turn(Side::Player);
            m.clear_next_action();
            debug!("match {}: AI missed, player to move", m.id());
        }
        Ok(ev)
    }

    /// Result of `m` from the human player's point of view.
    pub fn result_for_player(&self, m: &Match) -> MatchResult {
        m.result()
    }

    /// Every result recorded by the store.
    pub fn list_results(&self) -> anyhow::Result<Vec<MatchResult>> {
        self.store.list_all()
    }

    fn validate_player_attack(&self, m: &Match, row: usize, col: usize) -> Result<(), MatchError> {
        if m.is_finished() {
            return Err(MatchError::MatchFinished);
        }
        if m.status() != MatchStatus::InProgress {
            return Err(MatchError::MatchNotInProgress);
        }
        if m.turn() != Side::Player {
            return Err(MatchError::NotPlayersTurn);
        }
        let Some(board) = m.enemy_board() else {
            return Err(MatchError::MatchNotReady);
        };
        if m.player.total_ship_cells == 0 {
            return Err(MatchError::MatchNotReady);
        }
        if !Board::in_bounds(row, col) || board.is_resolved(row, col) {
            return Err(MatchError::InvalidAttackCell { row, col });
        }
        Ok(())
    }

    fn validate_enemy_step(&self, m: &Match, now: Duration) -> Result<(), MatchError> {
        if m.is_finished() {
            return Err(MatchError::MatchFinished);
        }
        if m.status() != MatchStatus::InProgress {
            return Err(MatchError::MatchNotInProgress);
        }
        if m.turn() != Side::Enemy {
            return Err(MatchError::NotEnemyTurn);
        }
        let Some(action) = m.next_action().filter(|a| a.kind == ActionKind::EnemyAttack) else {
            return Err(MatchError::NoEnemyAttackScheduled);
        };
        if now < action.due {
            return Err(MatchError::ActionNotReady);
        }
        Ok(())
    }

    fn finalize(
        &mut self,
        m: &mut Match,
        now: Duration,
        winner: Side,
        ev: &mut AttackEvent,
    ) -> Result<(), MatchError> {
        m.finish(now, winner);
        ev.game_over = true;
        ev.winner = Some(winner);

        let result = m.result();
        info!(
            "match {}: finished, winner {:?}, {} shots / {} hits",
            m.id(),
            winner,
            result.shots,
            result.hits
        );
        if let Err(e) = self.store.append(result.clone()) {
            warn!("match {}: result not saved: {:#}", m.id(), e);
            return Err(MatchError::ResultNotSaved {
                result,
                reason: format!("{:#}", e),
            });
        }
        Ok(())
    }
}
