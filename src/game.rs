//! Match state: status, turn ownership, per-side counters and the single
//! pending AI action.

use alloc::format;
use alloc::string::String;
use core::time::Duration;

use crate::board::{Board, FleetBoard};

/// Lifecycle of a match. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchStatus {
    Waiting,
    InProgress,
    Finished,
}

/// One side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Enemy,
}

/// Deferred work checked by polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    EnemyAttack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAction {
    pub kind: ActionKind,
    /// Earliest timestamp at which the action may run.
    pub due: Duration,
}

/// Shot counters and hit streaks of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideStats {
    pub shots: usize,
    pub hits: usize,
    pub hit_streak: usize,
    pub max_hit_streak: usize,
    /// Ship cells of the opposing fleet; reaching it in `hits` wins.
    pub total_ship_cells: usize,
}

impl SideStats {
    pub fn misses(&self) -> usize {
        self.shots - self.hits
    }

    /// Extend the streak on a hit, reset it on a miss.
    pub(crate) fn record_streak(&mut self, hit: bool) {
        if hit {
            self.hit_streak += 1;
            self.max_hit_streak = self.max_hit_streak.max(self.hit_streak);
        } else {
            self.hit_streak = 0;
        }
    }

    fn reset(&mut self) {
        *self = SideStats {
            total_ship_cells: self.total_ship_cells,
            ..SideStats::default()
        };
    }
}

/// Immutable record of one resolved (or rejected) attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct AttackEvent {
    pub attacker: Side,
    pub row: usize,
    pub col: usize,
    pub valid: bool,
    pub hit: bool,
    /// Name of the ship this attack sank, if any.
    pub sunk: Option<&'static str>,
    pub game_over: bool,
    /// Set only when `game_over` is true.
    pub winner: Option<Side>,
}

/// Outcome of a finished match from the human player's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    pub win: bool,
    pub shots: usize,
    pub hits: usize,
    pub best_hit_streak: usize,
    pub ships_lost: usize,
    pub ships_sunk: usize,
    pub duration_ms: u64,
}

impl MatchResult {
    /// Fraction of shots that hit, 0.0 when no shot was fired.
    pub fn accuracy(&self) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.hits as f64 / self.shots as f64
        }
    }

    /// Duration as `mm:ss`.
    pub fn formatted_duration(&self) -> String {
        let total_secs = self.duration_ms / 1000;
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

/// Counters shown by the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub player_shots: usize,
    pub player_hits: usize,
    pub enemy_shots: usize,
    pub enemy_hits: usize,
    pub player_turn: bool,
}

/// A single match session. Boards are attached by `MatchService::start`.
#[derive(Debug, Clone)]
pub struct Match {
    id: String,
    status: MatchStatus,
    turn: Side,
    winner: Option<Side>,
    next_action: Option<ScheduledAction>,
    started_at: Option<Duration>,
    finished_at: Option<Duration>,
    pub(crate) player: SideStats,
    pub(crate) enemy: SideStats,
    /// Player's waters, attacked by the AI.
    pub(crate) player_board: Option<Board>,
    pub(crate) player_fleet: Option<FleetBoard>,
    /// Enemy waters, attacked by the player.
    pub(crate) enemy_board: Option<Board>,
    pub(crate) enemy_fleet: Option<FleetBoard>,
}

impl Match {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: MatchStatus::Waiting,
            turn: Side::Player,
            winner: None,
            next_action: None,
            started_at: None,
            finished_at: None,
            player: SideStats::default(),
            enemy: SideStats::default(),
            player_board: None,
            player_fleet: None,
            enemy_board: None,
            enemy_fleet: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn next_action(&self) -> Option<ScheduledAction> {
        self.next_action
    }

    pub fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Duration> {
        self.finished_at
    }

    pub fn player_stats(&self) -> &SideStats {
        &self.player
    }

    pub fn enemy_stats(&self) -> &SideStats {
        &self.enemy
    }

    /// The player's display board (the AI's target).
    pub fn player_board(&self) -> Option<&Board> {
        self.player_board.as_ref()
    }

    /// The enemy's display board (the player's target).
    pub fn enemy_board(&self) -> Option<&Board> {
        self.enemy_board.as_ref()
    }

    pub fn player_fleet(&self) -> Option<&FleetBoard> {
        self.player_fleet.as_ref()
    }

    pub fn enemy_fleet(&self) -> Option<&FleetBoard> {
        self.enemy_fleet.as_ref()
    }

    pub fn clear_next_action(&mut self) {
        self.next_action = None;
    }

    pub(crate) fn schedule(&mut self, kind: ActionKind, due: Duration) {
        self.next_action = Some(ScheduledAction { kind, due });
    }

    pub(crate) fn set_turn(&mut self, turn: Side) {
        self.turn = turn;
    }

    /// Move to `InProgress` with the player to move and every counter reset.
    pub fn start(&mut self, now: Duration) {
        self.status = MatchStatus::InProgress;
        self.turn = Side::Player;
        self.winner = None;
        self.started_at = Some(now);
        self.finished_at = None;
        self.clear_next_action();
        self.player.reset();
        self.enemy.reset();
    }

    pub(crate) fn finish(&mut self, now: Duration, winner: Side) {
        self.status = MatchStatus::Finished;
        self.winner = Some(winner);
        self.finished_at = Some(now);
        self.clear_next_action();
    }

    pub fn stats(&self) -> Stats {
        Stats {
            player_shots: self.player.shots,
            player_hits: self.player.hits,
            enemy_shots: self.enemy.shots,
            enemy_hits: self.enemy.hits,
            player_turn: self.turn == Side::Player,
        }
    }

    /// Result for the human player. Duration is zero until the match ends.
    pub fn result(&self) -> MatchResult {
        let duration_ms = match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.saturating_sub(start).as_millis() as u64,
            _ => 0,
        };
        MatchResult {
            win: self.winner == Some(Side::Player),
            shots: self.player.shots,
            hits: self.player.hits,
            best_hit_streak: self.player.max_hit_streak,
            ships_lost: self
                .player_fleet
                .as_ref()
                .map_or(0, |f| f.fleet().destroyed_count()),
            ships_sunk: self
                .enemy_fleet
                .as_ref()
                .map_or(0, |f| f.fleet().destroyed_count()),
            duration_ms,
        }
    }
}
