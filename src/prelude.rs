//! Commonly used types and utilities for ease of import.

pub use crate::{
    AiPlayer, AttackEvent, AttackService, Board, Difficulty, Fleet, FleetBoard, Match,
    MatchConfig, MatchError, MatchResult, MatchService, MatchSetup, ResultStore, ShotResult, Side,
};

#[cfg(feature = "std")]
pub use crate::{init_logging, BattleSession, Clock, FileResultStore, SystemClock};
