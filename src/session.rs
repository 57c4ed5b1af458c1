#![cfg(feature = "std")]

//! One human player against the AI, driven by a clock.
//!
//! The session owns the match, the AI engine and an optional [`Profile`];
//! callers only pass coordinates and poll [`BattleSession::enemy_attack_step`]
//! once per frame.

use std::time::{Duration, Instant};

use log::{info, warn};
use rand::{rngs::SmallRng, SeedableRng};

use crate::ai::{AiPlayer, Difficulty};
use crate::board::FleetBoard;
use crate::game::{AttackEvent, Match, MatchResult, Side, Stats};
use crate::match_service::{MatchError, MatchService, MatchSetup};
use crate::profile::Profile;
use crate::ship::Fleet;
use crate::store::ResultStore;

/// Source of monotonic timestamps.
pub trait Clock {
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Wall clock measured from its own creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

pub struct BattleSession<S: ResultStore, C: Clock> {
    service: MatchService<S>,
    clock: C,
    current: Option<Match>,
    ai: Option<AiPlayer>,
    difficulty: Difficulty,
    campaign: bool,
    profile: Option<Profile>,
    last_event: Option<AttackEvent>,
    matches_started: u64,
}

impl<S: ResultStore, C: Clock> BattleSession<S, C> {
    pub fn new(service: MatchService<S>, clock: C) -> Self {
        Self {
            service,
            clock,
            current: None,
            ai: None,
            difficulty: Difficulty::default(),
            campaign: false,
            profile: None,
            last_event: None,
            matches_started: 0,
        }
    }

    /// Attach a profile that receives every finished match.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn take_profile(&mut self) -> Option<Profile> {
        self.profile.take()
    }

    pub fn service(&self) -> &MatchService<S> {
        &self.service
    }

    pub fn current(&self) -> Option<&Match> {
        self.current.as_ref()
    }

    pub fn ai(&self) -> Option<&AiPlayer> {
        self.ai.as_ref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Start a new match; the AI models the player's fleet composition.
    pub fn start(
        &mut self,
        setup: MatchSetup,
        difficulty: Difficulty,
        seed: u64,
    ) -> Result<(), MatchError> {
        let target = Fleet::new(&setup.player_fleet.fleet().ship_types());
        let ai = AiPlayer::with_difficulty(difficulty, target, seed);

        self.matches_started += 1;
        let mut m = self
            .service
            .create(&format!("match-{}", self.matches_started));
        self.service.start(&mut m, self.clock.now(), setup)?;

        info!("session: {} started against {} AI", m.id(), difficulty.name());
        self.current = Some(m);
        self.ai = Some(ai);
        self.difficulty = difficulty;
        self.campaign = false;
        self.last_event = None;
        Ok(())
    }

    /// Start with both standard fleets placed at random from `seed`.
    pub fn start_random(&mut self, difficulty: Difficulty, seed: u64) -> Result<(), MatchError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut player_fleet = FleetBoard::new(Fleet::standard());
        player_fleet.place_randomly(&mut rng)?;
        let mut enemy_fleet = FleetBoard::new(Fleet::standard());
        enemy_fleet.place_randomly(&mut rng)?;
        self.start(
            MatchSetup {
                player_fleet,
                enemy_fleet,
            },
            difficulty,
            seed,
        )
    }

    /// Start the next step of the attached profile's campaign.
    pub fn start_campaign_match(
        &mut self,
        setup: MatchSetup,
        seed: u64,
    ) -> Result<Difficulty, MatchError> {
        let difficulty = self
            .profile
            .as_mut()
            .and_then(|p| p.campaign_mut().next_difficulty())
            .ok_or(MatchError::MatchNotReady)?;
        self.start(setup, difficulty, seed)?;
        self.campaign = true;
        Ok(difficulty)
    }

    /// Attack the enemy board. Returns the result once the match is over.
    pub fn player_attack(
        &mut self,
        row: usize,
        col: usize,
    ) -> Result<Option<MatchResult>, MatchError> {
        let m = self.current.as_mut().ok_or(MatchError::MatchNotFound)?;
        let outcome = self.service.player_attack(m, self.clock.now(), row, col);
        self.conclude(outcome)
    }

    /// Let the AI act if its attack is due. Waiting is not an error.
    pub fn enemy_attack_step(&mut self) -> Result<Option<MatchResult>, MatchError> {
        let m = self.current.as_mut().ok_or(MatchError::MatchNotFound)?;
        let outcome = self
            .service
            .enemy_attack_step(m, self.clock.now(), self.ai.as_mut());
        match outcome {
            Err(
                MatchError::ActionNotReady
                | MatchError::NoEnemyAttackScheduled
                | MatchError::MatchNotInProgress
                | MatchError::MatchFinished,
            ) => Ok(None),
            other => self.conclude(other),
        }
    }

    pub fn stats(&self) -> Option<Stats> {
        self.current.as_ref().map(Match::stats)
    }

    pub fn winner_name(&self) -> Option<&'static str> {
        match self.current.as_ref()?.winner()? {
            Side::Player => Some("Player"),
            Side::Enemy => Some("Enemy"),
        }
    }

    pub fn last_event(&self) -> Option<&AttackEvent> {
        self.last_event.as_ref()
    }

    fn conclude(
        &mut self,
        outcome: Result<AttackEvent, MatchError>,
    ) -> Result<Option<MatchResult>, MatchError> {
        match outcome {
            Ok(ev) => {
                self.last_event = Some(ev);
                if !ev.game_over {
                    return Ok(None);
                }
                let Some(m) = self.current.as_ref() else {
                    return Err(MatchError::MatchNotFound);
                };
                let result = self.service.result_for_player(m);
                self.record(&result);
                Ok(Some(result))
            }
            Err(MatchError::ResultNotSaved { result, reason }) => {
                warn!("session: keeping result in profile only: {}", reason);
                self.record(&result);
                Err(MatchError::ResultNotSaved { result, reason })
            }
            Err(e) => Err(e),
        }
    }

    fn record(&mut self, result: &MatchResult) {
        let Some(profile) = self.profile.as_mut() else {
            return;
        };
        if self.campaign {
            profile.record_campaign(self.difficulty, result);
        } else {
            profile.record(result);
        }
    }
}
