use std::cell::Cell;
use std::time::Duration;

use battleship_core::{
    BattleSession, Clock, Difficulty, Fleet, FleetBoard, InMemoryResultStore, MatchError,
    MatchService, MatchSetup, Orientation, Profile, Side, TOTAL_SHIP_CELLS,
};

const DELAY: Duration = Duration::from_millis(500);

#[derive(Default)]
struct ManualClock(Cell<Duration>);

impl ManualClock {
    fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

fn stacked_fleet() -> FleetBoard {
    let mut board = FleetBoard::new(Fleet::standard());
    for i in 0..board.fleet().len() {
        board.place(i, i + 1, 0, Orientation::Horizontal).unwrap();
    }
    board
}

fn setup() -> MatchSetup {
    MatchSetup {
        player_fleet: stacked_fleet(),
        enemy_fleet: stacked_fleet(),
    }
}

fn session(clock: &ManualClock) -> BattleSession<InMemoryResultStore, &ManualClock> {
    BattleSession::new(MatchService::new(InMemoryResultStore::new(), DELAY), clock)
}

fn sink_everything<C: Clock>(s: &mut BattleSession<InMemoryResultStore, C>) -> battleship_core::MatchResult {
    let cells: Vec<_> = stacked_fleet().occupied().iter_set_bits().collect();
    let mut result = None;
    for (r, c) in cells {
        result = s.player_attack(r, c).unwrap();
    }
    result.expect("last hit ends the match")
}

#[test]
fn calls_without_a_match_report_not_found() {
    let clock = ManualClock::default();
    let mut s = session(&clock);
    assert_eq!(s.player_attack(0, 0).unwrap_err(), MatchError::MatchNotFound);
    assert_eq!(s.enemy_attack_step().unwrap_err(), MatchError::MatchNotFound);
    assert!(s.stats().is_none());
    assert!(s.winner_name().is_none());
}

#[test]
fn polling_before_the_delay_is_quiet() {
    let clock = ManualClock::default();
    let mut s = session(&clock);
    s.start(setup(), Difficulty::Hard, 3).unwrap();

    assert_eq!(s.player_attack(0, 0).unwrap(), None);
    let ev = s.last_event().unwrap();
    assert_eq!(ev.attacker, Side::Player);
    assert!(!ev.hit);
    assert!(!s.stats().unwrap().player_turn);

    clock.advance(Duration::from_millis(100));
    assert_eq!(s.enemy_attack_step().unwrap(), None);
    assert_eq!(s.stats().unwrap().enemy_shots, 0);

    clock.advance(Duration::from_millis(500));
    assert_eq!(s.enemy_attack_step().unwrap(), None);
    assert_eq!(s.stats().unwrap().enemy_shots, 1);
    assert_eq!(s.last_event().unwrap().attacker, Side::Enemy);
}

#[test]
fn win_is_folded_into_the_profile() {
    let clock = ManualClock::default();
    let mut s = session(&clock).with_profile(Profile::new("ana"));
    s.start(setup(), Difficulty::Easy, 1).unwrap();
    clock.advance(Duration::from_secs(42));

    let result = sink_everything(&mut s);
    assert!(result.win);
    assert_eq!(result.hits, TOTAL_SHIP_CELLS);
    assert_eq!(result.duration_ms, 42_000);
    assert_eq!(s.winner_name(), Some("Player"));
    assert!(s.last_event().unwrap().game_over);

    // Finished matches make the enemy poll a no-op.
    assert_eq!(s.enemy_attack_step().unwrap(), None);
    assert_eq!(s.player_attack(0, 0).unwrap_err(), MatchError::MatchFinished);

    let profile = s.profile().unwrap();
    assert_eq!(profile.stats.games, 1);
    assert_eq!(profile.stats.wins, 1);
    assert_eq!(profile.stats.best_hit_streak, TOTAL_SHIP_CELLS);
    assert_eq!(profile.history, vec![result]);
    assert_eq!(s.service().list_results().unwrap().len(), 1);
}

#[test]
fn campaign_walks_through_the_difficulties() {
    let clock = ManualClock::default();
    let mut s = session(&clock).with_profile(Profile::new("ana"));

    for expected in Difficulty::ALL {
        let difficulty = s.start_campaign_match(setup(), 7).unwrap();
        assert_eq!(difficulty, expected);
        assert_eq!(s.difficulty(), expected);
        sink_everything(&mut s);
    }

    let profile = s.take_profile().unwrap();
    assert!(profile.campaign.is_none());
    assert_eq!(profile.completed_campaigns.len(), 1);
    assert_eq!(profile.stats.wins, 3);
    assert_eq!(
        s.start_campaign_match(setup(), 7).unwrap_err(),
        MatchError::MatchNotReady,
        "no profile attached any more"
    );
}

#[test]
fn random_start_places_both_fleets() {
    let clock = ManualClock::default();
    let mut s = session(&clock);
    s.start_random(Difficulty::Medium, 99).unwrap();
    let m = s.current().unwrap();
    assert!(m.player_fleet().unwrap().is_fully_placed());
    assert!(m.enemy_fleet().unwrap().is_fully_placed());
    assert_eq!(m.enemy_board().unwrap().ship_cells(), TOTAL_SHIP_CELLS);
    assert_eq!(s.ai().unwrap().strategies(), Difficulty::Medium.strategies());
}
