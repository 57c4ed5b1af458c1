use std::time::Duration;

use battleship_core::{
    AiPlayer, CellState, Difficulty, Fleet, FleetBoard, InMemoryResultStore, MatchError,
    MatchService, MatchSetup, Side, BOARD_SIZE,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

const DELAY: Duration = Duration::from_millis(500);

fn random_fleet(rng: &mut SmallRng) -> FleetBoard {
    let mut board = FleetBoard::new(Fleet::standard());
    board.place_randomly(rng).unwrap();
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn counters_and_boards_stay_consistent(
        seed in any::<u64>(),
        targets in prop::collection::vec((0..BOARD_SIZE as usize + 1, 0..BOARD_SIZE as usize), 1..400),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut svc = MatchService::new(InMemoryResultStore::new(), DELAY);
        let mut m = svc.create("prop");
        svc.start(&mut m, Duration::ZERO, MatchSetup {
            player_fleet: random_fleet(&mut rng),
            enemy_fleet: random_fleet(&mut rng),
        }).unwrap();
        let mut ai = AiPlayer::with_difficulty(Difficulty::Medium, Fleet::standard(), seed);
        let mut now = Duration::ZERO;
        let mut peak = 0;

        for (row, col) in targets {
            if m.is_finished() {
                prop_assert_eq!(svc.player_attack(&mut m, now, row, col).unwrap_err(), MatchError::MatchFinished);
                continue;
            }
            match m.turn() {
                Side::Player => {
                    let before = m.stats();
                    let resolved = m.enemy_board().unwrap().cell(row, col).map_or(true, CellState::is_resolved);
                    match svc.player_attack(&mut m, now, row, col) {
                        Ok(ev) => prop_assert!(!resolved && ev.valid),
                        Err(e) => {
                            prop_assert!(resolved);
                            prop_assert_eq!(e, MatchError::InvalidAttackCell { row, col });
                            prop_assert_eq!(m.stats(), before);
                        }
                    }
                }
                Side::Enemy => {
                    now += DELAY;
                    svc.enemy_attack_step(&mut m, now, Some(&mut ai)).unwrap();
                }
            }

            for (side, stats, board) in [
                (Side::Player, m.player_stats(), m.enemy_board().unwrap()),
                (Side::Enemy, m.enemy_stats(), m.player_board().unwrap()),
            ] {
                prop_assert_eq!(stats.hits, board.count(CellState::Hit));
                prop_assert_eq!(stats.shots, stats.hits + board.count(CellState::Miss));
                prop_assert!(stats.hit_streak <= stats.max_hit_streak);
                prop_assert_eq!(stats.hits == stats.total_ship_cells, m.winner() == Some(side));
            }
            prop_assert!(m.player_stats().max_hit_streak >= peak);
            peak = m.player_stats().max_hit_streak;
        }

        let stored = svc.list_results().unwrap();
        prop_assert_eq!(stored.len(), usize::from(m.is_finished()));
    }
}
