use battleship_core::{Board, BoardError, CellState, Fleet, FleetBoard, BOARD_SIZE};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn random_fleet(seed: u64) -> FleetBoard {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = FleetBoard::new(Fleet::standard());
    board.place_randomly(&mut rng).unwrap();
    let strikes = rng.random_range(0..BOARD_SIZE as usize * 3);
    for _ in 0..strikes {
        let r = rng.random_range(0..BOARD_SIZE as usize);
        let c = rng.random_range(0..BOARD_SIZE as usize);
        let _ = board.strike(r, c);
    }
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn strike_rejects_second_attempt(seed in any::<u64>(), row in 0..BOARD_SIZE as usize, col in 0..BOARD_SIZE as usize) {
        let mut board = random_fleet(seed);
        let _ = board.strike(row, col);
        let before = board.clone();
        prop_assert_eq!(board.strike(row, col).unwrap_err(), BoardError::AlreadyAttacked);
        prop_assert_eq!(board, before);
    }

    #[test]
    fn display_board_agrees_with_fleet(seed in any::<u64>()) {
        let fleet = random_fleet(seed);
        let board = Board::from_fleet(&fleet);
        let hits = board.count(CellState::Hit);
        let damage: usize = fleet.fleet().ships().iter().map(|s| s.hit_count()).sum();
        prop_assert_eq!(hits, damage);
        prop_assert_eq!(board.ship_cells(), fleet.fleet().total_cells());
        prop_assert_eq!(hits + board.count(CellState::Miss), fleet.attacked().count_ones());
    }
}
