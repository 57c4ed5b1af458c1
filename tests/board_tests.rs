use battleship_core::{
    Board, BoardError, CellState, Fleet, FleetBoard, Orientation, ShipType, ShotResult,
    TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn two_ship_board() -> FleetBoard {
    let mut board = FleetBoard::new(Fleet::new(&[
        ShipType::new("Cruiser", 3),
        ShipType::new("Submarine", 1),
    ]));
    board.place(0, 2, 2, Orientation::Horizontal).unwrap();
    board.place(1, 7, 7, Orientation::Vertical).unwrap();
    board
}

#[test]
fn test_strike_hit_and_sink() {
    let mut board = two_ship_board();
    assert_eq!(board.strike(2, 2).unwrap(), ShotResult::Hit);
    assert_eq!(board.strike(2, 3).unwrap(), ShotResult::Hit);
    assert_eq!(
        board.strike(2, 4).unwrap(),
        ShotResult::Sunk {
            name: "Cruiser",
            size: 3
        }
    );
    assert!(board.fleet().ships()[0].is_destroyed());
    assert_eq!(board.strike(0, 0).unwrap(), ShotResult::Miss);

    // repeated strike triggers error
    assert_eq!(board.strike(2, 4).unwrap_err(), BoardError::AlreadyAttacked);
    assert_eq!(board.strike(0, 0).unwrap_err(), BoardError::AlreadyAttacked);
}

#[test]
fn test_place_rejects_overlap_and_overhang() {
    let mut board = FleetBoard::new(Fleet::standard());
    board.place(0, 0, 0, Orientation::Horizontal).unwrap();
    assert_eq!(
        board.place(0, 5, 5, Orientation::Horizontal).unwrap_err(),
        BoardError::ShipAlreadyPlaced
    );
    assert_eq!(
        board.place(1, 0, 3, Orientation::Vertical).unwrap_err(),
        BoardError::ShipOverlaps
    );
    assert_eq!(
        board.place(1, 0, 5, Orientation::Horizontal).unwrap_err(),
        BoardError::ShipOutOfBounds
    );
    assert_eq!(
        board.place(9, 0, 0, Orientation::Horizontal).unwrap_err(),
        BoardError::InvalidIndex
    );
    assert_eq!(board.fleet().ships()[0].orientation(), Orientation::Horizontal);
}

#[test]
fn test_place_random_all_ships_no_overlap() {
    let mut board = FleetBoard::new(Fleet::standard());
    let mut rng = SmallRng::seed_from_u64(42);
    board.place_randomly(&mut rng).unwrap();
    assert!(board.is_fully_placed());
    assert_eq!(
        board.occupied().count_ones(),
        TOTAL_SHIP_CELLS,
        "all ships should be placed without overlap"
    );
}

#[test]
fn test_display_board_mirrors_fleet() {
    let mut fleet = two_ship_board();
    fleet.strike(2, 2).unwrap();
    fleet.strike(5, 5).unwrap();
    let board = Board::from_fleet(&fleet);
    assert_eq!(board.cell(2, 2), Some(CellState::Hit));
    assert_eq!(board.cell(2, 3), Some(CellState::ShipPresent));
    assert_eq!(board.cell(5, 5), Some(CellState::Miss));
    assert_eq!(board.cell(0, 0), Some(CellState::Empty));
    assert_eq!(board.ship_cells(), 4);
}

#[test]
fn test_resolve_marks_cells_once() {
    let mut board = Board::new();
    board.set_ship(1, 1).unwrap();
    assert!(board.resolve(1, 1).unwrap());
    assert!(!board.resolve(1, 2).unwrap());
    assert_eq!(board.resolve(1, 1).unwrap_err(), BoardError::AlreadyAttacked);
    assert!(board.is_resolved(1, 2));
    assert!(!board.is_resolved(0, 0));
    assert!(board.resolve(10, 0).is_err());
    assert_eq!(board.cell(10, 0), None);
}
