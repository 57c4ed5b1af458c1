use battleship_core::{
    AiPlayer, AttackService, Board, BoardError, CellState, Difficulty, Fleet, FleetBoard,
    Orientation, ShipType, ShotResult,
};

fn cruiser_only() -> Fleet {
    Fleet::new(&[ShipType::new("Cruiser", 3)])
}

#[test]
fn resolve_attack_counts_every_shot() {
    let svc = AttackService::new();
    let mut board = Board::new();
    board.set_ship(0, 0).unwrap();
    board.set_ship(0, 1).unwrap();

    let miss = svc.resolve_attack(&mut board, 5, 5, 0, 0, 2).unwrap();
    assert_eq!((miss.shots, miss.hits, miss.hit, miss.game_over), (1, 0, false, false));
    assert_eq!(board.cell(5, 5), Some(CellState::Miss));

    let hit = svc.resolve_attack(&mut board, 0, 0, miss.shots, miss.hits, 2).unwrap();
    assert_eq!((hit.shots, hit.hits, hit.hit, hit.game_over), (2, 1, true, false));

    let last = svc.resolve_attack(&mut board, 0, 1, hit.shots, hit.hits, 2).unwrap();
    assert!(last.game_over);
}

#[test]
fn resolve_attack_on_resolved_cell_fails() {
    let svc = AttackService::new();
    let mut board = Board::new();
    svc.resolve_attack(&mut board, 3, 3, 0, 0, 1).unwrap();
    assert_eq!(
        svc.resolve_attack(&mut board, 3, 3, 1, 0, 1).unwrap_err(),
        BoardError::AlreadyAttacked
    );
}

#[test]
fn ai_attack_mirrors_display_and_marks_sunk_ship() {
    let svc = AttackService::new();
    let mut logical = FleetBoard::new(cruiser_only());
    logical.place(0, 4, 4, Orientation::Vertical).unwrap();
    let mut display = Board::from_fleet(&logical);
    let mut ai = AiPlayer::with_difficulty(Difficulty::Hard, cruiser_only(), 3);

    let (mut shots, mut hits) = (0, 0);
    loop {
        let outcome = svc
            .resolve_ai_attack(&mut ai, &mut logical, &mut display, shots, hits, 3)
            .unwrap()
            .expect("engine must fire while the cruiser floats");
        shots = outcome.shots;
        hits = outcome.hits;
        let expected = if outcome.hit() { CellState::Hit } else { CellState::Miss };
        assert_eq!(display.cell(outcome.shot.row, outcome.shot.col), Some(expected));
        if outcome.game_over {
            assert!(matches!(outcome.shot.result, ShotResult::Sunk { size: 3, .. }));
            break;
        }
        assert!(shots < 100);
    }
    assert_eq!(hits, 3);
    assert!(ai.enemy_fleet().is_destroyed());
    assert_eq!(ai.size_of_next_ship(), None);
    assert!(logical.fleet().is_destroyed());
}
