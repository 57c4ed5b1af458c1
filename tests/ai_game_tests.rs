use std::collections::HashSet;

use battleship_core::{AiPlayer, Difficulty, Fleet, FleetBoard, TOTAL_SHIP_CELLS};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn play_out(difficulty: Difficulty, seed: u64) -> usize {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut target = FleetBoard::new(Fleet::standard());
    target.place_randomly(&mut rng).unwrap();
    let mut ai = AiPlayer::with_difficulty(difficulty, Fleet::standard(), seed);

    let mut seen = HashSet::new();
    while !target.fleet().is_destroyed() {
        let shot = ai
            .attack(&mut target)
            .unwrap()
            .expect("engine declined with ships afloat");
        assert!(seen.insert((shot.row, shot.col)), "repeated ({}, {})", shot.row, shot.col);
        assert!(seen.len() <= 100, "game took too many shots");
    }
    assert!(ai.enemy_fleet().is_destroyed());
    seen.len()
}

#[test]
fn every_difficulty_sinks_the_standard_fleet() {
    for difficulty in Difficulty::ALL {
        for seed in 0..20 {
            let shots = play_out(difficulty, seed);
            assert!(shots >= TOTAL_SHIP_CELLS);
        }
    }
}

#[test]
fn hard_beats_easy_on_average() {
    let hard: usize = (0..30).map(|s| play_out(Difficulty::Hard, s)).sum();
    let easy: usize = (0..30).map(|s| play_out(Difficulty::Easy, s)).sum();
    assert!(hard < easy, "hard {} vs easy {}", hard, easy);
}
