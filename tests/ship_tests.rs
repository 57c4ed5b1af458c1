use battleship_core::{Fleet, Ship, ShipType, STANDARD_FLEET, TOTAL_SHIP_CELLS};

#[test]
fn test_register_hit_and_destroyed() {
    let mut ship = Ship::new(ShipType::new("Cruiser", 3));
    assert!(!ship.register_hit());
    assert!(!ship.register_hit());
    assert!(!ship.is_destroyed());
    assert!(ship.register_hit());
    assert!(ship.is_destroyed());
    // Further hits are ignored
    assert!(!ship.register_hit());
    assert_eq!(ship.hit_count(), 3);
}

#[test]
fn test_standard_fleet_composition() {
    let fleet = Fleet::standard();
    assert_eq!(fleet.len(), STANDARD_FLEET.len());
    assert_eq!(fleet.total_cells(), TOTAL_SHIP_CELLS);
    assert_eq!(fleet.smallest_living_size(), Some(1));
    assert!(!fleet.is_destroyed());
}

#[test]
fn test_mark_destroyed_by_size() {
    let mut fleet = Fleet::standard();
    assert!(fleet.mark_destroyed(6));
    assert!(fleet.mark_destroyed(6));
    assert!(!fleet.mark_destroyed(6), "only two carriers");
    assert_eq!(fleet.destroyed_count(), 2);
    assert_eq!(fleet.destroyed_cells(), 12);

    assert!(fleet.mark_destroyed(1));
    assert_eq!(fleet.smallest_living_size(), Some(3));
    assert!(fleet.mark_destroyed(3));
    assert!(fleet.mark_destroyed(4));
    assert!(fleet.mark_destroyed(4));
    assert!(fleet.is_destroyed());
    assert_eq!(fleet.smallest_living_size(), None);
}

#[test]
fn test_ship_types_ignore_damage() {
    let mut fleet = Fleet::standard();
    fleet.mark_destroyed(3);
    let rebuilt = Fleet::new(&fleet.ship_types());
    assert_eq!(rebuilt, Fleet::standard());
}
