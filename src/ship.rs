//! Ship definitions and the fleet owned by one side.

use alloc::vec::Vec;

use crate::config::STANDARD_FLEET;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Type of ship: name and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    size: usize,
}

impl ShipType {
    pub const fn new(name: &'static str, size: usize) -> Self {
        Self { name, size }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// A ship and its damage. `hit_count` never exceeds `size` and never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    ship_type: ShipType,
    hit_count: usize,
    orientation: Orientation,
}

impl Ship {
    pub fn new(ship_type: ShipType) -> Self {
        Self {
            ship_type,
            hit_count: 0,
            orientation: Orientation::default(),
        }
    }

    pub fn ship_type(&self) -> ShipType {
        self.ship_type
    }

    pub fn name(&self) -> &'static str {
        self.ship_type.name()
    }

    pub fn size(&self) -> usize {
        self.ship_type.size()
    }

    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub(crate) fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Record one hit. Returns `true` if this hit destroyed the ship.
    pub fn register_hit(&mut self) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.hit_count += 1;
        self.is_destroyed()
    }

    /// Force the ship into the destroyed state.
    pub fn mark_destroyed(&mut self) {
        self.hit_count = self.size();
    }

    pub fn is_destroyed(&self) -> bool {
        self.hit_count >= self.size()
    }
}

/// Fixed collection of ships owned by one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Fleet {
    /// Build an undamaged fleet from ship definitions.
    pub fn new(types: &[ShipType]) -> Self {
        Self {
            ships: types.iter().copied().map(Ship::new).collect(),
        }
    }

    /// The six-ship fleet used by a regular match.
    pub fn standard() -> Self {
        Self::new(&STANDARD_FLEET)
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub(crate) fn ship_mut(&mut self, index: usize) -> Option<&mut Ship> {
        self.ships.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// `true` when every ship is destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.ships.iter().all(Ship::is_destroyed)
    }

    /// Sum of all ship sizes; the hit count that ends the match.
    pub fn total_cells(&self) -> usize {
        self.ships.iter().map(Ship::size).sum()
    }

    pub fn destroyed_count(&self) -> usize {
        self.ships.iter().filter(|s| s.is_destroyed()).count()
    }

    /// Cells belonging to destroyed ships.
    pub fn destroyed_cells(&self) -> usize {
        self.ships
            .iter()
            .filter(|s| s.is_destroyed())
            .map(Ship::size)
            .sum()
    }

    /// Size of the smallest ship still afloat, or `None` if all are destroyed.
    pub fn smallest_living_size(&self) -> Option<usize> {
        self.ships
            .iter()
            .filter(|s| !s.is_destroyed())
            .map(Ship::size)
            .min()
    }

    /// Mark the first living ship of `size` as destroyed.
    /// Returns `false` if no such ship is afloat.
    pub fn mark_destroyed(&mut self, size: usize) -> bool {
        match self
            .ships
            .iter_mut()
            .find(|s| s.size() == size && !s.is_destroyed())
        {
            Some(ship) => {
                ship.mark_destroyed();
                true
            }
            None => false,
        }
    }

    /// Definitions of every ship, ignoring damage.
    pub fn ship_types(&self) -> Vec<ShipType> {
        self.ships.iter().map(Ship::ship_type).collect()
    }
}
