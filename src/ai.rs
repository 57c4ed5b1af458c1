// Hunt/target/destroy targeting for the computer-controlled side.
// Fixed-size knowledge grid plus a FIFO candidate queue; no pointers into the
// board being attacked, every shot goes through a `Battlefield`.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use log::{debug, trace};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::attack::Battlefield;
use crate::common::ShotResult;
use crate::config::BOARD_SIZE;
use crate::ship::{Fleet, Orientation};
use crate::strategy::Strategy;

const GRID_SIZE: usize = BOARD_SIZE as usize;

/// What the AI has learned about one opponent cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Knowledge {
    #[default]
    Unknown,
    Miss,
    Hit,
}

/// AI strength, expressed as a fixed strategy composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    Easy,
    Medium,
    #[default]
    Hard,
}

impl Difficulty {
    /// Campaign order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Strategies tried each turn, in priority order.
    pub fn strategies(self) -> &'static [Strategy] {
        match self {
            Difficulty::Easy => &[Strategy::RandomSearch],
            Difficulty::Medium => &[Strategy::FullLine, Strategy::RandomSearch],
            Difficulty::Hard => &[
                Strategy::Discovery,
                Strategy::FullLine,
                Strategy::StrategicSearch,
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl core::str::FromStr for Difficulty {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err("difficulty must be easy, medium or hard"),
        }
    }
}

/// One shot taken by the AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiShot {
    pub row: usize,
    pub col: usize,
    pub result: ShotResult,
    /// Strategy that chose the cell.
    pub strategy: Strategy,
}

/// Targeting engine for the computer-controlled side.
///
/// The engine keeps its own model of the opponent fleet (ship sizes and which
/// are sunk) and never looks at the opponent's ship placement: everything it
/// knows comes from shot results.
#[derive(Debug, Clone)]
pub struct AiPlayer {
    knowledge: [[Knowledge; GRID_SIZE]; GRID_SIZE],
    queue: VecDeque<(usize, usize)>,
    chasing: bool,
    enemy_fleet: Fleet,
    strategies: &'static [Strategy],
    rng: SmallRng,
}

impl AiPlayer {
    /// Engine targeting a fleet of the given composition.
    pub fn new(enemy_fleet: Fleet, strategies: &'static [Strategy], seed: u64) -> Self {
        Self {
            knowledge: [[Knowledge::Unknown; GRID_SIZE]; GRID_SIZE],
            queue: VecDeque::new(),
            chasing: false,
            enemy_fleet,
            strategies,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn with_difficulty(difficulty: Difficulty, enemy_fleet: Fleet, seed: u64) -> Self {
        Self::new(enemy_fleet, difficulty.strategies(), seed)
    }

    pub fn knowledge(&self, row: usize, col: usize) -> Option<Knowledge> {
        self.knowledge.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Queued candidates, oldest first.
    pub fn candidates(&self) -> Vec<(usize, usize)> {
        self.queue.iter().copied().collect()
    }

    /// `true` once a ship's orientation has been locked in.
    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    pub fn enemy_fleet(&self) -> &Fleet {
        &self.enemy_fleet
    }

    pub fn strategies(&self) -> &'static [Strategy] {
        self.strategies
    }

    /// Size of the smallest opponent ship still afloat.
    pub fn size_of_next_ship(&self) -> Option<usize> {
        self.enemy_fleet.smallest_living_size()
    }

    /// Record that an opponent ship of `size` went down.
    pub fn fleet_ship_destroyed(&mut self, size: usize) {
        if !self.enemy_fleet.mark_destroyed(size) {
            debug!("ai: no living ship of size {} left to mark destroyed", size);
        }
    }

    /// Queue (row, col) for probing. Out-of-bounds, resolved and already
    /// queued cells are ignored. Returns `true` if the cell was queued.
    pub fn enqueue(&mut self, row: usize, col: usize) -> bool {
        if self.knowledge(row, col) != Some(Knowledge::Unknown) || self.queue.contains(&(row, col))
        {
            return false;
        }
        self.queue.push_back((row, col));
        true
    }

    /// Take one shot at `field` using the first strategy that fires.
    ///
    /// Returns `Ok(None)` only when every strategy declines, which happens
    /// once the opponent fleet is gone or no cell is left to try.
    pub fn attack<F: Battlefield>(&mut self, field: &mut F) -> Result<Option<AiShot>, F::Error> {
        self.prune_queue();
        let strategies = self.strategies;
        for &strategy in strategies {
            if let Some(shot) = strategy.try_attack(self, field)? {
                debug!(
                    "ai: {:?} fired at ({}, {}) -> {:?}",
                    strategy, shot.row, shot.col, shot.result
                );
                return Ok(Some(shot));
            }
        }
        Ok(None)
    }

    pub(crate) fn has_candidates(&self) -> bool {
        !self.queue.is_empty()
    }

    pub(crate) fn pop_candidate(&mut self) -> Option<(usize, usize)> {
        while let Some((r, c)) = self.queue.pop_front() {
            if self.is_unknown(r, c) {
                return Some((r, c));
            }
        }
        None
    }

    /// Fire at (row, col), learn from the result and plan the follow-up.
    pub(crate) fn strike<F: Battlefield>(
        &mut self,
        field: &mut F,
        row: usize,
        col: usize,
        strategy: Strategy,
    ) -> Result<AiShot, F::Error> {
        let result = field.fire(row, col)?;
        self.record(row, col, result);
        match result {
            ShotResult::Hit if self.follows_up() => self.follow_hit(row, col),
            ShotResult::Miss if self.follows_up() => {
                self.prune_queue();
                if self.queue.is_empty() {
                    self.reseed_open_hits();
                }
            }
            _ => {}
        }
        Ok(AiShot {
            row,
            col,
            result,
            strategy,
        })
    }

    /// First untried cell where the smallest living ship could still lie,
    /// on a diagonal stride of that ship's size. Columns are scanned for a
    /// vertical fit first, then rows for a horizontal fit; any unknown cell
    /// is the last resort.
    pub(crate) fn strategic_cell(&self, size: usize) -> Option<(usize, usize)> {
        let stride = size.max(1);
        let on_stride = |r: usize, c: usize| (r + c) % stride == 0;
        for c in 0..GRID_SIZE {
            for r in 0..GRID_SIZE {
                if on_stride(r, c) && self.room(r, c, Orientation::Vertical) >= size {
                    return Some((r, c));
                }
            }
        }
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                if on_stride(r, c) && self.room(r, c, Orientation::Horizontal) >= size {
                    return Some((r, c));
                }
            }
        }
        self.unknown_cells().next()
    }

    /// Uniformly random untried cell.
    pub(crate) fn random_cell(&mut self) -> Option<(usize, usize)> {
        let cells: Vec<(usize, usize)> = self.unknown_cells().collect();
        if cells.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..cells.len());
        Some(cells[idx])
    }

    fn record(&mut self, row: usize, col: usize, result: ShotResult) {
        self.knowledge[row][col] = match result {
            ShotResult::Miss => Knowledge::Miss,
            ShotResult::Hit | ShotResult::Sunk { .. } => Knowledge::Hit,
        };
        if let ShotResult::Sunk { size, .. } = result {
            self.fleet_ship_destroyed(size);
            self.queue.clear();
            self.chasing = false;
            if self.follows_up() {
                self.reseed_open_hits();
            }
        }
    }

    /// Plan after a hit that left the ship afloat: sweep the line through
    /// neighbouring hits, or probe the four neighbours of an isolated hit.
    fn follow_hit(&mut self, row: usize, col: usize) {
        let horizontal = self.is_hit_at(row, col, 0, -1) || self.is_hit_at(row, col, 0, 1);
        let vertical = self.is_hit_at(row, col, -1, 0) || self.is_hit_at(row, col, 1, 0);

        self.queue.clear();
        if horizontal {
            self.sweep(row, col, 0, -1);
            self.sweep(row, col, 0, 1);
            self.chasing = true;
        } else if vertical {
            self.sweep(row, col, -1, 0);
            self.sweep(row, col, 1, 0);
            self.chasing = true;
        } else {
            self.enqueue_neighbors(row, col);
            self.chasing = false;
        }
        trace!(
            "ai: after hit at ({}, {}) chasing={} queue={:?}",
            row,
            col,
            self.chasing,
            self.queue
        );

        if self.queue.is_empty() {
            self.reseed_open_hits();
        }
    }

    /// Walk from (row, col) along (dr, dc), passing over known hits and
    /// queueing the run of unknown cells that follows.
    fn sweep(&mut self, row: usize, col: usize, dr: isize, dc: isize) {
        let mut cur = (row, col);
        while let Some((r, c)) = step(cur, dr, dc) {
            if self.knowledge[r][c] != Knowledge::Hit {
                break;
            }
            cur = (r, c);
        }
        while let Some((r, c)) = step(cur, dr, dc) {
            if self.knowledge[r][c] != Knowledge::Unknown {
                break;
            }
            self.enqueue(r, c);
            cur = (r, c);
        }
    }

    fn enqueue_neighbors(&mut self, row: usize, col: usize) {
        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            if let Some((r, c)) = step((row, col), dr, dc) {
                self.enqueue(r, c);
            }
        }
    }

    /// Requeue the unknown neighbours of every hit when some hits are not
    /// accounted for by sunk ships.
    fn reseed_open_hits(&mut self) {
        if self.open_hits() == 0 {
            return;
        }
        self.chasing = false;
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                if self.knowledge[r][c] == Knowledge::Hit {
                    self.enqueue_neighbors(r, c);
                }
            }
        }
    }

    /// Drop resolved candidates; while chasing also drop candidates that no
    /// longer touch a hit (the sweep ran into water).
    fn prune_queue(&mut self) {
        let knowledge = &self.knowledge;
        let chasing = self.chasing;
        self.queue.retain(|&(r, c)| {
            knowledge[r][c] == Knowledge::Unknown
                && (!chasing || touches_hit(knowledge, r, c))
        });
    }

    fn open_hits(&self) -> usize {
        let hits = self
            .knowledge
            .iter()
            .flatten()
            .filter(|&&k| k == Knowledge::Hit)
            .count();
        hits.saturating_sub(self.enemy_fleet.destroyed_cells())
    }

    fn follows_up(&self) -> bool {
        self.strategies
            .iter()
            .any(|s| matches!(s, Strategy::Discovery | Strategy::FullLine))
    }

    fn is_unknown(&self, row: usize, col: usize) -> bool {
        self.knowledge(row, col) == Some(Knowledge::Unknown)
    }

    fn is_hit_at(&self, row: usize, col: usize, dr: isize, dc: isize) -> bool {
        step((row, col), dr, dc).is_some_and(|(r, c)| self.knowledge[r][c] == Knowledge::Hit)
    }

    /// Length of the unknown run through (row, col) along `orientation`,
    /// or 0 if the cell itself is resolved.
    fn room(&self, row: usize, col: usize, orientation: Orientation) -> usize {
        if !self.is_unknown(row, col) {
            return 0;
        }
        let (dr, dc) = match orientation {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        };
        let mut len = 1;
        for dir in [1isize, -1] {
            let mut cur = (row, col);
            while let Some((r, c)) = step(cur, dr * dir, dc * dir) {
                if self.knowledge[r][c] != Knowledge::Unknown {
                    break;
                }
                len += 1;
                cur = (r, c);
            }
        }
        len
    }

    fn unknown_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..GRID_SIZE)
            .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.knowledge[r][c] == Knowledge::Unknown)
    }
}

/// Neighbour of `from` one step along (dr, dc), if on the grid.
fn step(from: (usize, usize), dr: isize, dc: isize) -> Option<(usize, usize)> {
    let r = from.0.checked_add_signed(dr)?;
    let c = from.1.checked_add_signed(dc)?;
    (r < GRID_SIZE && c < GRID_SIZE).then_some((r, c))
}

fn touches_hit(knowledge: &[[Knowledge; GRID_SIZE]; GRID_SIZE], row: usize, col: usize) -> bool {
    [(-1, 0), (1, 0), (0, -1), (0, 1)]
        .into_iter()
        .filter_map(|(dr, dc)| step((row, col), dr, dc))
        .any(|(r, c)| knowledge[r][c] == Knowledge::Hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::ShipType;

    fn engine() -> AiPlayer {
        AiPlayer::with_difficulty(
            Difficulty::Hard,
            Fleet::new(&[ShipType::new("Cruiser", 3)]),
            7,
        )
    }

    #[test]
    fn room_counts_unknown_run_through_cell() {
        let mut ai = engine();
        assert_eq!(ai.room(4, 4, Orientation::Vertical), GRID_SIZE);
        ai.knowledge[2][4] = Knowledge::Miss;
        ai.knowledge[7][4] = Knowledge::Miss;
        assert_eq!(ai.room(4, 4, Orientation::Vertical), 4);
        assert_eq!(ai.room(2, 4, Orientation::Vertical), 0);
    }

    #[test]
    fn sweep_passes_over_hits_and_stops_at_water() {
        let mut ai = engine();
        ai.knowledge[3][4] = Knowledge::Hit;
        ai.knowledge[3][5] = Knowledge::Hit;
        ai.knowledge[3][8] = Knowledge::Miss;
        ai.sweep(3, 4, 0, 1);
        assert_eq!(ai.candidates(), vec![(3, 6), (3, 7)]);
    }

    #[test]
    fn strategic_cell_skips_cells_too_cramped_for_the_ship() {
        let mut ai = engine();
        // Wall off (0,0) both ways so no size-3 ship fits through it.
        ai.knowledge[1][0] = Knowledge::Miss;
        ai.knowledge[0][1] = Knowledge::Miss;
        let (r, c) = ai.strategic_cell(3).unwrap();
        assert_ne!((r, c), (0, 0));
        assert_eq!((r + c) % 3, 0);
    }

    #[test]
    fn step_stays_on_grid() {
        assert_eq!(step((0, 0), -1, 0), None);
        assert_eq!(step((9, 9), 0, 1), None);
        assert_eq!(step((4, 5), -1, 0), Some((3, 5)));
    }
}
