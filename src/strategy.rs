//! Targeting strategies of the AI engine.
//!
//! The set is closed: each turn the engine walks its fixed, ordered slice of
//! strategies and stops at the first one that fires.

use crate::ai::{AiPlayer, AiShot};
use crate::attack::Battlefield;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Drain loose candidates around an isolated hit. Only before a ship's
    /// orientation is known.
    Discovery,
    /// Drain the candidate queue, chasing or not.
    FullLine,
    /// Stride search sized to the smallest living ship. Only with an empty queue.
    StrategicSearch,
    /// Uniformly random untried cell. Only with an empty queue.
    RandomSearch,
}

impl Strategy {
    /// Fire one shot if this strategy applies, `Ok(None)` if it declines.
    pub fn try_attack<F: Battlefield>(
        self,
        ai: &mut AiPlayer,
        field: &mut F,
    ) -> Result<Option<AiShot>, F::Error> {
        let target = match self {
            Strategy::Discovery => {
                if ai.is_chasing() {
                    return Ok(None);
                }
                ai.pop_candidate()
            }
            Strategy::FullLine => ai.pop_candidate(),
            Strategy::StrategicSearch => {
                if ai.has_candidates() {
                    return Ok(None);
                }
                ai.size_of_next_ship()
                    .and_then(|size| ai.strategic_cell(size))
            }
            Strategy::RandomSearch => {
                if ai.has_candidates() {
                    return Ok(None);
                }
                ai.random_cell()
            }
        };
        match target {
            Some((row, col)) => ai.strike(field, row, col, self).map(Some),
            None => Ok(None),
        }
    }
}
