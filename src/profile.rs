//! Per-player aggregates and the Easy → Medium → Hard campaign.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::ai::Difficulty;
use crate::game::MatchResult;

/// Lifetime totals over every recorded match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerStats {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub shots: usize,
    pub hits: usize,
    pub best_hit_streak: usize,
    pub ships_sunk: usize,
    pub ships_lost: usize,
}

impl PlayerStats {
    pub fn record(&mut self, result: &MatchResult) {
        self.games += 1;
        if result.win {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.shots += result.shots;
        self.hits += result.hits;
        self.best_hit_streak = self.best_hit_streak.max(result.best_hit_streak);
        self.ships_sunk += result.ships_sunk;
        self.ships_lost += result.ships_lost;
    }

    pub fn accuracy(&self) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.hits as f64 / self.shots as f64
        }
    }
}

/// Three matches of rising difficulty. A step is cleared by winning it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Campaign {
    pub id: String,
    pub steps: BTreeMap<Difficulty, MatchResult>,
    pub active: bool,
}

impl Campaign {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: BTreeMap::new(),
            active: true,
        }
    }

    /// First difficulty not yet won, or `None` once all three are.
    pub fn next_difficulty(&self) -> Option<Difficulty> {
        Difficulty::ALL
            .into_iter()
            .find(|d| !self.steps.get(d).is_some_and(|r| r.win))
    }

    pub fn is_complete(&self) -> bool {
        self.next_difficulty().is_none()
    }

    /// Store the latest result for `difficulty`, replacing an earlier try.
    /// Returns true if this result completed the campaign.
    pub fn record(&mut self, difficulty: Difficulty, result: &MatchResult) -> bool {
        self.steps.insert(difficulty, result.clone());
        if self.active && result.win && self.is_complete() {
            self.active = false;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub username: String,
    pub stats: PlayerStats,
    pub history: Vec<MatchResult>,
    pub campaign: Option<Campaign>,
    pub completed_campaigns: Vec<Campaign>,
}

impl Profile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Fold a finished match into the totals and history.
    pub fn record(&mut self, result: &MatchResult) {
        self.stats.record(result);
        self.history.push(result.clone());
    }

    /// The running campaign, opened on first use.
    pub fn campaign_mut(&mut self) -> &mut Campaign {
        let id = alloc::format!("camp_{}", self.username);
        self.campaign.get_or_insert_with(|| Campaign::new(id))
    }

    /// Record a campaign match: totals, history and the campaign step.
    /// A campaign completed by this result moves to `completed_campaigns`.
    pub fn record_campaign(&mut self, difficulty: Difficulty, result: &MatchResult) {
        self.record(result);
        if self.campaign_mut().record(difficulty, result) {
            if let Some(done) = self.campaign.take() {
                self.completed_campaigns.push(done);
            }
        }
    }
}
