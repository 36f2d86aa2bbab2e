//! Caca Cliqueur game state definitions.

use super::config::{EngineConfig, QuestSpec};
use super::save::GameSave;

/// The five persisted counters of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Accumulated clicks.
    pub score: u64,
    /// Clicks gained per tap (always >= 1).
    pub multiplier: u64,
    /// Clicks gained per elapsed second.
    pub auto_rate: u64,
    /// Price of the next multiplier upgrade.
    pub multiplier_cost: u64,
    /// Price of the next auto-clicker upgrade.
    pub auto_click_cost: u64,
}

impl GameState {
    pub fn from_save(save: &GameSave) -> Self {
        Self {
            score: save.score,
            multiplier: save.multiplier,
            auto_rate: save.auto_rate,
            multiplier_cost: save.multiplier_cost,
            auto_click_cost: save.auto_click_cost,
        }
    }

    pub fn to_save(&self) -> GameSave {
        GameSave {
            score: self.score,
            multiplier: self.multiplier,
            auto_rate: self.auto_rate,
            multiplier_cost: self.multiplier_cost,
            auto_click_cost: self.auto_click_cost,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::from_save(&GameSave::default())
    }
}

/// A one-way achievement keyed to a score threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quest {
    pub description: String,
    pub threshold: u64,
    /// Flips false → true once and stays there.
    pub completed: bool,
}

impl Quest {
    pub fn new(def: &QuestSpec) -> Self {
        Self {
            description: def.description.clone(),
            threshold: def.threshold,
            completed: false,
        }
    }

    /// Display label used by the quest list ("Terminée" / "En cours").
    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Terminée"
        } else {
            "En cours"
        }
    }
}

/// Build the fresh (all incomplete) quest list from the configuration.
pub fn create_quests(config: &EngineConfig) -> Vec<Quest> {
    config.quests.iter().map(Quest::new).collect()
}

/// Bounded, descending list of historical scores.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<u64>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already decoded entries. Callers pass values in any order;
    /// they are normalised to the same shape `insert` maintains.
    pub fn from_entries(mut entries: Vec<u64>, capacity: usize) -> Self {
        entries.sort_unstable_by(|a, b| b.cmp(a));
        entries.dedup();
        entries.truncate(capacity);
        Self { entries }
    }

    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().copied()
    }

    /// Insert a score, keep the board sorted descending, collapse duplicates
    /// (the persisted form is a set) and drop everything past `capacity`.
    /// Returns the 1-indexed rank the score holds afterwards, if any.
    pub fn insert(&mut self, score: u64, capacity: usize) -> Option<usize> {
        match self.entries.binary_search_by(|e| score.cmp(e)) {
            Ok(_) => {}
            Err(pos) => self.entries.insert(pos, score),
        }
        self.entries.truncate(capacity);
        self.entries
            .iter()
            .position(|&e| e == score)
            .map(|i| i + 1)
    }
}

/// Which of the two upgrades an event or purchase refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upgrade {
    Multiplier,
    AutoClicker,
}

impl Upgrade {
    pub fn name(&self) -> &'static str {
        match self {
            Upgrade::Multiplier => "multiplicateur",
            Upgrade::AutoClicker => "clic automatique",
        }
    }
}

/// Outcome of a purchase attempt. A decline is not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Purchase {
    Bought { cost: u64 },
    Declined { cost: u64, score: u64 },
}

impl Purchase {
    #[cfg(test)]
    pub fn is_bought(&self) -> bool {
        matches!(self, Purchase::Bought { .. })
    }
}

/// Something observable that happened inside the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Tapped { gain: u64, score: u64 },
    AutoClicked { gain: u64, score: u64 },
    Bought { upgrade: Upgrade, cost: u64, level: u64 },
    PurchaseDeclined { upgrade: Upgrade, cost: u64, score: u64 },
    QuestCompleted { index: usize, description: String },
    Restarted { final_score: u64 },
}

/// Read-only copy of everything a presenter needs to draw a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub state: GameState,
    pub quests: Vec<Quest>,
    pub leaderboard: Vec<u64>,
    pub can_afford_multiplier: bool,
    pub can_afford_auto_clicker: bool,
    /// Highest banked score, if any.
    pub best: Option<u64>,
}
