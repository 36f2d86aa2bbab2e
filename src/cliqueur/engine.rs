//! The state-owning game engine.
//!
//! `GameEngine` applies the rules from `logic` and writes the result through
//! its [`KeyValueStore`] after every mutation. Presenters read
//! [`GameSnapshot`]s and drain [`GameEvent`]s; they never touch state directly.

use super::config::EngineConfig;
use super::logic;
use super::save::{self, GameSave};
use super::state::{
    create_quests, GameEvent, GameSnapshot, GameState, Leaderboard, Purchase, Quest, Upgrade,
};
use super::store::KeyValueStore;

/// Oldest events are dropped past this many undrained entries.
const EVENT_CAPACITY: usize = 64;

pub struct GameEngine<S: KeyValueStore> {
    config: EngineConfig,
    store: S,
    state: GameState,
    quests: Vec<Quest>,
    leaderboard: Leaderboard,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore> GameEngine<S> {
    /// Restore a game from `store` with the stock rules.
    pub fn load(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        let quests = create_quests(&config);
        let mut engine = Self {
            config,
            store,
            state: GameState::default(),
            quests,
            leaderboard: Leaderboard::new(),
            events: Vec::new(),
        };
        engine.on_load();
        engine
    }

    /// Read state and leaderboard from the store. Missing or out-of-domain
    /// values take their defaults; nothing here can fail.
    fn on_load(&mut self) {
        let saved = GameSave::read_from(&self.store, &self.config.defaults);
        self.state = GameState::from_save(&saved);
        self.leaderboard = Leaderboard::from_entries(
            save::read_leaderboard(&self.store),
            self.config.leaderboard_size,
        );
        // Quests are derived from the score, so a restored run shows what it already earned.
        logic::evaluate_quests(&mut self.quests, self.state.score);
        log::info!(
            "game loaded: score={} multiplier={} auto_rate={} leaderboard={}",
            self.state.score,
            self.state.multiplier,
            self.state.auto_rate,
            self.leaderboard.len()
        );
    }

    /// Manual tap. Returns the gain for the "+N" feedback.
    pub fn tap(&mut self) -> u64 {
        let gain = logic::tap(&mut self.state);
        let score = self.state.score;
        self.push_event(GameEvent::Tapped { gain, score });
        self.evaluate_quests(score);
        self.persist();
        self.record_score(score);
        gain
    }

    /// One elapsed second. Does nothing at all (no writes, no events) while
    /// no auto-clicker is owned.
    pub fn tick(&mut self) -> Option<u64> {
        let gain = logic::tick(&mut self.state)?;
        let score = self.state.score;
        self.push_event(GameEvent::AutoClicked { gain, score });
        self.evaluate_quests(score);
        self.persist();
        self.record_score(score);
        Some(gain)
    }

    pub fn buy_multiplier(&mut self) -> Purchase {
        let result = logic::buy_multiplier(&mut self.state, self.config.multiplier_cost_step);
        let level = self.state.multiplier;
        self.after_purchase(Upgrade::Multiplier, result, level);
        result
    }

    pub fn buy_auto_clicker(&mut self) -> Purchase {
        let result = logic::buy_auto_clicker(&mut self.state, self.config.auto_click_cost_step);
        let level = self.state.auto_rate;
        self.after_purchase(Upgrade::AutoClicker, result, level);
        result
    }

    fn after_purchase(&mut self, upgrade: Upgrade, result: Purchase, level: u64) {
        match result {
            Purchase::Bought { cost } => {
                log::debug!("bought {} for {cost} (level {level})", upgrade.name());
                self.push_event(GameEvent::Bought {
                    upgrade,
                    cost,
                    level,
                });
                self.persist();
            }
            Purchase::Declined { cost, score } => {
                self.push_event(GameEvent::PurchaseDeclined {
                    upgrade,
                    cost,
                    score,
                });
            }
        }
    }

    /// Bank the current score on the leaderboard and start a new run.
    pub fn restart(&mut self) {
        let final_score = self.state.score;
        self.record_score(final_score);
        self.state = GameState::from_save(&self.config.defaults);
        if self.config.reset_quests_on_restart {
            self.quests = create_quests(&self.config);
        }
        self.persist();
        log::info!("game restarted (final score {final_score})");
        self.push_event(GameEvent::Restarted { final_score });
    }

    /// Complete every quest `score` satisfies. Returns the indices that
    /// changed on this call.
    pub fn evaluate_quests(&mut self, score: u64) -> Vec<usize> {
        let flipped = logic::evaluate_quests(&mut self.quests, score);
        for &index in &flipped {
            let description = self.quests[index].description.clone();
            log::info!("quest completed: {description}");
            self.push_event(GameEvent::QuestCompleted { index, description });
        }
        flipped
    }

    /// Insert `score` into the top-N board and persist the board. Returns the
    /// rank it holds, if it made the cut.
    pub fn record_score(&mut self, score: u64) -> Option<usize> {
        let rank = self
            .leaderboard
            .insert(score, self.config.leaderboard_size);
        save::write_leaderboard(&mut self.store, self.leaderboard.entries());
        rank
    }

    pub fn leaderboard(&self) -> &[u64] {
        self.leaderboard.entries()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn can_afford_multiplier(&self) -> bool {
        self.state.score >= self.state.multiplier_cost
    }

    pub fn can_afford_auto_clicker(&self) -> bool {
        self.state.score >= self.state.auto_click_cost
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state.clone(),
            quests: self.quests().to_vec(),
            leaderboard: self.leaderboard().to_vec(),
            can_afford_multiplier: self.can_afford_multiplier(),
            can_afford_auto_clicker: self.can_afford_auto_clicker(),
            best: self.leaderboard.top_score(),
        }
    }

    /// Hand over every event since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
        if self.events.len() > EVENT_CAPACITY {
            self.events.remove(0);
        }
    }

    fn persist(&mut self) {
        self.state.to_save().write_to(&mut self.store);
    }
}
