//! Tunable rules of the game economy.
//!
//! `EngineConfig::default()` reproduces the shipped game. Every field has a
//! serde default so a partial JSON override only needs the keys it changes.

use std::fmt;

use serde::Deserialize;

use super::save::GameSave;

/// One quest definition: a label and the score that completes it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct QuestSpec {
    pub description: String,
    pub threshold: u64,
}

impl QuestSpec {
    pub fn new(description: &str, threshold: u64) -> Self {
        Self {
            description: description.to_string(),
            threshold,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// State of a brand new run (also what `restart` resets to).
    pub defaults: GameSave,
    /// Added to the multiplier price after each purchase.
    pub multiplier_cost_step: u64,
    /// Added to the auto-clicker price after each purchase.
    pub auto_click_cost_step: u64,
    /// Number of scores kept on the leaderboard.
    pub leaderboard_size: usize,
    /// Whether `restart` also clears completed quests. Off: quests are
    /// permanent achievements across runs.
    pub reset_quests_on_restart: bool,
    pub quests: Vec<QuestSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            defaults: GameSave::default(),
            multiplier_cost_step: 10,
            auto_click_cost_step: 15,
            leaderboard_size: 10,
            reset_quests_on_restart: false,
            quests: vec![
                QuestSpec::new("Atteindre 100 clics", 100),
                QuestSpec::new("Atteindre 500 clics", 500),
                QuestSpec::new("Faire 50 clics en 10 secondes", 50),
            ],
        }
    }
}

/// Most scores the leaderboard may keep.
pub const MAX_LEADERBOARD_SIZE: usize = 10;

/// Why a rule override was refused.
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "malformed JSON: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid rules: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl EngineConfig {
    /// Parse a JSON override on top of the defaults and check it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject rules under which a tap could gain nothing, an upgrade could be
    /// free or the board could outgrow the top ten.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.defaults;
        if d.multiplier < 1 {
            return Err(ConfigError::Invalid("defaults.multiplier must be >= 1".into()));
        }
        if d.multiplier_cost < 1 {
            return Err(ConfigError::Invalid("defaults.multiplier_cost must be >= 1".into()));
        }
        if d.auto_click_cost < 1 {
            return Err(ConfigError::Invalid("defaults.auto_click_cost must be >= 1".into()));
        }
        if !(1..=MAX_LEADERBOARD_SIZE).contains(&self.leaderboard_size) {
            return Err(ConfigError::Invalid(format!(
                "leaderboard_size must be between 1 and {MAX_LEADERBOARD_SIZE}, got {}",
                self.leaderboard_size
            )));
        }
        if let Some(q) = self.quests.iter().find(|q| q.threshold < 1) {
            return Err(ConfigError::Invalid(format!(
                "quest '{}' needs a threshold >= 1",
                q.description
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_economy() {
        let c = EngineConfig::default();
        assert_eq!(c.multiplier_cost_step, 10);
        assert_eq!(c.auto_click_cost_step, 15);
        assert_eq!(c.leaderboard_size, 10);
        assert!(!c.reset_quests_on_restart);
        let thresholds: Vec<u64> = c.quests.iter().map(|q| q.threshold).collect();
        assert_eq!(thresholds, vec![100, 500, 50]);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let c = EngineConfig::from_json(r#"{ "reset_quests_on_restart": true }"#).unwrap();
        assert!(c.reset_quests_on_restart);
        assert_eq!(c.multiplier_cost_step, 10);
        assert_eq!(c.quests.len(), 3);
        assert_eq!(c.defaults, GameSave::default());
    }

    #[test]
    fn json_can_replace_quests() {
        let c = EngineConfig::from_json(
            r#"{ "quests": [ { "description": "Premier clic", "threshold": 1 } ] }"#,
        )
        .unwrap();
        assert_eq!(c.quests, vec![QuestSpec::new("Premier clic", 1)]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            EngineConfig::from_json("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn default_rules_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    fn rejected(json: &str) -> bool {
        matches!(EngineConfig::from_json(json), Err(ConfigError::Invalid(_)))
    }

    #[test]
    fn zero_multiplier_is_rejected() {
        assert!(rejected(r#"{ "defaults": { "multiplier": 0 } }"#));
    }

    #[test]
    fn free_upgrades_are_rejected() {
        assert!(rejected(r#"{ "defaults": { "multiplier_cost": 0 } }"#));
        assert!(rejected(r#"{ "defaults": { "auto_click_cost": 0 } }"#));
        assert!(rejected(r#"{ "defaults": { "multiplier": 0, "multiplier_cost": 0 } }"#));
    }

    #[test]
    fn leaderboard_size_is_bounded() {
        assert!(rejected(r#"{ "leaderboard_size": 0 }"#));
        assert!(rejected(r#"{ "leaderboard_size": 11 }"#));
        assert!(EngineConfig::from_json(r#"{ "leaderboard_size": 5 }"#).is_ok());
        assert!(EngineConfig::from_json(r#"{ "leaderboard_size": 10 }"#).is_ok());
    }

    #[test]
    fn zero_threshold_quest_is_rejected() {
        assert!(rejected(
            r#"{ "quests": [ { "description": "Rien", "threshold": 0 } ] }"#
        ));
    }

    #[test]
    fn error_message_names_the_field() {
        let err = EngineConfig::from_json(r#"{ "defaults": { "multiplier": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("defaults.multiplier"));
    }
}
