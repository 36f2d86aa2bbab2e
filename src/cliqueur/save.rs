//! Mapping between the game record and the key-value store.
//!
//! All key names and all defaulting rules live here. A stored value outside
//! its field's domain (negative score, zero multiplier or price) is treated
//! the same as a missing key.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;

pub const KEY_SCORE: &str = "clickCount";
pub const KEY_MULTIPLIER: &str = "multiplicateur";
pub const KEY_AUTO_RATE: &str = "clicsParSeconde";
pub const KEY_MULTIPLIER_COST: &str = "multiplicateurCost";
pub const KEY_AUTO_CLICK_COST: &str = "autoClickCost";
pub const KEY_LEADERBOARD: &str = "leaderboard";

/// Persisted form of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSave {
    pub score: u64,
    pub multiplier: u64,
    pub auto_rate: u64,
    pub multiplier_cost: u64,
    pub auto_click_cost: u64,
}

impl Default for GameSave {
    fn default() -> Self {
        Self {
            score: 0,
            multiplier: 1,
            auto_rate: 0,
            multiplier_cost: 10,
            auto_click_cost: 20,
        }
    }
}

impl GameSave {
    /// Read every field, falling back to `defaults` field by field.
    pub fn read_from(store: &dyn KeyValueStore, defaults: &GameSave) -> Self {
        Self {
            score: read_u64(store, KEY_SCORE, defaults.score, 0),
            multiplier: read_u64(store, KEY_MULTIPLIER, defaults.multiplier, 1),
            auto_rate: read_u64(store, KEY_AUTO_RATE, defaults.auto_rate, 0),
            multiplier_cost: read_u64(store, KEY_MULTIPLIER_COST, defaults.multiplier_cost, 1),
            auto_click_cost: read_u64(store, KEY_AUTO_CLICK_COST, defaults.auto_click_cost, 1),
        }
    }

    pub fn write_to(&self, store: &mut dyn KeyValueStore) {
        store.set_int(KEY_SCORE, to_stored(self.score));
        store.set_int(KEY_MULTIPLIER, to_stored(self.multiplier));
        store.set_int(KEY_AUTO_RATE, to_stored(self.auto_rate));
        store.set_int(KEY_MULTIPLIER_COST, to_stored(self.multiplier_cost));
        store.set_int(KEY_AUTO_CLICK_COST, to_stored(self.auto_click_cost));
    }
}

fn read_u64(store: &dyn KeyValueStore, key: &str, default: u64, min: u64) -> u64 {
    let raw = store.get_int(key, to_stored(default));
    match u64::try_from(raw) {
        Ok(v) if v >= min => v,
        _ => default,
    }
}

fn to_stored(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Leaderboard entries as decimal strings. Order and duplicates are lost.
pub fn encode_leaderboard(entries: &[u64]) -> BTreeSet<String> {
    entries.iter().map(|e| e.to_string()).collect()
}

/// Parse stored entries, skipping anything that is not a non-negative integer.
/// Returned unsorted; `Leaderboard::from_entries` orders them.
pub fn decode_leaderboard(stored: &BTreeSet<String>) -> Vec<u64> {
    stored
        .iter()
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .collect()
}

pub fn read_leaderboard(store: &dyn KeyValueStore) -> Vec<u64> {
    decode_leaderboard(&store.get_string_set(KEY_LEADERBOARD, BTreeSet::new()))
}

pub fn write_leaderboard(store: &mut dyn KeyValueStore, entries: &[u64]) {
    store.set_string_set(KEY_LEADERBOARD, encode_leaderboard(entries));
}
