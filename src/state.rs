//! Emoji Clicker save-state shape.
//!
//! The game logic owns the full state; this crate only names the fields the
//! formulas read. Everything else rides along in `extra` so that a save/load
//! cycle never drops fields it doesn't know about.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upgrade levels keyed by upgrade name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upgrades {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_multiplier: Option<f64>,
    /// Upgrades the formulas don't read (cosmetics, unlocks, ...).
    #[serde(flatten)]
    pub other: BTreeMap<String, f64>,
}

/// Completed achievement ids. Only the count feeds into formulas.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievements {
    pub completed: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Achievements {
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }
}

/// Permanent bonuses carried across prestige resets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prestige {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_bonus: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A passive producer type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoClicker {
    pub base_value: f64,
    #[serde(default)]
    pub owned: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AutoClicker {
    pub fn new(base_value: f64, owned: u32) -> Self {
        Self {
            base_value,
            owned,
            extra: Map::new(),
        }
    }
}

/// Producer type name → producer.
pub type AutoClickers = BTreeMap<String, AutoClicker>;

/// Typed view of a stored save.
///
/// `last_saved` and `version` are written by `SaveManager::save_game`;
/// game code normally leaves them `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub emojis: f64,
    #[serde(default)]
    pub total_emojis: f64,
    #[serde(default)]
    pub upgrades: Upgrades,
    #[serde(default)]
    pub achievements: Achievements,
    #[serde(default)]
    pub prestige: Prestige,
    #[serde(default)]
    pub auto_clickers: AutoClickers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Fields owned by the game logic that this crate doesn't model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
