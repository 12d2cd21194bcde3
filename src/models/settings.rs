//! Application Settings
//!
//! Serializable configuration persisted as JSON by the config service.
//! Section minimum lengths and dependency edges are validation rules, not
//! settings, and are deliberately absent here.

use serde::{Deserialize, Serialize};

/// Undo/redo history tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Newest N entries kept as full snapshots before delta conversion
    #[serde(default = "default_full_snapshot_window")]
    pub full_snapshot_window: usize,
    /// Hard cap on total entries; oldest are dropped beyond this
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Consecutive AI edits within this window collapse into one undo step
    #[serde(default = "default_ai_batch_window_secs")]
    pub ai_batch_window_secs: u64,
}

fn default_full_snapshot_window() -> usize {
    20
}

fn default_max_entries() -> usize {
    500
}

fn default_ai_batch_window_secs() -> u64 {
    30
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            full_snapshot_window: default_full_snapshot_window(),
            max_entries: default_max_entries(),
            ai_batch_window_secs: default_ai_batch_window_secs(),
        }
    }
}

/// Knowledge-base search defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Default result limit when a tool call omits one
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Results below this relevance score are dropped
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

fn default_max_results() -> usize {
    5
}

fn default_min_score() -> f64 {
    0.2
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            min_score: default_min_score(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Override for the SQLite database path (None = default location)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

impl AppConfig {
    /// Validate the configuration, returning a message for the first
    /// problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.history.full_snapshot_window == 0 {
            return Err("history.full_snapshot_window must be at least 1".to_string());
        }
        if self.history.max_entries < self.history.full_snapshot_window {
            return Err(
                "history.max_entries must be at least history.full_snapshot_window".to_string(),
            );
        }
        if self.knowledge.max_results == 0 {
            return Err("knowledge.max_results must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.knowledge.min_score) {
            return Err("knowledge.min_score must be within [0, 1]".to_string());
        }
        Ok(())
    }

    /// Apply a partial update.
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(database_path) = update.database_path {
            self.database_path = Some(database_path);
        }
        if let Some(history) = update.history {
            self.history = history;
        }
        if let Some(knowledge) = update.knowledge {
            self.knowledge = knowledge;
        }
    }
}

/// Partial settings update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge: Option<KnowledgeConfig>,
}
