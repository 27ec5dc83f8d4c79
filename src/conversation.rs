//! Conversation history: completed prompt/response turns persisted as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logging;

/// A single completed exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub user_prompt: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub context: String,
    pub response: String,
}

/// Append-only turn log, trimmed to a maximum length and written back to
/// disk after every append.
#[derive(Debug)]
pub struct ConversationHistory {
    path: PathBuf,
    max_items: usize,
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    /// Load history from `path`, starting empty if the file is missing or
    /// unreadable. A corrupt history is a notice, not a startup failure.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>, max_items: usize) -> Self {
        let path = path.into();
        let turns = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(turns) => turns,
                Err(err) => {
                    logging::warn(format!(
                        "Ignoring corrupt history at {}: {err}",
                        path.display()
                    ));
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self {
            path,
            max_items,
            turns,
        }
    }

    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    #[allow(dead_code)]
    #[must_use]
    pub fn recent_turns(&self, count: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(count);
        &self.turns[start..]
    }

    /// Record a completed exchange and persist. Trims oldest turns beyond
    /// the configured maximum.
    pub fn add_turn(&mut self, turn: ConversationTurn) -> Result<()> {
        self.turns.push(turn);
        if self.max_items > 0 && self.turns.len() > self.max_items {
            let excess = self.turns.len() - self.max_items;
            self.turns.drain(0..excess);
        }
        self.save()
    }

    /// Drop all turns and persist the empty log.
    #[allow(dead_code)]
    pub fn clear(&mut self) -> Result<()> {
        self.turns.clear();
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(&self.turns).context("Failed to serialize history")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write history to {}", self.path.display()))
    }

    /// Export the full history as JSON to an arbitrary file.
    pub fn export_to_file(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.turns).context("Failed to serialize history")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to export history to {}", path.display()))
    }
}
