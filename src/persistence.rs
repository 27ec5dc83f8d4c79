//! Pane content persistence.
//!
//! Each editable pane's text and the selected model id live in their own
//! files under the data directory, keyed by pane identity. Content is
//! loaded once at mount and written on explicit save actions, never on
//! layout transitions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::layout::PaneId;
use crate::logging;
use crate::models::DEFAULT_MODEL;

/// File-backed store for pane text and the model selection.
#[derive(Debug, Clone)]
pub struct PaneStore {
    data_dir: PathBuf,
}

impl PaneStore {
    /// Store rooted at the platform data directory.
    pub fn default_location() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("Failed to resolve data directory: not found.")?
            .join("promptdeck");
        Ok(Self { data_dir })
    }

    /// Store rooted at an explicit directory (used by tests).
    #[must_use]
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Storage file for a pane's text, or None for panes without stored
    /// content (Root, Response live only in memory; the model selection
    /// has its own file).
    #[must_use]
    pub fn pane_path(&self, pane: PaneId) -> Option<PathBuf> {
        let file = match pane {
            PaneId::UserPrompt => "user_prompt.txt",
            PaneId::SystemPrompt => "system_prompt.txt",
            PaneId::Context => "context.txt",
            _ => return None,
        };
        Some(self.data_dir.join(file))
    }

    fn model_path(&self) -> PathBuf {
        self.data_dir.join("selected_model.txt")
    }

    /// Conversation history location, shared with `ConversationHistory`.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("conversation_history.json")
    }

    /// Seed the data directory: empty pane files and the default model on
    /// first run.
    pub fn ensure_files(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory {}", self.data_dir.display())
        })?;
        for pane in PaneId::CHILDREN {
            if let Some(path) = self.pane_path(pane)
                && !path.exists()
            {
                std::fs::write(&path, "")
                    .with_context(|| format!("Failed to seed {}", path.display()))?;
            }
        }
        let model_path = self.model_path();
        if !model_path.exists() {
            std::fs::write(&model_path, DEFAULT_MODEL)
                .with_context(|| format!("Failed to seed {}", model_path.display()))?;
        }
        Ok(())
    }

    /// Stored text for `pane`. Missing or unreadable files load as empty
    /// rather than failing the mount.
    #[must_use]
    pub fn load(&self, pane: PaneId) -> String {
        let Some(path) = self.pane_path(pane) else {
            return String::new();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                logging::warn(format!("Failed to read {}: {err}", path.display()));
                String::new()
            }
        }
    }

    /// Persist `content` for `pane`. Panes without storage are a no-op.
    pub fn save(&self, pane: PaneId, content: &str) -> Result<()> {
        let Some(path) = self.pane_path(pane) else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Previously selected model id, if one is stored and non-empty.
    #[must_use]
    pub fn load_selected_model(&self) -> Option<String> {
        let content = std::fs::read_to_string(self.model_path()).ok()?;
        let model = content.trim();
        (!model.is_empty()).then(|| model.to_string())
    }

    /// Persist the selected model id.
    pub fn save_selected_model(&self, model: &str) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory {}", self.data_dir.display())
        })?;
        let path = self.model_path();
        std::fs::write(&path, model)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_store() -> (tempfile::TempDir, PaneStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PaneStore::at(dir.path());
        (dir, store)
    }

    #[test]
    fn ensure_files_seeds_panes_and_default_model() {
        let (_dir, store) = temp_store();
        store.ensure_files().unwrap();

        for pane in [PaneId::UserPrompt, PaneId::SystemPrompt, PaneId::Context] {
            assert!(store.pane_path(pane).unwrap().exists());
            assert_eq!(store.load(pane), "");
        }
        assert_eq!(store.load_selected_model().as_deref(), Some(DEFAULT_MODEL));
    }

    #[test]
    fn save_and_load_round_trip() {
        let (_dir, store) = temp_store();
        store.save(PaneId::Context, "three\nlines\nhere").unwrap();
        assert_eq!(store.load(PaneId::Context), "three\nlines\nhere");
    }

    #[test]
    fn ensure_files_does_not_clobber_existing_content() {
        let (_dir, store) = temp_store();
        store.save(PaneId::UserPrompt, "keep me").unwrap();
        store.save_selected_model("anthropic:claude-3-haiku-20240307").unwrap();

        store.ensure_files().unwrap();
        assert_eq!(store.load(PaneId::UserPrompt), "keep me");
        assert_eq!(
            store.load_selected_model().as_deref(),
            Some("anthropic:claude-3-haiku-20240307")
        );
    }

    #[test]
    fn panes_without_storage_are_noops() {
        let (_dir, store) = temp_store();
        assert_eq!(store.pane_path(PaneId::Response), None);
        assert_eq!(store.pane_path(PaneId::Root), None);
        assert!(store.save(PaneId::Response, "ignored").is_ok());
        assert_eq!(store.load(PaneId::Response), "");
    }

    #[test]
    fn missing_model_file_loads_as_none() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load_selected_model(), None);
    }
}
