//! Settings system - Persistent user preferences
//!
//! Settings are stored at ~/.config/promptdeck/settings.toml

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::model_config;

/// User settings with defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// External editor command for the `e` binding
    pub editor: String,
    /// Stream responses token-by-token instead of waiting for completion
    pub streaming: bool,
    /// Default model to use when none has been selected yet
    pub default_model: Option<String>,
    /// Maximum number of conversation turns kept in history
    pub max_history_items: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: "nvim".to_string(),
            streaming: true,
            default_model: None,
            max_history_items: 100,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to resolve config directory: not found.")?
            .join("promptdeck");
        Ok(config_dir.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;
        // Drop persisted models that have left the catalog.
        settings.default_model = settings
            .default_model
            .filter(|name| model_config(name).is_some());
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Set a single setting by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "editor" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Failed to update setting: editor command cannot be empty.");
                }
                self.editor = value.trim().to_string();
            }
            "streaming" | "stream" => {
                self.streaming = parse_bool(value)?;
            }
            "default_model" | "model" => {
                if model_config(value).is_none() {
                    anyhow::bail!(
                        "Failed to update setting: unknown model '{value}'. Use a full 'provider:model' id."
                    );
                }
                self.default_model = Some(value.to_string());
            }
            "max_history_items" | "max_history" => {
                self.max_history_items = value.parse().map_err(|_| {
                    anyhow::anyhow!(
                        "Failed to update setting: invalid count '{value}'. Expected a number."
                    )
                })?;
            }
            _ => anyhow::bail!(
                "Failed to update setting: unknown key '{key}'. Expected: editor, streaming, default_model, max_history_items."
            ),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => anyhow::bail!("Failed to parse boolean: '{value}'. Expected true or false."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.editor, "nvim");
        assert!(settings.streaming);
        assert_eq!(settings.default_model, None);
        assert_eq!(settings.max_history_items, 100);
    }

    #[test]
    fn set_validates_model_names() {
        let mut settings = Settings::default();
        assert!(settings.set("model", "openai:gpt-4o").is_ok());
        assert_eq!(settings.default_model.as_deref(), Some("openai:gpt-4o"));
        assert!(settings.set("model", "openai:not-a-model").is_err());
    }

    #[test]
    fn set_rejects_unknown_keys_and_empty_editor() {
        let mut settings = Settings::default();
        assert!(settings.set("theme", "dark").is_err());
        assert!(settings.set("editor", "  ").is_err());
        assert!(settings.set("editor", "vim").is_ok());
        assert_eq!(settings.editor, "vim");
    }

    #[test]
    fn set_parses_booleans_loosely() {
        let mut settings = Settings::default();
        settings.set("streaming", "off").unwrap();
        assert!(!settings.streaming);
        settings.set("stream", "1").unwrap();
        assert!(settings.streaming);
        assert!(settings.set("streaming", "perhaps").is_err());
    }

    #[test]
    fn toml_round_trip_preserves_fields() {
        let mut settings = Settings::default();
        settings.set("model", "anthropic:claude-3-haiku-20240307").unwrap();
        settings.set("max_history", "25").unwrap();

        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
