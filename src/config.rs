//! Configuration management for the keyboard core.
//!
//! This module handles loading, validating, and saving the modifier and lookup
//! configuration in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::models::{
    Element, ElementId, GroupPolicy, Modifier, ModifierBehavior, ModifierConfig, ModifierEffect,
    ModifierSpec,
};

/// Symbol lookup settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LookupConfig {
    /// What happens when the active modifiers select a group the key lacks
    #[serde(default)]
    pub group_policy: GroupPolicy,
}

/// One `[[modifiers]]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierEntry {
    /// Modifier being configured
    pub modifier: Modifier,
    /// Lock, latch or none
    pub behavior: ModifierBehavior,
    /// Group/level bits contributed while active
    #[serde(default)]
    pub effect: ModifierEffect,
}

/// Keyboard configuration.
///
/// # File Location
///
/// - Linux: `~/.config/vkeyboard/config.toml`
/// - macOS: `~/Library/Application Support/vkeyboard/config.toml`
/// - Windows: `%APPDATA%\vkeyboard\config.toml`
///
/// # Validation
///
/// - each modifier may appear at most once
/// - `group` and `level` effects must set at least one bit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Lookup settings
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Modifier behaviors and effects
    #[serde(default = "default_modifiers")]
    pub modifiers: Vec<ModifierEntry>,
}

/// Entries matching [`ModifierConfig::default`].
fn default_modifiers() -> Vec<ModifierEntry> {
    ModifierConfig::default()
        .iter()
        .map(|(modifier, spec)| ModifierEntry {
            modifier,
            behavior: spec.behavior,
            effect: spec.effect,
        })
        .collect()
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lookup: LookupConfig::default(),
            modifiers: default_modifiers(),
        }
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        if !config_path.exists() {
            warn!(path = %config_path.display(), "config file not found, using defaults");
            return Ok(Self::new());
        }
        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .context(format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to the platform config file.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for entry in &self.modifiers {
            if !seen.insert(entry.modifier) {
                anyhow::bail!("Modifier configured more than once: {}", entry.modifier);
            }
            match entry.effect {
                ModifierEffect::Group(0) | ModifierEffect::Level(0) => anyhow::bail!(
                    "Modifier {} has an effect with no bits set",
                    entry.modifier
                ),
                _ => {}
            }
        }
        Ok(())
    }

    /// Builds the keyboard modifier configuration from the entries.
    ///
    /// Modifiers without an entry behave as `none`.
    #[must_use]
    pub fn modifier_config(&self) -> ModifierConfig {
        self.modifiers
            .iter()
            .fold(ModifierConfig::empty(), |config, entry| {
                config.with(entry.modifier, ModifierSpec::new(entry.behavior, entry.effect))
            })
    }

    /// Creates a keyboard root element carrying this configuration.
    pub fn keyboard_element(&self, id: impl Into<ElementId>) -> Element {
        Element::keyboard(id, self.modifier_config()).with_group_policy(self.lookup.group_policy)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
