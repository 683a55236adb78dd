//! Configuration management for promptfmt

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::session::KeyChord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shortcut: ShortcutConfig,
    pub editor: EditorConfig,
    pub insert: InsertConfig,
}

/// Key combination that opens the compose overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutConfig {
    pub key: String,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Text inserted when Tab is pressed in the editor
    pub indent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertConfig {
    /// Fire an input notification on the target after writing
    pub notify: bool,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            key: "a".to_string(),
            alt: true,
            ctrl: false,
            shift: false,
        }
    }
}

impl ShortcutConfig {
    /// Whether `chord` triggers this shortcut (key compared case-insensitively)
    pub fn matches(&self, chord: &KeyChord) -> bool {
        let mut key = self.key.chars();
        let configured = match (key.next(), key.next()) {
            (Some(c), None) => c,
            _ => return false,
        };

        configured.eq_ignore_ascii_case(&chord.key)
            && self.alt == chord.alt
            && self.ctrl == chord.ctrl
            && self.shift == chord.shift
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }
}

impl Default for InsertConfig {
    fn default() -> Self {
        Self { notify: true }
    }
}

impl Config {
    /// Get the platform-specific config file path
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "promptfmt")
            .map(|proj_dirs| proj_dirs.config_dir().join("promptfmt.toml"))
    }

    /// Load configuration from the default location, falling back to defaults if missing
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                log::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        // Check config file permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat config file: {}", path.display()))?;
            if metadata.permissions().mode() & 0o002 != 0 {
                anyhow::bail!(
                    "Config file {} is world-writable (insecure permissions)",
                    path.display()
                );
            }
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
