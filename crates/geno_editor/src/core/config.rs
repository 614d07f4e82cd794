//! Editor configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file is a
//! valid config:
//!
//! ```toml
//! history_limit = 200
//! default_size = "DEFAULT"
//!
//! [merge]
//! move_window_ms = 300
//! resize_window_ms = 300
//! annotation_text_window_ms = 1000
//! person_edit_window_ms = 0
//! ```
//!
//! Sources, first hit wins: the file named by `GENOGRAM_EDITOR_CONFIG`,
//! then `<config_dir>/genogram/editor.toml`, then built-in defaults.
//! `GENOGRAM_HISTORY_LIMIT` overrides the history limit afterwards.

use std::path::{Path, PathBuf};

use geno_core::SizeClass;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commands::CommandKind;

/// Env var naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "GENOGRAM_EDITOR_CONFIG";
/// Env var overriding `history_limit`
pub const HISTORY_LIMIT_ENV: &str = "GENOGRAM_HISTORY_LIMIT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Per-kind merge windows in milliseconds. Zero disables merging for
/// that kind. Kinds without a field never merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    /// Consecutive drag steps on one node
    pub move_window_ms: u64,
    pub resize_window_ms: u64,
    /// Keystrokes into one annotation
    pub annotation_text_window_ms: u64,
    pub person_edit_window_ms: u64,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            move_window_ms: 300,
            resize_window_ms: 300,
            annotation_text_window_ms: 1000,
            person_edit_window_ms: 0,
        }
    }
}

impl MergePolicy {
    /// No merging at all
    pub fn disabled() -> Self {
        Self {
            move_window_ms: 0,
            resize_window_ms: 0,
            annotation_text_window_ms: 0,
            person_edit_window_ms: 0,
        }
    }

    /// Merge window for `kind`, `None` when that kind never merges.
    pub fn window_for(&self, kind: CommandKind) -> Option<u64> {
        let window = match kind {
            CommandKind::MoveNode => self.move_window_ms,
            CommandKind::ResizeNode => self.resize_window_ms,
            CommandKind::EditAnnotation => self.annotation_text_window_ms,
            CommandKind::UpdatePerson => self.person_edit_window_ms,
            _ => 0,
        };
        (window > 0).then_some(window)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo entries kept before the oldest is evicted
    pub history_limit: usize,
    /// Size class for nodes created without an explicit size
    pub default_size: SizeClass,
    pub merge: MergePolicy,
    /// Where this config was loaded from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 200,
            default_size: SizeClass::Default,
            merge: MergePolicy::default(),
            source: None,
        }
    }
}

impl EditorConfig {
    /// Load from every source. A missing default file is not an error; a
    /// missing file named by the env var is.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load_from_file(Path::new(&path))?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load_from_file(&path)?,
                _ => {
                    log::debug!("No editor config found, using defaults");
                    Self::default()
                }
            },
        };

        let limit = std::env::var(HISTORY_LIMIT_ENV).ok();
        config.apply_history_override(limit.as_deref())?;
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/genogram/editor.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("genogram").join("editor.toml"))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.source = Some(path.to_path_buf());
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Apply the `GENOGRAM_HISTORY_LIMIT` value, if any.
    pub fn apply_history_override(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        if let Some(raw) = value {
            let limit = raw.trim().parse::<usize>().map_err(|_| {
                ConfigError::Invalid(format!("{HISTORY_LIMIT_ENV} must be a positive integer, got {raw:?}"))
            })?;
            log::info!("History limit from env: {}", limit);
            self.history_limit = limit;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be at least 1".to_string()));
        }
        Ok(())
    }
}
