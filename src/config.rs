use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FormatError, Result};

// Default configuration
pub const DEFAULT_LINK_DISPLAY_MAX: usize = 50;
pub const DEFAULT_LINK_DISPLAY_KEEP: usize = 47;
pub const DEFAULT_THREAD_PREVIEW_LIMIT: usize = 3;
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

const CONFIG_FILE: &str = "format.json";

/// Tunables for the formatting pipeline. Missing fields take their defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FormatConfig {
    /// Links longer than this many characters get a shortened display text.
    pub link_display_max: usize,
    /// Characters kept before the ellipsis when a link is shortened.
    pub link_display_keep: usize,
    /// Thread participants shown before collapsing into an overflow count.
    pub thread_preview_limit: usize,
    /// chrono format string for a message's time-of-day label.
    pub time_format: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            link_display_max: DEFAULT_LINK_DISPLAY_MAX,
            link_display_keep: DEFAULT_LINK_DISPLAY_KEEP,
            thread_preview_limit: DEFAULT_THREAD_PREVIEW_LIMIT,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl FormatConfig {
    pub fn validate(&self) -> Result<()> {
        if self.link_display_keep > self.link_display_max {
            return Err(FormatError::Invalid(format!(
                "link_display_keep ({}) exceeds link_display_max ({})",
                self.link_display_keep, self.link_display_max
            )));
        }
        if self.thread_preview_limit == 0 {
            return Err(FormatError::Invalid(
                "thread_preview_limit must be greater than 0".to_string(),
            ));
        }
        if self.time_format.trim().is_empty() {
            return Err(FormatError::Invalid("time_format cannot be empty".to_string()));
        }
        if StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error)) {
            return Err(FormatError::Invalid(format!(
                "time_format {:?} is not a valid strftime pattern",
                self.time_format
            )));
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "solidb", "talks-format").ok_or(FormatError::NoConfigDir)?;
    Ok(proj.config_dir().join(CONFIG_FILE))
}

pub fn load_config_from(path: &Path) -> Result<FormatConfig> {
    let content = fs::read_to_string(path).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FormatConfig = serde_json::from_str(&content).map_err(|source| FormatError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load `path`, falling back to defaults when it is missing or broken.
pub fn load_config_or_default(path: &Path) -> FormatConfig {
    if !path.exists() {
        tracing::debug!("No format config at {}, using defaults", path.display());
        return FormatConfig::default();
    }
    match load_config_from(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}, using default format config", e);
            FormatConfig::default()
        }
    }
}

/// Load the user's config from the platform config directory.
pub fn load_config() -> FormatConfig {
    match config_path() {
        Ok(path) => load_config_or_default(&path),
        Err(e) => {
            tracing::warn!("{}, using default format config", e);
            FormatConfig::default()
        }
    }
}
