//! Optional `preview.ron` next to the binary's working directory.

use std::fs;
use std::path::{Path, PathBuf};

use preview_logging::{preview_info, preview_warn, LogDestination};
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILENAME: &str = "preview.ron";
const DEFAULT_CACHE_DIR: &str = "./preview_cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub(crate) enum LogTarget {
    File,
    #[default]
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub cache_dir: PathBuf,
    pub log: LogTarget,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            log: LogTarget::default(),
        }
    }
}

/// Reads the config file. Missing or unreadable files fall back to defaults.
///
/// Runs before the logger exists, so problems are returned as warnings for
/// the caller to log once logging is up.
pub(crate) fn load_config(path: &Path) -> (AppConfig, Option<String>) {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (AppConfig::default(), None);
        }
        Err(err) => {
            let warning = format!("failed to read {}: {}", path.display(), err);
            return (AppConfig::default(), Some(warning));
        }
    };

    match ron::from_str(&content) {
        Ok(config) => (config, None),
        Err(err) => {
            let warning = format!("failed to parse {}: {}", path.display(), err);
            (AppConfig::default(), Some(warning))
        }
    }
}

pub(crate) fn report_loaded(path: &Path, warning: Option<String>) {
    match warning {
        Some(warning) => preview_warn!("{}; using defaults", warning),
        None => preview_info!("configuration from {:?}", path),
    }
}
