use std::{fs, path::{Path, PathBuf}, time::Duration};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{KnError, Result};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the key-value store (notes, session flag, theme)
    pub data_dir: PathBuf,

    /// How long a deleted note stays recoverable (in seconds)
    pub undo_window_secs: u64,

    /// URL of the creativity classification service; unset disables it
    pub classifier_endpoint: Option<String>,

    /// Upper bound on a single classification call (in seconds)
    pub classifier_timeout_secs: u64,

    /// Default editor command
    pub editor_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("dev", "kinetic", "kinetic-notes")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".kinetic-notes"));

        Config {
            data_dir,
            undo_window_secs: 5,
            classifier_endpoint: None,
            classifier_timeout_secs: 15,
            editor_command: None,
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "kinetic", "kinetic-notes")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Reads configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| KnError::ConfigError {
            message: format!("failed to parse {}: {}", path.display(), e),
        })?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_secs(self.undo_window_secs)
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier_timeout_secs)
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -W -t".to_string()
        } else {
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.undo_window_secs, 5);
        assert_eq!(config.classifier_endpoint, None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"undo_window_secs": 30, "data_dir": "/tmp/kn"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.undo_window(), Duration::from_secs(30));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/kn"));
        assert_eq!(config.classifier_timeout_secs, 15);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(KnError::ConfigError { .. })
        ));
    }
}
