use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::infrastructure::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Key the preference is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// How long the surface keeps its transition marker after startup.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    /// Overrides the default preferences file location.
    #[serde(default)]
    pub preferences_file: Option<PathBuf>,
}

fn default_storage_key() -> String {
    "theme".to_string()
}

fn default_transition_ms() -> u64 {
    300
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            transition_ms: default_transition_ms(),
            preferences_file: None,
        }
    }
}

impl ResolverSettings {
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(
                        target: "roomledger::theme",
                        path = %path.display(),
                        error = %e,
                        "Failed to parse settings, using defaults"
                    );
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                if let Err(e) = default.save_to(path) {
                    tracing::debug!(target: "roomledger::theme", error = %e, "Could not write default settings");
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("roomledger");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ResolverSettings::default();
        assert_eq!(settings.storage_key, "theme");
        assert_eq!(settings.transition_ms, 300);
        assert_eq!(settings.transition(), Duration::from_millis(300));
        assert!(settings.preferences_file.is_none());
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"transition_ms": 0}"#;
        let settings: ResolverSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.transition_ms, 0);
        assert_eq!(settings.storage_key, "theme");
    }

    #[test]
    fn test_load_missing_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomledger").join("settings.json");
        let settings = ResolverSettings::load_from(&path);
        assert_eq!(settings, ResolverSettings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2").unwrap();
        assert_eq!(ResolverSettings::load_from(&path), ResolverSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = ResolverSettings {
            storage_key: "ui.theme".to_string(),
            transition_ms: 120,
            preferences_file: Some(PathBuf::from("/tmp/prefs.json")),
        };
        settings.save_to(&path).unwrap();
        assert_eq!(ResolverSettings::load_from(&path), settings);
    }
}
