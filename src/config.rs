use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use spiral_core::{IdOrder, DEFAULT_FAMILY};

const APP_NAME: &str = "spiral";
const CONFIG_FILE: &str = "config.json";

/// User-level settings, read from `<config dir>/spiral/config.json`.
///
/// Environment variables override the file:
/// - `SPIRAL_ROADMAP` - roadmap file path
/// - `SPIRAL_STATE_DIR` - directory holding the context file
/// - `SPIRAL_FAMILY` - default family letter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    /// Roadmap file used instead of discovery in the working directory.
    pub roadmap: Option<PathBuf>,
    /// Where the context file lives. Defaults to `.spiral` next to the roadmap.
    pub state_dir: Option<PathBuf>,
    /// Family for new milestones when neither a flag nor the context gives one.
    pub default_family: char,
    /// Ordering of ids in listings.
    pub sort: IdOrder,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            roadmap: None,
            state_dir: None,
            default_family: DEFAULT_FAMILY,
            sort: IdOrder::Natural,
        }
    }
}

impl SpiralConfig {
    /// Load configuration from the user's config directory and the environment.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&config_path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_json::from_str(&content).context("Failed to parse config file")?;
        anyhow::ensure!(
            config.default_family.is_ascii_alphabetic(),
            "default_family must be a letter, got '{}'",
            config.default_family
        );
        Ok(config)
    }

    /// Apply environment-style overrides looked up through `var`.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = var("SPIRAL_ROADMAP").filter(|v| !v.is_empty()) {
            self.roadmap = Some(PathBuf::from(path));
        }
        if let Some(dir) = var("SPIRAL_STATE_DIR").filter(|v| !v.is_empty()) {
            self.state_dir = Some(PathBuf::from(dir));
        }
        if let Some(family) = var("SPIRAL_FAMILY") {
            match family.chars().next() {
                Some(c) if c.is_ascii_alphabetic() && family.len() == 1 => self.default_family = c,
                _ => tracing::warn!("Ignoring SPIRAL_FAMILY={:?}: not a single letter", family),
            }
        }
        self
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_family": "E", "sort": "lexicographic"}"#).unwrap();

        let config = SpiralConfig::from_path(&path).unwrap();
        assert_eq!(config.default_family, 'E');
        assert_eq!(config.sort, IdOrder::Lexicographic);
        assert!(config.roadmap.is_none());
    }

    #[test]
    fn test_rejects_non_letter_family() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_family": "7"}"#).unwrap();
        assert!(SpiralConfig::from_path(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SPIRAL_ROADMAP", "plans/roadmap.yml"),
            ("SPIRAL_FAMILY", "F"),
        ]);
        let config = SpiralConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.roadmap, Some(PathBuf::from("plans/roadmap.yml")));
        assert_eq!(config.default_family, 'F');
        assert!(config.state_dir.is_none());
    }

    #[test]
    fn test_invalid_family_override_is_ignored() {
        let config = SpiralConfig::default().with_overrides(|k| (k == "SPIRAL_FAMILY").then(|| "DX".to_string()));
        assert_eq!(config.default_family, 'D');
    }
}
