use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::BrowserError;
use crate::modules::navigation::BLANK_URL;

/// Browser configuration, resolved once when a browser is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrowserSettings {
    /// Base URL for HTML loaded without one.
    pub blank_url: String,
    /// Loaded as soon as the engine handle is ready, unless superseded.
    pub initial_url: Option<String>,
    /// Offer "Open DevTools" in the page context menu.
    pub devtools_menu: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            blank_url: BLANK_URL.to_string(),
            initial_url: None,
            devtools_menu: false,
        }
    }
}

impl BrowserSettings {
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("[Settings] Failed to parse {:?}: {}, returning defaults", path, e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("[Settings] Failed to read {:?}: {}, returning defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), BrowserError> {
        let tmp_path = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to tmp, then rename, so a crash never leaves a half-written file.
        fs::write(&tmp_path, json)?;
        fs::rename(tmp_path, path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = BrowserSettings::load(&dir.path().join("browser.json"));
        assert_eq!(settings, BrowserSettings::default());
        assert_eq!(settings.blank_url, "about:blank");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("browser.json");
        let settings = BrowserSettings {
            blank_url: "https://sandbox.local/".to_string(),
            initial_url: Some("https://example.com".to_string()),
            devtools_menu: true,
        };

        settings.save(&path).unwrap();

        assert_eq!(BrowserSettings::load(&path), settings);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("browser.json");
        fs::write(&path, r#"{ "devtools_menu": true }"#).unwrap();

        let settings = BrowserSettings::load(&path);

        assert!(settings.devtools_menu);
        assert_eq!(settings.blank_url, "about:blank");
        assert_eq!(settings.initial_url, None);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("browser.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(BrowserSettings::load(&path), BrowserSettings::default());
    }
}
