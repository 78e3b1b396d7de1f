/// Application settings
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/coral-sight/settings.json
/// - macOS: ~/Library/Application Support/coral-sight/settings.json
/// - Windows: %APPDATA%\coral-sight\settings.json

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest image accepted for analysis (10 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Longest edge of the generated preview, in pixels
pub const DEFAULT_PREVIEW_SIZE: u32 = 768;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// URL the image is POSTed to; `None` leaves analysis unavailable
    pub backend_endpoint: Option<String>,
    /// HTTP client timeout for a single request
    pub request_timeout_secs: Option<u64>,
    /// Upper bound on the whole analysis step, enforced by the controller
    pub analysis_timeout_secs: Option<u64>,
    pub max_image_bytes: u64,
    pub preview_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_endpoint: None,
            request_timeout_secs: None,
            analysis_timeout_secs: None,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            preview_size: DEFAULT_PREVIEW_SIZE,
        }
    }
}

impl Settings {
    /// Default location of the settings file
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("coral-sight");
        path.push("settings.json");
        Some(path)
    }

    /// Load settings from the default location, falling back to defaults
    ///
    /// On first start the defaults are written out as an editable template.
    /// An unreadable or invalid file is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::warn!("Could not determine config directory, using default settings");
            return Self::default();
        };

        if !path.exists() {
            let settings = Self::default();
            match settings.save_to(&path) {
                Ok(()) => tracing::info!("Wrote default settings to {}", path.display()),
                Err(e) => tracing::warn!("Could not write default settings: {}", e),
            }
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&json)?)
    }

    /// Write settings, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_json()?).map_err(io_err)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis_timeout_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_image_bytes, 10 * 1024 * 1024);
        assert!(settings.backend_endpoint.is_none());
        assert!(settings.analysis_timeout().is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings =
            Settings::from_json(r#"{"backend_endpoint":"http://localhost:8000/classify"}"#)
                .unwrap();
        assert_eq!(
            settings.backend_endpoint.as_deref(),
            Some("http://localhost:8000/classify")
        );
        assert_eq!(settings.preview_size, DEFAULT_PREVIEW_SIZE);
        assert_eq!(settings.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.analysis_timeout_secs = Some(30);
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.analysis_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_saved_file_is_pretty_json_with_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        Settings::default().save_to(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        assert_eq!(json, Settings::default().to_json().unwrap());
        assert!(json.contains("\n  \"backend_endpoint\": null"));
        assert!(json.contains("\"max_image_bytes\": 10485760"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
