//! Store settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Default folder every account starts with.
pub const DEFAULT_FOLDER: &str = "/inbox";

/// Reserved name of the sent-mail log.
pub const SENT_FOLDER: &str = "/sent";

/// Settings that shape folder naming and rule parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root folder receiving mail no rule matches.
    pub default_folder: String,
    /// Name under which the sent log is exposed.
    pub sent_folder: String,
    /// Reject unknown keywords and malformed lines in rule definitions.
    pub strict_rules: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_folder: DEFAULT_FOLDER.to_string(),
            sent_folder: SENT_FOLDER.to_string(),
            strict_rules: false,
        }
    }
}

impl Settings {
    /// Location of the settings file in the user's config directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailsort")
            .join("settings.json")
    }

    /// Loads settings from [`Settings::default_path`].
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path())
    }

    /// Loads settings from a JSON file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`Settings::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;

        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Writes settings as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem call fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;

        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Checks that both reserved names are single, distinct, rooted segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("default_folder", &self.default_folder),
            ("sent_folder", &self.sent_folder),
        ] {
            if !is_root_segment(value) {
                return Err(Error::Config(format!(
                    "{field} must look like \"/name\", got \"{value}\""
                )));
            }
        }

        if self.default_folder == self.sent_folder {
            return Err(Error::Config(
                "default_folder and sent_folder must differ".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_root_segment(value: &str) -> bool {
    value
        .strip_prefix('/')
        .is_some_and(|name| !name.is_empty() && !name.contains('/') && name.trim() == name)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mailsort-config-{}-{name}", std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_folder, "/inbox");
        assert_eq!(settings.sent_folder, "/sent");
        assert!(!settings.strict_rules);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn default_path_ends_with_settings_json() {
        let path = Settings::default_path();
        assert!(path.ends_with("mailsort/settings.json"));
    }

    #[test]
    fn validate_rejects_nested_default() {
        let settings = Settings {
            default_folder: "/inbox/sub".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn validate_rejects_unrooted_sent() {
        let settings = Settings {
            sent_folder: "sent".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn validate_rejects_equal_names() {
        let settings = Settings {
            sent_folder: "/inbox".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let settings = Settings::load(&scratch_path("missing")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn save_then_load() {
        let path = scratch_path("roundtrip");
        let settings = Settings {
            default_folder: "/mail".to_string(),
            sent_folder: "/outbox".to_string(),
            strict_rules: true,
        };

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"strict_rules": true}"#).unwrap();
        assert!(settings.strict_rules);
        assert_eq!(settings.default_folder, DEFAULT_FOLDER);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let path = scratch_path("invalid");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(Settings::load(&path), Err(Error::Serde(_))));

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
