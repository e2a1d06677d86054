use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::i18n::{Language, DEFAULT_LANGUAGE};
use crate::validate::ReturnDatePolicy;
use crate::wizard::Variant;

const APP_DIR: &str = "airtwo";
const CONFIG_FILE: &str = "config.json";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides the saved language preference when set.
    pub language: Option<Language>,
    pub variant: Variant,
    pub submit_delay_ms: u64,
    pub simulate_failure: bool,
    pub return_date_policy: ReturnDatePolicy,
    /// Overrides the variant's passenger limit.
    pub max_passengers: Option<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            variant: Variant::Quote,
            submit_delay_ms: 2000,
            simulate_failure: false,
            return_date_policy: ReturnDatePolicy::Required,
            max_passengers: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0} does not exist")]
    NotFound(PathBuf),
    #[error("failed to read {0}: {1}")]
    ReadError(PathBuf, String),
    #[error("failed to parse {0}: {1}")]
    ParseError(PathBuf, String),
}

impl Config {
    /// An explicit path must exist. Without one, the first file found in
    /// [`config_paths`] wins, and no file at all means defaults.
    pub fn load(explicit: Option<&Path>) -> std::result::Result<Config, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from(path);
        }

        for path in config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> std::result::Result<Config, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The configured limit, or the variant's own when none is set.
    pub fn max_passengers_for(&self, variant: Variant) -> u8 {
        self.max_passengers
            .unwrap_or_else(|| variant.max_passengers())
            .max(1)
    }
}

fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // Project-local: ./.airtwo/config.json
    paths.push(PathBuf::from(format!(".{}/{}", APP_DIR, CONFIG_FILE)));

    // User config: ~/.config/airtwo/config.json
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_DIR).join(CONFIG_FILE));
    }

    paths
}

pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PREFERENCES_FILE))
}

#[derive(Serialize, Deserialize, Default)]
struct PreferencesFile {
    #[serde(default)]
    language: String,
}

/// User choices that survive between runs. Created once in `main` and
/// handed to whoever needs it; saved when the language changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    path: Option<PathBuf>,
    pub language: Language,
}

impl Preferences {
    pub fn in_memory(language: Language) -> Self {
        Self {
            path: None,
            language,
        }
    }

    /// A missing or unreadable file, or an unknown language code, yields the
    /// default language.
    pub fn load(path: Option<PathBuf>) -> Self {
        let language = path
            .as_deref()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_json::from_str::<PreferencesFile>(&content).ok())
            .and_then(|file| Language::from_code(&file.language))
            .unwrap_or(DEFAULT_LANGUAGE);
        Self { path, language }
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.language = language;
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = PreferencesFile {
            language: self.language.code().to_string(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), language = self.language.code(), "saved preferences");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "language": "en",
            "variant": "reservation",
            "submit_delay_ms": 500,
            "return_date_policy": "optional"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.language, Some(Language::En));
        assert_eq!(config.variant, Variant::Reservation);
        assert_eq!(config.submit_delay_ms, 500);
        assert_eq!(config.return_date_policy, ReturnDatePolicy::Optional);
        // Untouched keys keep their defaults
        assert!(!config.simulate_failure);
        assert_eq!(config.max_passengers, None);
        assert_eq!(config.max_passengers_for(config.variant), 8);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_passengers_for(config.variant), 20);
    }

    #[test]
    fn test_load_explicit_missing() {
        let err = Config::load(Some(Path::new("/nonexistent/airtwo.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(..)));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "max_passengers": 12, "simulate_failure": true }"#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert!(config.simulate_failure);
        assert_eq!(config.max_passengers_for(Variant::Reservation), 12);
    }

    #[test]
    fn test_preferences_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE);

        let mut prefs = Preferences::load(Some(path.clone()));
        assert_eq!(prefs.language, DEFAULT_LANGUAGE);

        prefs.set_language(Language::Fr).unwrap();
        let reloaded = Preferences::load(Some(path));
        assert_eq!(reloaded.language, Language::Fr);
    }

    #[test]
    fn test_preferences_unknown_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        fs::write(&path, r#"{ "language": "de" }"#).unwrap();
        assert_eq!(Preferences::load(Some(path)).language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_in_memory_preferences_do_not_write() {
        let mut prefs = Preferences::in_memory(Language::En);
        prefs.set_language(Language::Pt).unwrap();
        assert_eq!(prefs.language, Language::Pt);
    }
}
