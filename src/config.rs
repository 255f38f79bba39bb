use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

const APP_DIR_NAME: &str = "parley";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_ANALYZER_MODEL: &str = "qwen2.5:7b";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "qwen3:8b";
pub const DEFAULT_ROUND_TABLE_MODEL: &str = "llama3.2:latest";
pub const DEFAULT_ODYSSEY_MODEL: &str = "qwen3:8b";

/// Atlassian cloud API tokens start with this prefix; anything else is
/// assumed to be a Zephyr JWT when a Zephyr token is also present.
const ATLASSIAN_TOKEN_PREFIX: &str = "ATATT";

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("unable to determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Values persisted by `parley config init`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub jira_issue_key: Option<String>,
    pub zephyr_token: Option<String>,
    pub ollama_host: Option<String>,
    pub analyzer_model: Option<String>,
    pub summarizer_model: Option<String>,
    pub round_table_model: Option<String>,
    pub odyssey_model: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub analyzer: String,
    pub summarizer: String,
    pub round_table: String,
    pub odyssey: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub jira_issue_key: Option<String>,
    pub zephyr_token: Option<String>,
    pub use_zephyr: bool,
    pub debug_http: bool,
    pub ollama_host: String,
    pub models: ModelConfig,
}

impl AppConfig {
    /// Environment first, then `.env`, then the stored config file.
    pub fn load() -> AppResult<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                warn!("ignoring unreadable .env file: {err}");
            }
        }
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(stored, |key| env::var(key).ok()))
    }

    pub fn resolve<F>(stored: StoredConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let flag = |key: &str| {
            var(key)
                .map(|value| value.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };

        let config = Self {
            jira_base_url: var("JIRA_URL").or(stored.jira_base_url),
            jira_email: var("JIRA_EMAIL").or(stored.jira_email),
            jira_token: var("JIRA_API_TOKEN").or(stored.jira_token),
            jira_issue_key: var("JIRA_ISSUE_KEY").or(stored.jira_issue_key),
            zephyr_token: var("ZEPHYR_TOKEN").or(stored.zephyr_token),
            use_zephyr: flag("USE_ZEPHYR"),
            debug_http: flag("DEBUG_HTTP"),
            ollama_host: var("OLLAMA_HOST")
                .or(stored.ollama_host)
                .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
            models: ModelConfig {
                analyzer: var("PARLEY_ANALYZER_MODEL")
                    .or(stored.analyzer_model)
                    .unwrap_or_else(|| DEFAULT_ANALYZER_MODEL.to_string()),
                summarizer: var("PARLEY_SUMMARIZER_MODEL")
                    .or(stored.summarizer_model)
                    .unwrap_or_else(|| DEFAULT_SUMMARIZER_MODEL.to_string()),
                round_table: var("PARLEY_ROUND_TABLE_MODEL")
                    .or(stored.round_table_model)
                    .unwrap_or_else(|| DEFAULT_ROUND_TABLE_MODEL.to_string()),
                odyssey: var("PARLEY_ODYSSEY_MODEL")
                    .or(stored.odyssey_model)
                    .unwrap_or_else(|| DEFAULT_ODYSSEY_MODEL.to_string()),
            },
        };
        debug!(
            ollama_host = %config.ollama_host,
            use_zephyr = config.use_zephyr,
            "configuration resolved"
        );
        config
    }

    /// Whether ticket loading should go through Zephyr Squad instead of Jira.
    pub fn prefers_zephyr(&self) -> bool {
        if self.use_zephyr {
            return true;
        }
        let jira_is_atlassian = self
            .jira_token
            .as_deref()
            .is_some_and(|token| token.starts_with(ATLASSIAN_TOKEN_PREFIX));
        self.zephyr_token.is_some() && !jira_is_atlassian
    }

    /// Zephyr access key, falling back to the Jira token.
    pub fn zephyr_access_token(&self) -> Option<String> {
        self.zephyr_token.clone().or_else(|| self.jira_token.clone())
    }

    pub fn secrets(&self) -> Vec<String> {
        [&self.jira_token, &self.zephyr_token]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn environment_overrides_stored_values() {
        let stored = StoredConfig {
            jira_base_url: Some("https://stored.example".to_string()),
            jira_email: Some("stored@example.com".to_string()),
            ..StoredConfig::default()
        };
        let config = AppConfig::resolve(
            stored,
            lookup(&[("JIRA_URL", "https://env.example"), ("JIRA_EMAIL", "")]),
        );
        assert_eq!(config.jira_base_url.as_deref(), Some("https://env.example"));
        assert_eq!(config.jira_email.as_deref(), Some("stored@example.com"));
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = AppConfig::resolve(StoredConfig::default(), lookup(&[]));
        assert_eq!(config.ollama_host, DEFAULT_OLLAMA_HOST);
        assert_eq!(config.models.analyzer, DEFAULT_ANALYZER_MODEL);
        assert_eq!(config.models.round_table, DEFAULT_ROUND_TABLE_MODEL);
        assert!(!config.use_zephyr);
        assert!(config.jira_token.is_none());
    }

    #[test]
    fn zephyr_preference_follows_token_shape() {
        let atlassian = AppConfig::resolve(
            StoredConfig::default(),
            lookup(&[("JIRA_API_TOKEN", "ATATT123"), ("ZEPHYR_TOKEN", "jwt")]),
        );
        assert!(!atlassian.prefers_zephyr());

        let jwt = AppConfig::resolve(
            StoredConfig::default(),
            lookup(&[("JIRA_API_TOKEN", "legacy"), ("ZEPHYR_TOKEN", "jwt")]),
        );
        assert!(jwt.prefers_zephyr());

        let forced = AppConfig::resolve(StoredConfig::default(), lookup(&[("USE_ZEPHYR", "TRUE")]));
        assert!(forced.prefers_zephyr());
    }

    #[test]
    fn zephyr_token_falls_back_to_jira_token() {
        let config = AppConfig::resolve(
            StoredConfig::default(),
            lookup(&[("JIRA_API_TOKEN", "jira-secret")]),
        );
        assert_eq!(config.zephyr_access_token().as_deref(), Some("jira-secret"));
        assert_eq!(config.secrets(), vec!["jira-secret".to_string()]);
    }

    #[test]
    fn stored_config_round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let missing = StoredConfig::load_from(&path).expect("missing file is empty config");
        assert_eq!(missing, StoredConfig::default());

        let stored = StoredConfig {
            jira_base_url: Some("https://company.atlassian.net".to_string()),
            summarizer_model: Some("llama3.1:8b".to_string()),
            ..StoredConfig::default()
        };
        stored.save_to(&path).expect("save");
        assert_eq!(StoredConfig::load_from(&path).expect("load"), stored);
    }

    #[test]
    fn rejects_malformed_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "jira_base_url = [").expect("write");
        assert!(matches!(
            StoredConfig::load_from(&path),
            Err(AppError::Configuration(_))
        ));
    }
}
