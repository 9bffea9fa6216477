use crate::service::languagetool::DEFAULT_ENDPOINT;
use crate::stats::DEFAULT_WORDS_PER_MINUTE;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: usize,

    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,

    /// Program and arguments reading text to speak on stdin,
    /// e.g. `["espeak", "-s", "{wpm}"]`.
    #[serde(default)]
    pub speech_command: Vec<String>,

    /// Program and arguments receiving the corrected text on stdin,
    /// e.g. `["xclip", "-selection", "clipboard"]`.
    #[serde(default)]
    pub clipboard_command: Vec<String>,

    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_words_per_minute() -> usize {
    DEFAULT_WORDS_PER_MINUTE
}

fn default_speech_rate() -> f32 {
    1.0
}

fn default_max_candidates() -> usize {
    9
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            words_per_minute: default_words_per_minute(),
            speech_rate: default_speech_rate(),
            speech_command: Vec::new(),
            clipboard_command: Vec::new(),
            max_candidates: default_max_candidates(),
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(
        explicit: Option<&Path>,
        language: Option<String>,
        endpoint: Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = explicit {
            config = config.merge(Self::from_file(path)?);
        } else {
            if let Some(global_path) = Self::global_config_path() {
                if global_path.exists() {
                    config = config.merge(Self::from_file(&global_path)?);
                }
            }

            // Local config overrides global
            let local_path = PathBuf::from(".grammarfix.toml");
            if local_path.exists() {
                config = config.merge(Self::from_file(&local_path)?);
            }
        }

        if let Some(language) = language {
            config.language = language;
        }
        if let Some(endpoint) = endpoint {
            config.endpoint = endpoint;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // Values left at their default do not override a lower layer
        if other.language != default_language() {
            self.language = other.language;
        }
        if other.endpoint != default_endpoint() {
            self.endpoint = other.endpoint;
        }
        if other.timeout_secs != default_timeout_secs() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.words_per_minute != default_words_per_minute() {
            self.words_per_minute = other.words_per_minute;
        }
        if other.speech_rate != default_speech_rate() {
            self.speech_rate = other.speech_rate;
        }
        if !other.speech_command.is_empty() {
            self.speech_command = other.speech_command;
        }
        if !other.clipboard_command.is_empty() {
            self.clipboard_command = other.clipboard_command;
        }
        if other.max_candidates != default_max_candidates() {
            self.max_candidates = other.max_candidates;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "grammarfix").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language, "en-US");
        assert_eq!(config.endpoint, "https://api.languagetool.org/v2/check");
        assert_eq!(config.words_per_minute, 200);
        assert!(config.speech_command.is_empty());
    }

    #[test]
    fn test_merge_configs() {
        let base = Config {
            clipboard_command: vec!["pbcopy".to_string()],
            ..Default::default()
        };
        let override_config = Config {
            language: "en-GB".to_string(),
            words_per_minute: 250,
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.language, "en-GB");
        assert_eq!(merged.words_per_minute, 250);
        assert_eq!(merged.clipboard_command, vec!["pbcopy".to_string()]);
    }

    #[test]
    fn test_load_explicit_file_with_cli_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grammarfix.toml");
        fs::write(
            &path,
            "endpoint = \"http://localhost:8081/v2/check\"\nspeech_command = [\"espeak\"]\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), Some("de-DE".to_string()), None).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8081/v2/check");
        assert_eq!(config.speech_command, vec!["espeak".to_string()]);
        assert_eq!(config.language, "de-DE");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(Config::load(Some(&path), None, None).is_err());
    }
}
