use crate::cli::Args;
use crate::core::error::ChatError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your AI assistant powered by Gemini. How can I help you today?";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

fn default_max_context_turns() -> Option<usize> {
    Some(50)
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Completed turns replayed to the model; `None` sends the whole history.
    #[serde(default = "default_max_context_turns")]
    pub max_context_turns: Option<usize>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            generation: GenerationSettings::default(),
            max_context_turns: default_max_context_turns(),
            request_timeout_secs: default_request_timeout_secs(),
            greeting: None,
        }
    }
}

/// Fully resolved settings for one session.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub generation: GenerationSettings,
    pub max_context_turns: Option<usize>,
    /// `None` waits for the server indefinitely.
    pub request_timeout: Option<Duration>,
    pub greeting: String,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gchat")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    pub fn load() -> Result<Config, ChatError> {
        let path = Self::config_path();

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            return Self::parse(&contents)
                .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)));
        }

        let config = Config::default();
        if let Err(e) = config.save() {
            tracing::warn!(path = %path.display(), error = %e, "could not write default config");
        }
        Ok(config)
    }

    fn parse(contents: &str) -> Result<Config, serde_yml::Error> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str(contents)
    }

    pub fn save(&self) -> Result<(), ChatError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(&path, yaml_content)?;
        Ok(())
    }

    /// Merges command-line overrides and the environment credential into the
    /// file configuration.
    pub fn resolve(self, args: &Args, env_api_key: Option<String>) -> Result<Settings, ChatError> {
        let api_key = env_api_key
            .filter(|key| !key.trim().is_empty())
            .or(self.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ChatError::Config(format!(
                    "No API key found. Set {} or add `api_key` to {}",
                    API_KEY_ENV,
                    Self::config_path().display()
                ))
            })?;

        // Zero means "no limit" for both the flag and the file
        let max_context_turns = args
            .context_turns
            .or(self.max_context_turns)
            .filter(|&turns| turns > 0);
        // Likewise a zero timeout disables the deadline
        let request_timeout = Some(args.timeout.unwrap_or(self.request_timeout_secs))
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        Ok(Settings {
            api_key,
            base_url: args
                .base_url
                .clone()
                .or(self.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: args
                .model
                .clone()
                .or(self.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            generation: self.generation,
            max_context_turns,
            request_timeout,
            greeting: self
                .greeting
                .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["gchat"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.generation, GenerationSettings::default());
        assert_eq!(config.max_context_turns, Some(50));
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn partial_generation_block_keeps_other_defaults() {
        let config = Config::parse("generation:\n  temperature: 0.2\n").unwrap();
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(config.generation.max_output_tokens, 1024);
    }

    #[test]
    fn environment_key_wins_over_file() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        let settings = config
            .resolve(&args(&[]), Some("from-env".to_string()))
            .unwrap();
        assert_eq!(settings.api_key, "from-env");
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.greeting, DEFAULT_GREETING);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = Config::default().resolve(&args(&[]), None).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn flags_override_file_values() {
        let config = Config {
            api_key: Some("k".to_string()),
            model: Some("gemini-pro".to_string()),
            ..Config::default()
        };
        let settings = config
            .resolve(
                &args(&["--model", "gemini-2.0-flash", "--timeout", "5", "--context-turns", "0"]),
                None,
            )
            .unwrap();
        assert_eq!(settings.model, "gemini-2.0-flash");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(settings.max_context_turns, None);
    }

    #[test]
    fn zero_context_turns_in_file_means_unbounded() {
        let config = Config::parse("api_key: k\nmax_context_turns: 0\n").unwrap();
        let settings = config.clone().resolve(&args(&[]), None).unwrap();
        assert_eq!(settings.max_context_turns, None);

        let settings = config
            .resolve(&args(&["--context-turns", "3"]), None)
            .unwrap();
        assert_eq!(settings.max_context_turns, Some(3));
    }

    #[test]
    fn zero_timeout_disables_the_deadline() {
        let config = Config::parse("api_key: k\nrequest_timeout_secs: 0\n").unwrap();
        let settings = config.clone().resolve(&args(&[]), None).unwrap();
        assert_eq!(settings.request_timeout, None);

        let settings = Config {
            api_key: Some("k".to_string()),
            ..Config::default()
        }
        .resolve(&args(&["--timeout", "0"]), None)
        .unwrap();
        assert_eq!(settings.request_timeout, None);

        let settings = config.resolve(&args(&["-t", "30"]), None).unwrap();
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
    }
}
