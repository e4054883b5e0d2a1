//! Server configuration
//!
//! Read from an optional TOML file named by `FORMCRAFT_CONFIG`, then
//! overridden field by field from `FORMCRAFT_*` environment variables.

use std::fs;
use std::path::Path;
use std::time::Duration;

use formcraft_core::infrastructure::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use formcraft_core::SubmissionPolicy;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "FORMCRAFT_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value}")]
    Env { var: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub submissions: SubmissionPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load from `FORMCRAFT_CONFIG` (if set) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = lookup("FORMCRAFT_BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = lookup("FORMCRAFT_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = lookup("FORMCRAFT_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = lookup("FORMCRAFT_LLM_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = lookup("FORMCRAFT_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = v.trim().parse().map_err(|_| ConfigError::Env {
                var: "FORMCRAFT_LLM_TIMEOUT_SECS",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("FORMCRAFT_VALIDATE_SUBMISSIONS") {
            self.submissions.validate_payloads = parse_flag(&v).ok_or(ConfigError::Env {
                var: "FORMCRAFT_VALIDATE_SUBMISSIONS",
                value: v.clone(),
            })?;
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.timeout(), Duration::from_secs(60));
        assert!(config.llm.api_key.is_none());
        assert!(!config.submissions.validate_payloads);
    }

    #[test]
    fn test_partial_file() {
        let config = AppConfig::from_toml(
            r#"
            [llm]
            model = "llama-3.1-8b"
            timeout_secs = 10

            [submissions]
            validate_payloads = true
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "llama-3.1-8b");
        assert_eq!(config.llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.llm.timeout_secs, 10);
        assert!(config.submissions.validate_payloads);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FORMCRAFT_BIND_ADDR", "127.0.0.1:3000"),
            ("FORMCRAFT_LLM_API_KEY", "gsk_test"),
            ("FORMCRAFT_VALIDATE_SUBMISSIONS", "yes"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.llm.api_key.as_deref(), Some("gsk_test"));
        assert!(config.submissions.validate_payloads);
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|k| (k == "FORMCRAFT_LLM_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "FORMCRAFT_LLM_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn test_bad_file() {
        assert!(matches!(
            AppConfig::from_toml("[server]\nbind_addr = 5"),
            Err(ConfigError::Parse(_))
        ));
    }
}
