use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodelingError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_model() -> String {
    "llama3.1".into()
}

fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsConfig {
    /// Wall-clock budget for one shell command, in seconds.
    #[serde(default = "default_shell_timeout")]
    pub shell_timeout_secs: u64,
    /// Combined cap on grep hits across all files.
    #[serde(default = "default_grep_limit")]
    pub grep_max_hits: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            shell_timeout_secs: default_shell_timeout(),
            grep_max_hits: default_grep_limit(),
        }
    }
}

fn default_shell_timeout() -> u64 {
    30
}

fn default_grep_limit() -> usize {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&raw)
            .map_err(|err| CodelingError::Protocol(format!("Failed to parse configuration: {err}")))?;
        Ok(cfg)
    }

    pub fn from_env_or_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut cfg = Self::from_file(path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Default configuration with environment overrides, for when no config
    /// file is present.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    fn apply_env(&mut self) {
        if let Ok(host) = env::var("OLLAMA_HOST") {
            self.model.base_url = host;
        }
        if let Ok(model) = env::var("OLLAMA_MODEL") {
            self.model.model = model;
        }
        if let Ok(temperature) = env::var("CODELING_TEMPERATURE") {
            if let Ok(parsed) = temperature.parse::<f32>() {
                self.model.temperature = parsed;
            }
        }
        if let Ok(timeout) = env::var("CODELING_SHELL_TIMEOUT") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                self.tools.shell_timeout_secs = parsed;
            }
        }
        if let Ok(limit) = env::var("CODELING_GREP_LIMIT") {
            if let Ok(parsed) = limit.parse::<usize>() {
                self.tools.grep_max_hits = parsed;
            }
        }
    }
}
