//! Language model implementations and abstractions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::ModelConfig;
use crate::error::{CodelingError, Result};

/// Minimal abstraction around a text completion provider: one prompt in, one
/// completion out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

fn coalesce_error(status: reqwest::StatusCode, body: &str, provider: &str) -> CodelingError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return CodelingError::LanguageModel(format!("{provider} rate limit exceeded: {body}"));
    }
    CodelingError::LanguageModel(format!("{provider} request failed with {status}: {body}"))
}

/// Ollama client for local inference via the `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(300)) // local models can be slow
                .build()
                .map_err(|err| CodelingError::LanguageModel(format!("http client error: {err}")))?,
            model: "llama3.1".to_string(),
            base_url: "http://localhost:11434".to_string(),
            temperature: 0.7,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.base_url = host.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn from_config(cfg: &ModelConfig) -> Result<Self> {
        Ok(Self::new()?
            .with_host(cfg.base_url.clone())
            .with_model(cfg.model.clone())
            .with_temperature(cfg.temperature))
    }

    pub fn from_env() -> Result<Self> {
        let mut client = Self::new()?;
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            client.base_url = host;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            client.model = model;
        }
        Ok(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.temperature,
            },
        });

        let resp = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| CodelingError::LanguageModel(format!("Ollama request failed: {err}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(coalesce_error(status, &body, "Ollama"));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|err| CodelingError::LanguageModel(format!("Ollama parse error: {err}")))?;

        Ok(parsed.response)
    }
}

/// A deterministic model used for tests and demos: replays scripted
/// completions in order.
pub struct StubModel {
    responses: Mutex<VecDeque<String>>,
}

impl StubModel {
    pub fn new(responses: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
        })
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        let mut locked = self.responses.lock().expect("stub model poisoned");
        locked.pop_front().ok_or_else(|| {
            CodelingError::LanguageModel("StubModel ran out of scripted responses".into())
        })
    }
}
