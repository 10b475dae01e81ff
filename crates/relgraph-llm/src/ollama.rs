//! Ollama client

use async_trait::async_trait;
use relgraph_core::{LlmClient, LlmConfig, RelgraphError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{http_client, status_error, transport_error};

/// Ollama API client
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct OllamaResponse {
    response: String,
    done: bool,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: http_client(LlmConfig::default().timeout_secs),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.ollama_url.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("Ollama", e))?;

        if !response.status().is_success() {
            return Err(status_error("Ollama", response).await);
        }

        let result: OllamaResponse = response.json().await.map_err(|e| {
            RelgraphError::Extraction(format!("Failed to parse Ollama response: {e}"))
        })?;

        Ok(result.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
