//! LLM Client implementations
//!
//! Provides `LlmClient` implementations for the Google Generative
//! Language API (Gemini), OpenAI-compatible chat completion APIs and
//! Ollama. Every client performs one request per `generate` call, with
//! the timeout taken from `LlmConfig`, and reports any failure as
//! `RelgraphError::Extraction`.
//!
//! Author: hephaex@gmail.com

use std::time::Duration;

use relgraph_core::{LlmClient, LlmConfig, LlmProvider, RelgraphError, Result};
use reqwest::Client;

pub mod gemini;
pub mod ollama;
pub mod openai;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

/// Build the shared HTTP client with a request timeout
pub(crate) fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {e}");
            Client::new()
        })
}

/// Map a transport error, calling out timeouts explicitly
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> RelgraphError {
    if err.is_timeout() {
        RelgraphError::Extraction(format!("{provider} request timed out: {err}"))
    } else {
        RelgraphError::Extraction(format!("{provider} request failed: {err}"))
    }
}

/// Turn a non-success HTTP response into an extraction error
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> RelgraphError {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    tracing::warn!(%status, "{provider} returned an error response");
    RelgraphError::Extraction(format!("{provider} error ({status}): {error_text}"))
}

// ============================================================================
// Factory function
// ============================================================================

/// Create an LLM client from config
pub fn create_llm_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    match config.provider {
        LlmProvider::Gemini => Ok(Box::new(GeminiClient::from_config(config)?)),
        LlmProvider::OpenAI => Ok(Box::new(OpenAiClient::from_config(config)?)),
        LlmProvider::Ollama => Ok(Box::new(OllamaClient::from_config(config))),
    }
}

// ============================================================================
// Tests
// ============================================================================
