//! relgraph Extractor - LLM-based relation extraction
//!
//! Sends text to a generative-language backend with a fixed instruction
//! prompt and turns the reply into `Triplet` records.

use std::sync::Arc;

use async_trait::async_trait;
use relgraph_core::{LlmClient, RelgraphError, Result, Triplet};

pub mod parse;

pub use parse::{parse_relations, parse_response, strip_preamble, ParseError};

/// Instruction template; `{text}` is replaced by the input verbatim
pub const PROMPT_TEMPLATE: &str = include_str!("prompts/triplet_extraction.txt");

const TEXT_PLACEHOLDER: &str = "{text}";

/// Build the extraction prompt for a piece of text
pub fn build_prompt(text: &str) -> String {
    PROMPT_TEMPLATE.replacen(TEXT_PLACEHOLDER, text, 1)
}

/// Trait for relation extractors
#[async_trait]
pub trait RelationExtractor: Send + Sync {
    /// Extract triplets from text; an unusable reply yields an empty list
    async fn extract(&self, text: &str) -> Result<Vec<Triplet>>;
}

/// Relation extractor backed by an `LlmClient`
pub struct LlmRelationExtractor {
    client: Arc<dyn LlmClient>,
}

impl LlmRelationExtractor {
    /// Create an extractor over a backend client
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Call the backend once and return its reply unmodified
    pub async fn extract_raw(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(RelgraphError::Validation(
                "cannot extract relations from empty text".to_string(),
            ));
        }

        let prompt = build_prompt(text);
        tracing::debug!(
            model = self.client.model_name(),
            prompt_chars = prompt.len(),
            "Requesting relation extraction"
        );

        self.client.generate(&prompt).await
    }
}

#[async_trait]
impl RelationExtractor for LlmRelationExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<Triplet>> {
        let response = self.extract_raw(text).await?;
        let triplets = parse_relations(&response);
        tracing::info!(count = triplets.len(), "Extracted triplets");
        Ok(triplets)
    }
}

// ============================================================================
// Tests
// ============================================================================
