//! relgraph Core - Domain models, traits, and shared types
//!
//! This crate defines the abstractions shared by every stage of the
//! text-to-graph pipeline:
//! - The `Triplet` record extracted from text
//! - Common error types
//! - The `LlmClient` trait implemented by backend clients
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, GraphConfig, LlmConfig, LlmProvider, LoggingConfig, ServerConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for relgraph operations
#[derive(Error, Debug)]
pub enum RelgraphError {
    /// Document payload could not be decoded into text
    #[error("Decode error: {0}")]
    Decode(String),

    /// Backend call failed (network, auth, quota, timeout)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Rendering the graph document failed
    #[error("Render error: {0}")]
    Render(String),

    /// Caller supplied invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for RelgraphError {
    fn from(err: ConfigError) -> Self {
        RelgraphError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelgraphError>;

// ============================================================================
// Triplets
// ============================================================================

/// A (subject, relation, object) record extracted from text.
///
/// Entity labels are compared by exact string match; no normalization
/// is applied anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triplet {
    /// Source entity label
    pub subject: String,

    /// Free-text relation label
    pub relation: String,

    /// Target entity label
    pub object: String,
}

impl Triplet {
    /// Create a new triplet
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }

    /// True when subject and object are the same entity
    pub fn is_self_loop(&self) -> bool {
        self.subject == self.object
    }
}

impl std::fmt::Display for Triplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) -[{}]-> ({})", self.subject, self.relation, self.object)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for generative-language backends
///
/// One call is text in, text out. Implementations must map every
/// transport or provider failure to `RelgraphError::Extraction`.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response for the prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier, used for logging
    fn model_name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================
