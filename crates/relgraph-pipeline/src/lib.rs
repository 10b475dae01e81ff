//! relgraph Pipeline - Text to rendered relation graph
//!
//! A straight-line chain with one conditional skip:
//!
//! ```text
//! acquire text -> extract (LLM) -> parse -> build graph -> render
//! ```
//!
//! Blank text or an empty parse short-circuits with no document; that
//! is a normal outcome, not an error. PDF decoding and rendering do
//! blocking work and run on the blocking thread pool; the backend call
//! is awaited directly.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;
use std::time::Instant;

use relgraph_core::{LlmClient, RelgraphError, Result, Triplet};
use relgraph_extractor::{parse_relations, LlmRelationExtractor};
use relgraph_graph::{GraphRenderer, RelationGraph, RenderOptions};
use relgraph_parser::{acquire_text, DocumentInput};
use serde::Serialize;

/// Result handed to the presentation layer
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineOutput {
    /// Triplets in backend order, duplicates included
    pub triplets: Vec<Triplet>,

    /// Rendered document, absent when nothing was extracted
    pub graph_html: Option<String>,
}

impl PipelineOutput {
    /// The "no graph" outcome
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_graph(&self) -> bool {
        self.graph_html.is_some()
    }
}

/// Request-scoped pipeline over a shared backend client
pub struct Pipeline {
    extractor: LlmRelationExtractor,
    renderer: GraphRenderer,
}

impl Pipeline {
    /// Create a pipeline with default render options
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self::with_renderer(client, GraphRenderer::new(RenderOptions::default()))
    }

    /// Create a pipeline with a custom renderer
    pub fn with_renderer(client: Arc<dyn LlmClient>, renderer: GraphRenderer) -> Self {
        Self {
            extractor: LlmRelationExtractor::new(client),
            renderer,
        }
    }

    /// Run the whole chain for one input
    pub async fn run(&self, input: DocumentInput) -> Result<PipelineOutput> {
        let started = Instant::now();
        let kind = input.kind();

        let text = run_blocking(move || acquire_text(input).map_err(RelgraphError::from)).await?;
        if text.trim().is_empty() {
            tracing::info!(%kind, "Input text is empty, skipping extraction");
            return Ok(PipelineOutput::empty());
        }

        let response = self.extractor.extract_raw(&text).await?;
        let triplets = parse_relations(&response);
        if triplets.is_empty() {
            tracing::info!(%kind, response_len = response.len(), "No triplets extracted");
            return Ok(PipelineOutput::empty());
        }

        let graph_html = self.render(triplets.clone()).await?;

        tracing::info!(
            %kind,
            text_chars = text.len(),
            triplets = triplets.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline completed"
        );

        Ok(PipelineOutput {
            triplets,
            graph_html: Some(graph_html),
        })
    }

    /// Build the graph and render it off the async executor
    pub async fn render(&self, triplets: Vec<Triplet>) -> Result<String> {
        let renderer = self.renderer.clone();
        run_blocking(move || {
            let graph = RelationGraph::from_triplets(&triplets);
            renderer.render(&graph)
        })
        .await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RelgraphError::Other(anyhow::anyhow!("blocking task failed: {e}")))?
}
