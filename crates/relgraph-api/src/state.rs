//! Application state management
//!
//! Author: hephaex@gmail.com

use relgraph_core::{AppConfig, LlmClient, Result};
use relgraph_graph::{GraphRenderer, RenderOptions};
use relgraph_pipeline::Pipeline;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Backend client shared by every request
    pub llm_client: Arc<dyn LlmClient>,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    request_count: AtomicU64,
}

impl AppState {
    /// Create application state around an existing backend client
    pub fn new(config: AppConfig, llm_client: Arc<dyn LlmClient>) -> Self {
        Self {
            config,
            llm_client,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Create application state, building the backend client from config
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let client = relgraph_llm::create_llm_client(&config.llm)?;
        Ok(Self::new(config, Arc::from(client)))
    }

    /// Pipeline for one request
    pub fn pipeline(&self) -> Pipeline {
        let renderer = GraphRenderer::new(RenderOptions::from(&self.config.graph));
        Pipeline::with_renderer(self.llm_client.clone(), renderer)
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
