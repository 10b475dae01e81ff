//! relgraph API - Web interface and REST endpoints
//!
//! Serves the upload page, the JSON extraction endpoint and a health
//! probe. Every request runs its own pipeline; the only shared state is
//! the configuration and the backend client.
//!
//! Author: hephaex@gmail.com

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use handlers::{extract, health, index};
use state::AppState;
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "relgraph API",
        description = "Extract entity relations from text or PDF and render them as an interactive graph"
    ),
    paths(health::health_check, extract::extract_handler),
    components(schemas(
        health::HealthResponse,
        extract::ExtractRequest,
        extract::ExtractResponse,
        extract::TripletResponse,
        error::ApiError
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "extract", description = "Relation extraction")
    )
)]
pub struct ApiDoc;

/// API v1 routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/extract", post(extract::extract_handler))
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body_size = state.config.server.max_body_size;
    let cors = middleware::cors_layer(&state.config.server);

    Router::new()
        .route("/", get(index::index_page).post(index::submit_form))
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
