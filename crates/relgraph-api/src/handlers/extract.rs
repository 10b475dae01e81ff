//! JSON extraction handler
//!
//! Author: hephaex@gmail.com

use super::document_input;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use base64::Engine;
use relgraph_core::Triplet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Extraction request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExtractRequest {
    /// Input kind selector
    #[schema(example = "Text")]
    pub input_type: String,

    /// Raw text, used when `input_type` is `Text`
    #[serde(default)]
    #[schema(example = "Paris is the capital of France.")]
    pub text: Option<String>,

    /// Base64 encoded PDF, used when `input_type` is `PDF File`
    #[serde(default)]
    pub pdf_base64: Option<String>,
}

/// One extracted relation
#[derive(Debug, Serialize, ToSchema)]
pub struct TripletResponse {
    #[schema(example = "Paris")]
    pub subject: String,
    #[schema(example = "is capital of")]
    pub relation: String,
    #[schema(example = "France")]
    pub object: String,
}

impl From<Triplet> for TripletResponse {
    fn from(t: Triplet) -> Self {
        Self {
            subject: t.subject,
            relation: t.relation,
            object: t.object,
        }
    }
}

/// Extraction response
#[derive(Debug, Serialize, ToSchema)]
pub struct ExtractResponse {
    /// Triplets in backend order, duplicates included
    pub triplets: Vec<TripletResponse>,

    /// Rendered graph document, null when nothing was extracted
    pub graph_html: Option<String>,
}

/// Extract relations from text or a PDF and render them as a graph
#[utoipa::path(
    post,
    path = "/api/v1/extract",
    tag = "extract",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Extraction finished", body = ExtractResponse),
        (status = 400, description = "Invalid input or unreadable document", body = crate::error::ApiError),
        (status = 502, description = "Backend call failed", body = crate::error::ApiError),
        (status = 500, description = "Internal error", body = crate::error::ApiError)
    )
)]
pub async fn extract_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    state.increment_requests();

    let pdf = req
        .pdf_base64
        .as_deref()
        .map(|encoded| {
            base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| AppError::BadRequest(format!("Invalid base64 PDF payload: {e}")))
        })
        .transpose()?;
    let input = document_input(&req.input_type, req.text, pdf)?;

    let output = state.pipeline().run(input).await?;

    Ok(Json(ExtractResponse {
        triplets: output.triplets.into_iter().map(Into::into).collect(),
        graph_html: output.graph_html,
    }))
}
