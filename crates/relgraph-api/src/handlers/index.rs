//! Upload page handlers
//!
//! Author: hephaex@gmail.com

use super::document_input;
use crate::error::AppError;
use crate::page::{IndexPage, Outcome};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
};
use relgraph_parser::InputKind;
use std::sync::Arc;

/// Fields posted by the upload form
#[derive(Debug, Default)]
struct FormSubmission {
    input_type: Option<String>,
    text_input: Option<String>,
    pdf_file: Option<Vec<u8>>,
}

/// Render the empty form
pub async fn index_page() -> Html<String> {
    Html(IndexPage::initial().render())
}

/// Run the pipeline for a form submission and render the result page.
///
/// Failures are shown as an error banner with the matching status code.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    state.increment_requests();

    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(err) => return error_page(InputKind::Text, "", &err),
    };

    let input_type = form.input_type.as_deref().unwrap_or(InputKind::Text.as_str());
    let input_kind: InputKind = input_type.parse().unwrap_or(InputKind::Text);
    let text = form.text_input.clone().unwrap_or_default();

    let input = match document_input(input_type, form.text_input, form.pdf_file) {
        Ok(input) => input,
        Err(err) => return error_page(input_kind, &text, &err),
    };

    match state.pipeline().run(input).await {
        Ok(output) => {
            let page = IndexPage {
                input_kind,
                text: &text,
                outcome: Outcome::Finished(&output),
            };
            (StatusCode::OK, Html(page.render()))
        }
        Err(err) => error_page(input_kind, &text, &AppError::from(err)),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<FormSubmission, AppError> {
    let mut form = FormSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("input_type") => form.input_type = Some(read_text(field).await?),
            Some("text_input") => form.text_input = Some(read_text(field).await?),
            Some("pdf_file") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
                // Browsers send an empty part when no file was chosen
                if !data.is_empty() {
                    form.pdf_file = Some(data.to_vec());
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {e}")))
}

fn error_page(input_kind: InputKind, text: &str, err: &AppError) -> (StatusCode, Html<String>) {
    let status = err.status();
    if status.is_server_error() {
        tracing::warn!(%status, error = ?err, "Form submission failed");
    } else {
        tracing::debug!(%status, error = ?err, "Form submission rejected");
    }

    let message = err.banner_message();
    let page = IndexPage {
        input_kind,
        text,
        outcome: Outcome::Failed(&message),
    };
    (status, Html(page.render()))
}
