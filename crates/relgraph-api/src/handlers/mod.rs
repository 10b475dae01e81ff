//! API handlers
//!
//! Author: hephaex@gmail.com

pub mod extract;
pub mod health;
pub mod index;

use crate::error::AppError;
use relgraph_parser::{DocumentInput, InputKind};

/// Turn the submitted selector and payloads into a pipeline input.
///
/// The payload that does not match the selected kind is ignored.
pub(crate) fn document_input(
    input_type: &str,
    text: Option<String>,
    pdf: Option<Vec<u8>>,
) -> Result<DocumentInput, AppError> {
    let kind: InputKind = input_type
        .parse()
        .map_err(|e: relgraph_parser::ParserError| AppError::BadRequest(e.to_string()))?;

    match kind {
        InputKind::Text => Ok(DocumentInput::Text(text.unwrap_or_default())),
        InputKind::Pdf => match pdf {
            Some(bytes) if !bytes.is_empty() => Ok(DocumentInput::Pdf(bytes)),
            _ => Err(AppError::BadRequest("No PDF file uploaded".to_string())),
        },
    }
}
