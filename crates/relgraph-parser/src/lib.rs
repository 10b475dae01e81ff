//! relgraph Parser - Text acquisition
//!
//! Turns the two supported inputs into one plain-text string:
//! - Raw text, passed through unchanged
//! - PDF documents, every page extracted in reading order and joined
//!   with a newline
//!
//! A payload that is not a decodable PDF is a `ParserError::Decode`,
//! never silently empty text.

use std::path::Path;
use thiserror::Error;

pub mod pdf;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;

pub use pdf::PdfParser;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during text acquisition
#[derive(Error, Debug)]
pub enum ParserError {
    /// Payload is not a valid document of the expected format
    #[error("Failed to decode document: {0}")]
    Decode(String),

    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Text file is not valid UTF-8
    #[error("Text encoding error: {0}")]
    Encoding(String),

    /// File format is not supported
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Unknown input kind selector
    #[error("Unknown input type: {0}")]
    UnknownInputKind(String),
}

impl From<ParserError> for relgraph_core::RelgraphError {
    fn from(err: ParserError) -> Self {
        use relgraph_core::RelgraphError;

        match err {
            ParserError::Decode(msg) => RelgraphError::Decode(msg),
            ParserError::Encoding(msg) => RelgraphError::Decode(msg),
            ParserError::UnsupportedFormat(_) | ParserError::UnknownInputKind(_) => {
                RelgraphError::Validation(err.to_string())
            }
            ParserError::Io { .. } => RelgraphError::Other(err.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Input Types
// ============================================================================

/// Input-kind selector sent by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Free text typed by the user
    Text,
    /// Uploaded PDF document
    Pdf,
}

impl InputKind {
    /// Label used by the web form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Pdf => "PDF File",
        }
    }
}

impl std::str::FromStr for InputKind {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "pdf file" | "pdf" => Ok(Self::Pdf),
            _ => Err(ParserError::UnknownInputKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation's worth of input
#[derive(Debug, Clone)]
pub enum DocumentInput {
    /// Raw text
    Text(String),
    /// Binary PDF payload
    Pdf(Vec<u8>),
}

impl DocumentInput {
    /// The selector this input corresponds to
    pub fn kind(&self) -> InputKind {
        match self {
            Self::Text(_) => InputKind::Text,
            Self::Pdf(_) => InputKind::Pdf,
        }
    }

    /// Read an input from disk, choosing the decoder by extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| ParserError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        match FileType::from_path(path) {
            FileType::Pdf => Ok(Self::Pdf(bytes)),
            FileType::PlainText | FileType::Markdown => String::from_utf8(bytes)
                .map(Self::Text)
                .map_err(|e| ParserError::Encoding(format!("{}: {e}", path.display()))),
            FileType::Unknown => Err(ParserError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// File types the CLI can read from disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Markdown,
    PlainText,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "md" | "markdown" => Self::Markdown,
            "txt" | "text" => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

// ============================================================================
// Acquisition
// ============================================================================

/// Produce a single plain-text string from either input kind.
///
/// Text passes through untouched; emptiness is the caller's concern.
/// This may block on PDF decoding, so async callers should run it on a
/// blocking thread.
pub fn acquire_text(input: DocumentInput) -> Result<String> {
    match input {
        DocumentInput::Text(text) => Ok(text),
        DocumentInput::Pdf(bytes) => PdfParser::new().extract_text(&bytes),
    }
}

// ============================================================================
// Tests
// ============================================================================
