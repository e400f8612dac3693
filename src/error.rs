//! Structured error types for the rendering engine.
//!
//! Only two things can actually abort a render: input that fails to parse,
//! and a destination that can't be written. `Layout` exists for invariant
//! violations inside the paginator and should never be seen in practice.
//! Everything else (missing logo, unknown template, text that won't fit)
//! degrades gracefully and is only logged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by all public rendering functions.
#[derive(Debug, Error)]
pub enum RenderError {
    /// JSON input failed to parse as a document or settings record.
    #[error("Failed to parse input: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// The paginator hit a state it can't lay out.
    #[error("Layout error: {0}")]
    Layout(String),

    /// The finished PDF could not be written to its destination.
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to a caller-supplied stream failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected shape. Check field names and types (numbers must not be quoted).".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        RenderError::Parse { source: e, hint }
    }
}
