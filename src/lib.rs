//! # invoice-render
//!
//! A page-native layout and pagination engine for invoices and quotes.
//!
//! An invoice looks simple until it runs onto a second page. Numeric columns
//! must never collide, descriptions wrap and grow their rows, oversized
//! amounts shrink to fit instead of spilling into the next column, the totals
//! box needs a guaranteed spot at the bottom, and every continuation page
//! repeats the column header and status watermark. This crate does exactly
//! that, for three template looks (Modern, Compact, Minimal) that share one
//! algorithm and differ only in constants.
//!
//! ## Architecture
//!
//! ```text
//! Document + Settings (serde / JSON)
//!       ↓
//!   [template]: pick the constant bundle for the named template
//!       ↓
//!   [layout]: columns, sections, row flow and page breaks
//!       ↓         (measures with [font], wraps and fits with [text])
//!   LayoutPage*: positioned draw commands per page
//!       ↓
//!   [pdf]: serialize to PDF bytes
//! ```
//!
//! Rendering is a pure function of its inputs. The only I/O is reading the
//! optional logo, and writing the result when asked to.

pub mod error;
pub mod font;
pub mod format;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;
pub mod template;
pub mod text;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use error::{RenderError, Result};
pub use layout::{layout_document, LayoutPage};
pub use model::{Document, Settings};
pub use template::{select_profile, TemplateName, TemplateProfile};

use pdf::{Metadata, PdfWriter};

/// Render a document to PDF bytes.
///
/// This is the primary entry point. The template comes from
/// `settings.pdf.template`; unknown names fall back to Modern.
pub fn render(doc: &Document, settings: &Settings) -> Result<Vec<u8>> {
    let pages = layout_document(doc, settings)?;
    let metadata = Metadata {
        title: Some(doc.title().to_string()),
        author: Some(settings.company.name.clone()),
    };
    let bytes = PdfWriter::new().write(&pages, &metadata);
    log::info!("Rendered {} ({} page(s), {} bytes)", doc.title(), pages.len(), bytes.len());
    Ok(bytes)
}

/// Render a document and write the PDF to any byte sink.
pub fn render_to_writer<W: Write>(doc: &Document, settings: &Settings, mut out: W) -> Result<()> {
    let bytes = render(doc, settings)?;
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}

/// Render a document to a file. Returns the path written on success.
pub fn render_to_path(doc: &Document, settings: &Settings, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref().to_path_buf();
    let bytes = render(doc, settings)?;
    fs::write(&path, &bytes).map_err(|source| RenderError::Write {
        path: path.clone(),
        source,
    })?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}

/// Render a document and settings given as JSON.
pub fn render_json(document_json: &str, settings_json: &str) -> Result<Vec<u8>> {
    let doc: Document = serde_json::from_str(document_json)?;
    let settings: Settings = if settings_json.trim().is_empty() {
        Settings::default()
    } else {
        serde_json::from_str(settings_json)?
    };
    render(&doc, &settings)
}
