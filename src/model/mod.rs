//! # Document Model
//!
//! The input representation for the rendering engine: one invoice or quote,
//! plus the settings record (company profile, template choice, page size)
//! that the desktop app keeps alongside its drafts.
//!
//! Field names follow the JSON the app already persists, so a saved draft
//! deserializes directly. Every field has a default; a half-filled draft
//! still renders.
//!
//! A `Document` is immutable input. The engine never writes back into it and
//! derives everything it needs (row totals, titles, watermark) on the fly.

use serde::{Deserialize, Serialize};

/// A complete invoice or quote ready for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Legacy document kind. Used for the title when `doc_type` is absent.
    pub kind: DocumentKind,

    /// Explicit document type. Takes precedence over `kind`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentKind>,

    pub client: Client,

    pub meta: DocumentMeta,

    /// Line items in display order.
    pub items: Vec<LineItem>,

    /// Pre-computed by the caller. Rendered as-is, never recomputed here.
    pub totals: Totals,

    /// Free text, may contain explicit line breaks.
    pub notes: String,
}

impl Document {
    /// The human title: "Invoice" or "Quote".
    pub fn title(&self) -> &'static str {
        self.doc_type.unwrap_or(self.kind).title()
    }
}

/// Whether the document is an invoice or a quote.
///
/// Only `"invoice"` selects an invoice. Any other string is read as a quote,
/// so a draft with a misspelled kind still renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum DocumentKind {
    #[default]
    Invoice,
    Quote,
}

impl DocumentKind {
    /// Parse a raw kind string. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "invoice" => DocumentKind::Invoice,
            "quote" => DocumentKind::Quote,
            other => {
                log::warn!("Unknown document kind '{}', rendering as a quote", other);
                DocumentKind::Quote
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Invoice",
            DocumentKind::Quote => "Quote",
        }
    }
}

/// The billed party.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    pub name: String,
    pub business: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl Client {
    /// Business name when present, otherwise the contact name.
    pub fn display_name(&self) -> &str {
        if self.business.trim().is_empty() {
            &self.name
        } else {
            &self.business
        }
    }
}

/// Numbering, dates and payment state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMeta {
    pub number: String,
    /// Opaque date string, printed verbatim.
    pub date: String,
    pub due_date: String,
    pub terms: String,
    pub status: Status,
}

/// Payment status.
///
/// The three recognised values drive the watermark. Anything else the user
/// typed is kept verbatim in `Other` and only shown in the meta block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Status {
    #[default]
    None,
    Paid,
    Unpaid,
    Overdue,
    Other(String),
}

impl Status {
    /// Parse a raw status string. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_uppercase().as_str() {
            "" => Status::None,
            "PAID" => Status::Paid,
            "UNPAID" => Status::Unpaid,
            "OVERDUE" => Status::Overdue,
            _ => Status::Other(trimmed.to_string()),
        }
    }

    /// Caption for the diagonal watermark, if this status gets one.
    pub fn watermark(&self) -> Option<&'static str> {
        match self {
            Status::Paid => Some("PAID"),
            Status::Unpaid => Some("UNPAID"),
            Status::Overdue => Some("OVERDUE"),
            Status::None | Status::Other(_) => None,
        }
    }

    /// Text for the meta block's status line. Empty when there is no status.
    pub fn label(&self) -> &str {
        match self {
            Status::None => "",
            Status::Paid => "PAID",
            Status::Unpaid => "UNPAID",
            Status::Overdue => "OVERDUE",
            Status::Other(text) => text,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Status::None)
    }
}

impl From<Option<String>> for DocumentKind {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(DocumentKind::parse).unwrap_or_default()
    }
}

impl From<DocumentKind> for String {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Invoice => "invoice".to_string(),
            DocumentKind::Quote => "quote".to_string(),
        }
    }
}

impl From<Option<String>> for Status {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(Status::parse).unwrap_or_default()
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.label().to_string()
    }
}

/// One billed row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    /// Short label, drawn unwrapped in the first column.
    pub service: String,
    /// Free text, wraps inside the description column.
    pub description: String,
    pub qty: f64,
    pub unit_price: f64,
    pub tax_pct: f64,
}

impl LineItem {
    /// `qty × unit_price × (1 + tax_pct / 100)`.
    pub fn line_total(&self) -> f64 {
        self.qty * self.unit_price * (1.0 + self.tax_pct / 100.0)
    }
}

/// Document totals as the form computed them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub grand_total: f64,
}

/// The issuing company, owned by the settings store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    /// File path or `data:image/...;base64,` URI. Unreadable logos are skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
}

/// Everything the renderer needs besides the document itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub company: Company,
    pub pdf: PdfSettings,
    /// Pre-fill text for the notes field. Owned by the form, not used here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_notes: Option<String>,
}

/// Output options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    /// Template name: "Modern", "Compact" or "Minimal". Anything else means Modern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub page_size: PageSize,
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}
