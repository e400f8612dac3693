//! # Page Layout
//!
//! Turns a document into pages of positioned draw commands.
//!
//! The layout never builds one tall canvas and slices it. It works the way a
//! pen on paper does:
//!
//! 1. Draw the fixed blocks of the first page (title bar, company, meta,
//!    Bill To, column header).
//! 2. For each line item, measure its wrapped height and ask: does this row
//!    still fit above the footer reserve?
//! 3. If it fits, draw it and move the cursor down.
//! 4. If it doesn't, close the page, open a new one, repeat the column header
//!    and watermark, and draw the row there. Rows are never split.
//! 5. After the last item, draw notes and totals on whatever page is current.
//!
//! Coordinates are PDF points with the origin at the bottom-left of the page
//! and y growing upward. Text positions are baselines. The PDF writer emits
//! them unchanged.
//!
//! Everything here is a pure function of the document, the settings and the
//! selected template profile. A `PageCanvas` lives for one render pass only.

pub mod columns;
mod flow;
pub mod page_break;
pub mod sections;

use crate::error::{RenderError, Result};
use crate::font::{FontContext, StandardFont};
use crate::image_loader::{load_image, LoadedImage};
use crate::model::{Company, Document, Settings};
use crate::style::Color;
use crate::template::{select_profile, TemplateProfile};
use crate::text::{fit_size, FittedSize, TextLayout};

pub use columns::{compute_columns, Columns};
pub use flow::{FlowState, Paginator};

/// A single laid-out page.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    /// Drawn in order; later elements paint over earlier ones.
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    /// Every text run on the page, in drawing order. Includes the watermark.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| e.text())
    }

    /// First element whose text is exactly `text`.
    pub fn find_text(&self, text: &str) -> Option<&LayoutElement> {
        self.elements.iter().find(|e| e.text() == Some(text))
    }

    /// All elements drawn by one section.
    pub fn section(&self, section: Section) -> impl Iterator<Item = &LayoutElement> {
        self.elements.iter().filter(move |e| e.section == section)
    }

    pub fn watermark(&self) -> Option<&str> {
        self.elements.iter().find_map(|e| match &e.draw {
            DrawCommand::Watermark { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A positioned drawing operation.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    /// Left edge. For text, the start of the baseline.
    pub x: f64,
    /// Bottom edge. For text, the baseline.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draw: DrawCommand,
    /// Which block produced this element.
    pub section: Section,
}

impl LayoutElement {
    pub fn text(&self) -> Option<&str> {
        match &self.draw {
            DrawCommand::Text { text, .. } | DrawCommand::Watermark { text, .. } => {
                Some(text.as_str())
            }
            _ => None,
        }
    }

    pub fn font_size(&self) -> Option<f64> {
        match &self.draw {
            DrawCommand::Text { font_size, .. } | DrawCommand::Watermark { font_size, .. } => {
                Some(*font_size)
            }
            _ => None,
        }
    }

    /// Right edge of the element's box.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Logical block an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    HeaderBar,
    Company,
    Logo,
    Meta,
    BillTo,
    ColumnHeader,
    /// Line item by its index in the document.
    Row(usize),
    Notes,
    Totals,
    Watermark,
}

/// What to actually draw for an element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Rectangle covering the element box.
    Rect {
        fill: Option<Color>,
        stroke: Option<Color>,
        line_width: f64,
    },
    /// Straight line from (x, y) to (x2, y2).
    Line {
        x2: f64,
        y2: f64,
        color: Color,
        line_width: f64,
    },
    /// One line of text in a standard font.
    Text {
        text: String,
        font: StandardFont,
        font_size: f64,
        color: Color,
    },
    /// Rotated, translucent text rotated about (x, y).
    Watermark {
        text: String,
        font: StandardFont,
        font_size: f64,
        color: Color,
        opacity: f64,
        angle_degrees: f64,
    },
    /// Image scaled into the element box.
    Image { image_data: LoadedImage },
}

/// The drawing surface for one render pass.
///
/// Records draw commands for the current page and keeps finished pages.
/// Owns nothing global: two renders never share a canvas.
pub struct PageCanvas<'a> {
    fonts: &'a FontContext,
    width: f64,
    height: f64,
    section: Section,
    elements: Vec<LayoutElement>,
    pages: Vec<LayoutPage>,
}

impl<'a> PageCanvas<'a> {
    pub fn new(fonts: &'a FontContext, width: f64, height: f64) -> Self {
        Self {
            fonts,
            width,
            height,
            section: Section::HeaderBar,
            elements: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Zero-based index of the page being drawn.
    pub fn page_index(&self) -> usize {
        self.pages.len()
    }

    /// Tag subsequent elements with `section`.
    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn measure(&self, text: &str, font: StandardFont, size: f64) -> f64 {
        self.fonts.measure_string(text, font, size)
    }

    pub fn wrap(&self, text: &str, font: StandardFont, size: f64, max_width: f64) -> Vec<String> {
        TextLayout::new(self.fonts).wrap(text, font, size, max_width)
    }

    fn push(&mut self, x: f64, y: f64, width: f64, height: f64, draw: DrawCommand) {
        self.elements.push(LayoutElement {
            x,
            y,
            width,
            height,
            draw,
            section: self.section,
        });
    }

    /// Draw `text` with its baseline starting at (x, y). Empty strings draw nothing.
    pub fn text(&mut self, x: f64, y: f64, text: &str, font: StandardFont, size: f64, color: Color) {
        if text.is_empty() {
            return;
        }
        let width = self.measure(text, font, size);
        self.push(
            x,
            y,
            width,
            size,
            DrawCommand::Text {
                text: text.to_string(),
                font,
                font_size: size,
                color,
            },
        );
    }

    /// Draw `text` so that it ends at `right`.
    pub fn text_right(
        &mut self,
        right: f64,
        y: f64,
        text: &str,
        font: StandardFont,
        size: f64,
        color: Color,
    ) {
        let width = self.measure(text, font, size);
        self.text(right - width, y, text, font, size, color);
    }

    /// Draw `text` right-aligned at `right`, shrinking from `base` toward
    /// `floor` until it is no wider than `max_width`. At the floor it is drawn
    /// anyway and may overflow to the left.
    #[allow(clippy::too_many_arguments)]
    pub fn text_fit(
        &mut self,
        right: f64,
        y: f64,
        text: &str,
        font: StandardFont,
        max_width: f64,
        base: f64,
        floor: f64,
        color: Color,
    ) -> FittedSize {
        let fitted = fit_size(self.fonts, text, font, max_width, base, floor);
        if fitted.overflows {
            log::debug!(
                "'{}' is {:.1}pt wide at the {}pt floor, column holds {:.1}pt",
                text,
                fitted.width,
                floor,
                max_width
            );
        }
        self.text(right - fitted.width, y, text, font, fitted.size, color);
        fitted
    }

    /// Rectangle with its bottom-left corner at (x, y).
    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<Color>,
        line_width: f64,
    ) {
        self.push(x, y, width, height, DrawCommand::Rect { fill, stroke, line_width });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, line_width: f64) {
        self.push(
            x1,
            y1,
            (x2 - x1).abs(),
            (y2 - y1).abs(),
            DrawCommand::Line {
                x2,
                y2,
                color,
                line_width,
            },
        );
    }

    /// Image scaled to fill the box with bottom-left corner (x, y).
    pub fn image(&mut self, x: f64, y: f64, width: f64, height: f64, image: &LoadedImage) {
        self.push(
            x,
            y,
            width,
            height,
            DrawCommand::Image {
                image_data: image.clone(),
            },
        );
    }

    /// Translucent text rotated by `angle_degrees` about its baseline start (x, y).
    #[allow(clippy::too_many_arguments)]
    pub fn rotated_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        font: StandardFont,
        size: f64,
        color: Color,
        opacity: f64,
        angle_degrees: f64,
    ) {
        let width = self.measure(text, font, size);
        self.push(
            x,
            y,
            width,
            size,
            DrawCommand::Watermark {
                text: text.to_string(),
                font,
                font_size: size,
                color,
                opacity,
                angle_degrees,
            },
        );
    }

    /// Close the current page and start a blank one.
    pub fn show_page(&mut self) {
        let elements = std::mem::take(&mut self.elements);
        self.pages.push(LayoutPage {
            width: self.width,
            height: self.height,
            elements,
        });
    }

    /// Close the current page and hand back every page drawn.
    pub fn finish(mut self) -> Vec<LayoutPage> {
        self.show_page();
        self.pages
    }
}

/// Lay out a document with the template named in its settings.
pub fn layout_document(doc: &Document, settings: &Settings) -> Result<Vec<LayoutPage>> {
    let profile = select_profile(settings.pdf.template.as_deref());
    layout_with_profile(doc, settings, &profile)
}

/// Lay out a document with an explicit template profile.
pub fn layout_with_profile(
    doc: &Document,
    settings: &Settings,
    profile: &TemplateProfile,
) -> Result<Vec<LayoutPage>> {
    let (page_width, page_height) = settings.pdf.page_size.dimensions();
    if !(page_width.is_finite() && page_height.is_finite() && page_width > 0.0 && page_height > 0.0)
    {
        return Err(RenderError::Layout(format!(
            "invalid page size {}x{}",
            page_width, page_height
        )));
    }

    let logo = load_logo(&settings.company);
    let fonts = FontContext::new();
    let canvas = PageCanvas::new(&fonts, page_width, page_height);

    let mut paginator = Paginator::new(canvas, profile, doc.meta.status.watermark());
    paginator.begin(doc, &settings.company, logo.as_ref())?;
    for (index, item) in doc.items.iter().enumerate() {
        paginator.place_item(index, item)?;
    }
    paginator.draw_totals(doc)?;
    let pages = paginator.close();

    log::debug!(
        "Laid out {} item(s) on {} page(s) with the {} template",
        doc.items.len(),
        pages.len(),
        profile.name.as_str()
    );
    Ok(pages)
}

/// Load the company logo once for the whole render. Failures only cost the logo.
fn load_logo(company: &Company) -> Option<LoadedImage> {
    let src = company.logo_path.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    match load_image(src) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("Skipping company logo: {}", e);
            None
        }
    }
}
