//! # Fixed Blocks
//!
//! Everything on the page that is not an item row: the title bar, company
//! and meta blocks, Bill To, the column header, notes, totals and the status
//! watermark. Each block draws at positions derived from the template
//! profile and the resolved columns, so the three templates share this code.

use crate::font::StandardFont;
use crate::format::format_money;
use crate::image_loader::LoadedImage;
use crate::model::{Client, Company, Document, Totals};
use crate::style::Color;
use crate::template::TemplateProfile;

use super::columns::Columns;
use super::{PageCanvas, Section};

const REGULAR: StandardFont = StandardFont::Helvetica;
const BOLD: StandardFont = StandardFont::HelveticaBold;

/// Helvetica cap height as a fraction of the font size.
const CAP_HEIGHT: f64 = 0.718;

const RULE_WIDTH: f64 = 0.75;

/// Column captions, left to right.
pub const CAPTIONS: [&str; 6] = ["Service / Item", "Description", "Qty", "Unit", "Tax %", "Total"];

/// Draws the fixed blocks for one profile and one set of columns.
#[derive(Debug, Clone, Copy)]
pub struct SectionRenderer<'p> {
    profile: &'p TemplateProfile,
    columns: Columns,
}

impl<'p> SectionRenderer<'p> {
    pub fn new(profile: &'p TemplateProfile, columns: Columns) -> Self {
        Self { profile, columns }
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    fn meta_left(&self) -> f64 {
        self.columns.content_right - self.profile.blocks.meta_width
    }

    /// Reference line of the company and meta blocks.
    fn block_top(&self, canvas: &PageCanvas) -> f64 {
        canvas.height() - self.profile.blocks.top
    }

    /// Full-width title bar with the brand on the left and the document
    /// title flush right.
    pub fn header_bar(&self, canvas: &mut PageCanvas, brand: &str, title: &str) {
        let header = &self.profile.header;
        let (page_w, page_h) = (canvas.width(), canvas.height());
        canvas.set_section(Section::HeaderBar);
        canvas.rect(
            0.0,
            page_h - header.bar_height,
            page_w,
            header.bar_height,
            Some(header.bar_color),
            None,
            0.0,
        );

        let baseline = page_h - header.baseline_drop;
        canvas.text(
            self.profile.margin,
            baseline,
            brand,
            BOLD,
            header.brand_size,
            header.text_color,
        );
        canvas.text_right(
            self.columns.content_right,
            baseline,
            title,
            BOLD,
            header.title_size,
            header.text_color,
        );
    }

    /// Logo, company name and contact lines. The lines wrap short of the meta
    /// column. Returns the lowest y the block reaches.
    pub fn company_block(
        &self,
        canvas: &mut PageCanvas,
        company: &Company,
        logo: Option<&LoadedImage>,
    ) -> f64 {
        let blocks = &self.profile.blocks;
        let top = self.block_top(canvas);
        let name_y = top + blocks.name_rise;
        let mut bottom = name_y;

        let mut left = self.profile.margin;
        if let Some(image) = logo {
            let box_size = blocks.logo_box;
            let box_top = name_y + blocks.heading_size * CAP_HEIGHT;
            let box_bottom = box_top - box_size;
            let (w, h) = image.fit_within(box_size, box_size);
            canvas.set_section(Section::Logo);
            canvas.image(
                left + (box_size - w) / 2.0,
                box_bottom + (box_size - h) / 2.0,
                w,
                h,
                image,
            );
            left += box_size + blocks.logo_gap;
            bottom = bottom.min(box_bottom);
        }

        canvas.set_section(Section::Company);
        canvas.text(left, name_y, &company.name, BOLD, blocks.heading_size, Color::BLACK);

        let wrap_width = self.meta_left() - blocks.logo_gap - left;
        let details = [
            company.address.as_str(),
            company.email.as_str(),
            company.phone.as_str(),
            company.website.as_str(),
        ];
        let mut y = top - blocks.detail_drop;
        for detail in details.iter().filter(|d| !d.trim().is_empty()) {
            for line in canvas.wrap(detail, REGULAR, blocks.detail_size, wrap_width) {
                canvas.text(left, y, &line, REGULAR, blocks.detail_size, Color::BLACK);
                bottom = bottom.min(y);
                y -= blocks.line_height;
            }
        }
        bottom
    }

    /// "<Title> Details", the meta lines, then Bill To underneath. Returns the
    /// lowest baseline drawn.
    pub fn meta_block(&self, canvas: &mut PageCanvas, doc: &Document) -> f64 {
        let blocks = &self.profile.blocks;
        let left = self.meta_left();
        let title = doc.title();
        let meta = &doc.meta;

        canvas.set_section(Section::Meta);
        let mut y = self.block_top(canvas) + blocks.name_rise;
        canvas.text(
            left,
            y,
            &format!("{} Details", title),
            BOLD,
            blocks.heading_size,
            Color::BLACK,
        );
        y -= blocks.heading_advance;

        let mut lines = vec![
            format!("{} #: {}", title, meta.number),
            format!("Date: {}", meta.date),
            format!("Due: {}{}", meta.due_date, terms_suffix(&meta.terms)),
        ];
        if !meta.status.is_empty() {
            lines.push(format!("Status: {}", meta.status.label()));
        }
        let mut bottom = y;
        for line in &lines {
            canvas.text(left, y, line, REGULAR, blocks.detail_size, Color::BLACK);
            bottom = y;
            y -= blocks.line_height;
        }

        y -= blocks.section_gap;
        self.bill_to(canvas, &doc.client, y).min(bottom)
    }

    fn bill_to(&self, canvas: &mut PageCanvas, client: &Client, heading_y: f64) -> f64 {
        let blocks = &self.profile.blocks;
        let left = self.meta_left();

        canvas.set_section(Section::BillTo);
        canvas.text(left, heading_y, "Bill To", BOLD, blocks.heading_size, Color::BLACK);

        let mut y = heading_y - blocks.bill_to_advance;
        let mut bottom = heading_y;
        let lines = [
            client.display_name(),
            client.address.as_str(),
            client.email.as_str(),
            client.phone.as_str(),
        ];
        for text in lines.iter().filter(|t| !t.trim().is_empty()) {
            for line in canvas.wrap(text, REGULAR, blocks.detail_size, blocks.meta_width) {
                canvas.text(left, y, &line, REGULAR, blocks.detail_size, Color::BLACK);
                bottom = y;
                y -= blocks.line_height;
            }
        }
        bottom
    }

    /// Top rule and the six captions. `rule_y` is the rule's height on the page.
    pub fn column_header(&self, canvas: &mut PageCanvas, rule_y: f64) {
        let table = &self.profile.table;
        let c = &self.columns;

        canvas.set_section(Section::ColumnHeader);
        canvas.line(
            c.service_left,
            rule_y,
            c.content_right,
            rule_y,
            table.rule_color,
            RULE_WIDTH,
        );

        let y = rule_y - table.caption_drop;
        let size = table.body_size;
        let color = table.caption_color;
        canvas.text(c.service_left, y, CAPTIONS[0], BOLD, size, color);
        canvas.text(c.desc_left, y, CAPTIONS[1], BOLD, size, color);

        let numeric = [
            (CAPTIONS[2], c.qty_right, c.qty_width),
            (CAPTIONS[3], c.unit_right, c.unit_width),
            (CAPTIONS[4], c.tax_right, c.tax_width),
            (CAPTIONS[5], c.total_right, c.total_width),
        ];
        for (caption, right, width) in numeric {
            if table.fit_captions {
                canvas.text_fit(right, y, caption, BOLD, width, size, table.fit_floor, color);
            } else {
                canvas.text_right(right, y, caption, BOLD, size, color);
            }
        }
    }

    /// Top edge of the totals block.
    pub fn totals_top(&self) -> f64 {
        self.profile.totals.box_bottom + self.profile.totals.box_height
    }

    /// Label and wrapped notes between `label_y` and the totals block.
    /// Lines that would run into the totals are dropped.
    pub fn notes(&self, canvas: &mut PageCanvas, notes: &str, label_y: f64) {
        let spec = &self.profile.notes;
        if notes.trim().is_empty() {
            return;
        }

        let floor = self.totals_top() + spec.gap_below;
        let room = ((label_y - floor) / spec.line_height).floor().max(0.0) as usize;
        if room == 0 {
            log::debug!("No room for notes above the totals, dropping them");
            return;
        }

        let width = self.columns.content_right - self.columns.service_left;
        let lines = canvas.wrap(notes.trim_end(), REGULAR, spec.size, width);

        canvas.set_section(Section::Notes);
        let left = self.columns.service_left;
        canvas.text(left, label_y, "Notes", BOLD, spec.label_size, Color::BLACK);

        let mut y = label_y;
        for line in lines.iter().take(room) {
            y -= spec.line_height;
            canvas.text(left, y, line, REGULAR, spec.size, Color::BLACK);
        }
        if lines.len() > room {
            log::debug!(
                "Notes truncated to {} of {} line(s) above the totals",
                room,
                lines.len()
            );
        }
    }

    /// Subtotal, Tax and Grand Total, boxed or inline.
    pub fn totals(&self, canvas: &mut PageCanvas, totals: &Totals) {
        let spec = &self.profile.totals;
        let size = self.profile.table.body_size;
        let box_x = self.columns.content_right - spec.box_width;
        let box_top = self.totals_top();

        canvas.set_section(Section::Totals);
        if spec.boxed {
            canvas.rect(
                box_x,
                spec.box_bottom,
                spec.box_width,
                spec.box_height,
                None,
                Some(spec.stroke_color),
                RULE_WIDTH,
            );
        } else {
            canvas.line(
                box_x,
                box_top,
                self.columns.content_right,
                box_top,
                spec.stroke_color,
                RULE_WIDTH,
            );
        }

        let label_x = box_x + spec.inset;
        let value_right = box_x + spec.box_width - spec.inset;
        let subtotal_y = box_top - spec.line_height;
        let rows = [
            ("Subtotal:", totals.subtotal, subtotal_y, REGULAR),
            ("Tax:", totals.tax, subtotal_y - spec.line_height, REGULAR),
            (
                "Grand Total:",
                totals.grand_total,
                spec.box_bottom + spec.grand_total_rise,
                BOLD,
            ),
        ];
        for (label, value, y, font) in rows {
            canvas.text(label_x, y, label, font, size, Color::BLACK);
            canvas.text_right(value_right, y, &format_money(value), font, size, Color::BLACK);
        }
    }

    /// Large rotated caption centred on the page.
    pub fn watermark(&self, canvas: &mut PageCanvas, caption: &str) {
        let spec = &self.profile.watermark;
        let width = canvas.measure(caption, BOLD, spec.size);
        let cap = spec.size * CAP_HEIGHT;
        let (sin, cos) = spec.angle_degrees.to_radians().sin_cos();

        // Rotate the text's own centre, then shift it onto the page centre.
        let (cx, cy) = (width / 2.0, cap / 2.0);
        let x = canvas.width() / 2.0 - (cx * cos - cy * sin);
        let y = canvas.height() / 2.0 - (cx * sin + cy * cos);

        canvas.set_section(Section::Watermark);
        canvas.rotated_text(
            x,
            y,
            caption,
            BOLD,
            spec.size,
            spec.color,
            spec.opacity,
            spec.angle_degrees,
        );
    }
}

/// `"  (Net 30)"` after the due date, or nothing.
fn terms_suffix(terms: &str) -> String {
    let terms = terms.trim();
    if terms.is_empty() {
        String::new()
    } else {
        format!("  ({})", terms)
    }
}
