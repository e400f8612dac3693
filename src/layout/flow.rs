//! Item flow across pages.
//!
//! The paginator owns the canvas for one render and walks it through
//! `HeaderDrawn → Itemizing → TotalsDrawn → Closed`. A page break while
//! itemizing stays in `Itemizing`; it only swaps the page underneath.

use crate::error::{RenderError, Result};
use crate::font::StandardFont;
use crate::format::{format_money, format_percent, format_quantity};
use crate::image_loader::LoadedImage;
use crate::model::{Company, Document, LineItem};
use crate::style::Color;
use crate::template::TemplateProfile;

use super::columns::compute_columns;
use super::page_break::{decide_break, BreakDecision};
use super::sections::SectionRenderer;
use super::{LayoutPage, PageCanvas, Section};

/// Where the render pass is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Nothing drawn yet.
    Blank,
    /// Fixed blocks and the first column header are on page one.
    HeaderDrawn,
    Itemizing,
    TotalsDrawn,
    Closed,
}

pub struct Paginator<'a> {
    canvas: PageCanvas<'a>,
    profile: &'a TemplateProfile,
    sections: SectionRenderer<'a>,
    watermark: Option<&'static str>,
    state: FlowState,
    /// Baseline of the next row's first line.
    cursor_y: f64,
    rows_on_page: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(
        canvas: PageCanvas<'a>,
        profile: &'a TemplateProfile,
        watermark: Option<&'static str>,
    ) -> Self {
        let columns = compute_columns(
            canvas.width(),
            profile.margin,
            profile.right_gutter,
            &profile.columns,
        );
        Self {
            cursor_y: canvas.height(),
            canvas,
            profile,
            sections: SectionRenderer::new(profile, columns),
            watermark,
            state: FlowState::Blank,
            rows_on_page: 0,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    fn expect_state(&self, allowed: &[FlowState], action: &str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(RenderError::Layout(format!(
                "cannot {} while {:?}",
                action, self.state
            )))
        }
    }

    /// Draw page one's fixed blocks and the first column header.
    pub fn begin(
        &mut self,
        doc: &Document,
        company: &Company,
        logo: Option<&LoadedImage>,
    ) -> Result<()> {
        self.expect_state(&[FlowState::Blank], "draw the header")?;

        self.draw_watermark();
        let title = doc.title();
        self.sections.header_bar(&mut self.canvas, &company.name, title);
        let company_bottom = self.sections.company_block(&mut self.canvas, company, logo);
        let meta_bottom = self.sections.meta_block(&mut self.canvas, doc);

        let rule_y = company_bottom.min(meta_bottom) - self.profile.blocks.table_gap;
        self.sections.column_header(&mut self.canvas, rule_y);
        self.cursor_y = rule_y - self.profile.table.row_start_drop;

        self.state = FlowState::HeaderDrawn;
        Ok(())
    }

    /// Place one line item, breaking to a new page first if it would cross
    /// into the footer reserve.
    pub fn place_item(&mut self, index: usize, item: &LineItem) -> Result<()> {
        self.expect_state(&[FlowState::HeaderDrawn, FlowState::Itemizing], "place items")?;
        self.state = FlowState::Itemizing;

        let profile = self.profile;
        let table = &profile.table;
        let columns = *self.sections.columns();
        let lines = self.canvas.wrap(
            &item.description,
            StandardFont::Helvetica,
            table.body_size,
            columns.desc_max_width,
        );
        let row_height = table.line_height.max(lines.len() as f64 * table.line_height);
        if !row_height.is_finite() {
            return Err(RenderError::Layout(format!(
                "item {} has no finite row height",
                index + 1
            )));
        }

        let fresh = self.rows_on_page == 0 && self.canvas.page_index() > 0;
        let floor_y = profile.footer_reserve_y();
        if decide_break(self.cursor_y, row_height, floor_y, fresh) == BreakDecision::MoveToNextPage {
            self.break_page();
            log::debug!(
                "Item {} ({:.1}pt tall) starts page {}",
                index + 1,
                row_height,
                self.canvas.page_index() + 1
            );
        }

        self.draw_row(index, item, &lines);
        self.cursor_y -= row_height + table.row_gap;
        self.rows_on_page += 1;
        Ok(())
    }

    fn break_page(&mut self) {
        self.canvas.show_page();
        self.rows_on_page = 0;
        self.draw_watermark();
        let rule_y = self.canvas.height() - self.profile.margin;
        self.sections.column_header(&mut self.canvas, rule_y);
        self.cursor_y = rule_y - self.profile.table.row_start_drop;
    }

    fn draw_watermark(&mut self) {
        if let Some(caption) = self.watermark {
            self.sections.watermark(&mut self.canvas, caption);
        }
    }

    fn draw_row(&mut self, index: usize, item: &LineItem, lines: &[String]) {
        let table = self.profile.table;
        let c = *self.sections.columns();
        let y = self.cursor_y;
        let font = StandardFont::Helvetica;
        let color = Color::BLACK;

        self.canvas.set_section(Section::Row(index));
        self.canvas.text(c.service_left, y, &item.service, font, table.body_size, color);
        for (i, line) in lines.iter().enumerate() {
            let line_y = y - i as f64 * table.line_height;
            self.canvas.text(c.desc_left, line_y, line, font, table.body_size, color);
        }

        let cells = [
            (format_quantity(item.qty), c.qty_right, c.qty_width),
            (format_money(item.unit_price), c.unit_right, c.unit_width),
            (format_percent(item.tax_pct), c.tax_right, c.tax_width),
            (format_money(item.line_total()), c.total_right, c.total_width),
        ];
        for (text, right, width) in &cells {
            self.canvas.text_fit(
                *right,
                y,
                text,
                font,
                *width,
                table.body_size,
                table.fit_floor,
                color,
            );
        }
    }

    /// Notes and totals on the current page.
    pub fn draw_totals(&mut self, doc: &Document) -> Result<()> {
        self.expect_state(&[FlowState::HeaderDrawn, FlowState::Itemizing], "draw totals")?;

        let label_y = self.cursor_y + self.profile.table.row_gap - self.profile.notes.gap_above;
        self.sections.notes(&mut self.canvas, &doc.notes, label_y);
        self.sections.totals(&mut self.canvas, &doc.totals);

        self.state = FlowState::TotalsDrawn;
        Ok(())
    }

    /// Finish the last page and return all pages.
    pub fn close(mut self) -> Vec<LayoutPage> {
        self.state = FlowState::Closed;
        self.canvas.finish()
    }
}
