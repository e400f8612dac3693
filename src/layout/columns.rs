//! # Column Geometry
//!
//! The numeric columns are laid out right to left from the content edge:
//! Total is flush right, then Tax, Unit and Qty each step left by the
//! previous column's width plus a gap. Whatever is left between the
//! description's left edge and the Qty column becomes the wrap width.
//!
//! The gap used for each step is `max(min_gap, gap + offset)`, so no choice
//! of template offsets can pull two columns closer than `min_gap`.

use crate::template::ColumnSpec;

/// Resolved x positions for the item table, in points from the page's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    /// Everything right-aligned ends here.
    pub content_right: f64,
    pub service_left: f64,
    pub desc_left: f64,
    pub qty_right: f64,
    pub unit_right: f64,
    pub tax_right: f64,
    pub total_right: f64,
    /// Wrap width for description lines.
    pub desc_max_width: f64,
    pub qty_width: f64,
    pub unit_width: f64,
    pub tax_width: f64,
    pub total_width: f64,
}

impl Columns {
    pub fn qty_left(&self) -> f64 {
        self.qty_right - self.qty_width
    }

    pub fn unit_left(&self) -> f64 {
        self.unit_right - self.unit_width
    }

    pub fn tax_left(&self) -> f64 {
        self.tax_right - self.tax_width
    }

    pub fn total_left(&self) -> f64 {
        self.total_right - self.total_width
    }
}

fn step_gap(spec: &ColumnSpec, offset: f64) -> f64 {
    (spec.gap + offset).max(spec.min_gap)
}

/// Compute the table's column edges for a page of `page_width` points.
pub fn compute_columns(
    page_width: f64,
    margin: f64,
    right_gutter: f64,
    spec: &ColumnSpec,
) -> Columns {
    let content_right = page_width - margin - right_gutter;

    let total_right = content_right;
    let tax_right = total_right - spec.total_width - step_gap(spec, spec.tax_offset);
    let unit_right = tax_right - spec.tax_width - step_gap(spec, spec.unit_offset);
    let qty_right = unit_right - spec.unit_width - step_gap(spec, spec.qty_offset);

    let service_left = margin;
    let desc_left = service_left + spec.service_width;
    let qty_left = qty_right - spec.qty_width;
    let desc_max_width = (qty_left - spec.gap - desc_left).max(spec.desc_min_width);

    Columns {
        content_right,
        service_left,
        desc_left,
        qty_right,
        unit_right,
        tax_right,
        total_right,
        desc_max_width,
        qty_width: spec.qty_width,
        unit_width: spec.unit_width,
        tax_width: spec.tax_width,
        total_width: spec.total_width,
    }
}
