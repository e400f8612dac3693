//! # Template Profiles
//!
//! A template is nothing but numbers. Modern, Compact and Minimal all run the
//! same column, pagination and section code; they differ in margins, column
//! widths, font sizes and box heights, plus a couple of presentation switches
//! (boxed vs inline totals, fitted column captions).
//!
//! All lengths are PDF points. Constants written as `mm(..)` were laid out on
//! paper first and are kept in millimetres for readability.

use crate::style::Color;

/// Points per millimetre.
pub const MM: f64 = 72.0 / 25.4;

fn mm(v: f64) -> f64 {
    v * MM
}

/// The shipped templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateName {
    #[default]
    Modern,
    Compact,
    Minimal,
}

impl TemplateName {
    /// Case-insensitive lookup. `None` for anything unrecognised.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" => Some(Self::Modern),
            "compact" => Some(Self::Compact),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Compact => "Compact",
            Self::Minimal => "Minimal",
        }
    }
}

/// Widths and spacing of the fixed table columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub total_width: f64,
    pub tax_width: f64,
    pub unit_width: f64,
    pub qty_width: f64,
    /// Nominal space between neighbouring numeric columns.
    pub gap: f64,
    /// Hard lower bound on the space between numeric columns.
    pub min_gap: f64,
    /// Per-column nudge added to `gap`, applied to the Tax, Unit and Qty
    /// steps. Negative tightens. Never takes the gap below `min_gap`.
    pub tax_offset: f64,
    pub unit_offset: f64,
    pub qty_offset: f64,
    pub service_width: f64,
    /// Smallest description wrap width, whatever the page.
    pub desc_min_width: f64,
}

/// Title bar across the top of the first page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderSpec {
    pub bar_height: f64,
    pub bar_color: Color,
    pub text_color: Color,
    pub brand_size: f64,
    pub title_size: f64,
    /// Distance from the page top to the title baseline.
    pub baseline_drop: f64,
}

/// Company, meta and Bill To blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSpec {
    /// Distance from the page top to the blocks' reference line.
    pub top: f64,
    pub logo_box: f64,
    pub logo_gap: f64,
    pub heading_size: f64,
    /// Company details, meta lines and client lines.
    pub detail_size: f64,
    /// The company name sits this far above the reference line.
    pub name_rise: f64,
    /// First company detail line sits this far below the reference line.
    pub detail_drop: f64,
    pub line_height: f64,
    pub meta_width: f64,
    /// Advance after the "<Title> Details" heading.
    pub heading_advance: f64,
    /// Extra space between the meta lines and the Bill To heading.
    pub section_gap: f64,
    /// Advance after the "Bill To" heading.
    pub bill_to_advance: f64,
    /// Space between the lowest block line and the table's top rule.
    pub table_gap: f64,
}

/// Item table typography and rhythm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSpec {
    pub body_size: f64,
    pub line_height: f64,
    pub row_gap: f64,
    /// Floor for auto-shrinking numeric cells.
    pub fit_floor: f64,
    /// Shrink numeric captions to their column width too.
    pub fit_captions: bool,
    /// Caption baseline below the header rule.
    pub caption_drop: f64,
    /// First row baseline below the header rule.
    pub row_start_drop: f64,
    pub rule_color: Color,
    pub caption_color: Color,
}

/// Totals block and the footer zone reserved for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalsSpec {
    pub boxed: bool,
    pub box_width: f64,
    pub box_height: f64,
    /// Distance from the page bottom to the bottom of the box.
    pub box_bottom: f64,
    pub inset: f64,
    pub line_height: f64,
    /// Grand total baseline above the box bottom.
    pub grand_total_rise: f64,
    pub stroke_color: Color,
    /// Bottom band below the box counted into the footer reserve.
    pub footer_margin: f64,
    /// Clearance between the last row and the reserve zone.
    pub safety_gap: f64,
}

/// Free-text notes above the totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotesSpec {
    pub label_size: f64,
    pub size: f64,
    pub line_height: f64,
    /// Space kept between the last row and the label.
    pub gap_above: f64,
    /// Space kept between the last notes line and the totals.
    pub gap_below: f64,
}

/// Diagonal status caption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkSpec {
    pub size: f64,
    pub angle_degrees: f64,
    pub color: Color,
    pub opacity: f64,
}

/// Complete constant bundle for one template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateProfile {
    pub name: TemplateName,
    /// Left, top and bottom page margin.
    pub margin: f64,
    /// Extra inset on the right, on top of `margin`.
    pub right_gutter: f64,
    pub columns: ColumnSpec,
    pub header: HeaderSpec,
    pub blocks: BlockSpec,
    pub table: TableSpec,
    pub totals: TotalsSpec,
    pub notes: NotesSpec,
    pub watermark: WatermarkSpec,
}

impl TemplateProfile {
    /// Lowest baseline a row may reach: everything below belongs to the footer.
    pub fn footer_reserve_y(&self) -> f64 {
        self.totals.footer_margin + self.totals.box_height + self.totals.safety_gap
    }

    pub fn modern() -> Self {
        Self {
            name: TemplateName::Modern,
            margin: mm(18.0),
            right_gutter: mm(12.0),
            columns: ColumnSpec {
                total_width: mm(24.0),
                tax_width: mm(12.0),
                unit_width: mm(22.0),
                qty_width: mm(12.0),
                gap: mm(4.0),
                min_gap: mm(3.0),
                tax_offset: 0.0,
                unit_offset: 0.0,
                qty_offset: 0.0,
                service_width: mm(34.0),
                desc_min_width: 20.0,
            },
            header: HeaderSpec {
                bar_height: mm(30.0),
                bar_color: Color::hex("#1F2937"),
                text_color: Color::WHITE,
                brand_size: 16.0,
                title_size: 14.0,
                baseline_drop: mm(20.0),
            },
            blocks: BlockSpec {
                top: mm(40.0),
                logo_box: mm(25.0),
                logo_gap: mm(6.0),
                heading_size: 12.0,
                detail_size: 10.0,
                name_rise: 8.0,
                detail_drop: 8.0,
                line_height: 12.0,
                meta_width: mm(74.0),
                heading_advance: 16.0,
                section_gap: 10.0,
                bill_to_advance: 14.0,
                table_gap: mm(10.0),
            },
            table: TableSpec {
                body_size: 10.0,
                line_height: 14.0,
                row_gap: 2.0,
                fit_floor: 8.0,
                fit_captions: false,
                caption_drop: 12.0,
                row_start_drop: 26.0,
                rule_color: Color::hex("#E5E7EB"),
                caption_color: Color::hex("#374151"),
            },
            totals: TotalsSpec {
                boxed: true,
                box_width: mm(62.0),
                box_height: mm(30.0),
                box_bottom: mm(24.0),
                inset: mm(6.0),
                line_height: 12.0,
                grand_total_rise: 10.0,
                stroke_color: Color::hex("#9CA3AF"),
                footer_margin: mm(30.0),
                safety_gap: mm(8.0),
            },
            notes: NotesSpec {
                label_size: 10.0,
                size: 9.0,
                line_height: 12.0,
                gap_above: 14.0,
                gap_below: 8.0,
            },
            watermark: WatermarkSpec {
                size: 72.0,
                angle_degrees: 30.0,
                color: Color::hex("#9CA3AF"),
                opacity: 0.15,
            },
        }
    }

    pub fn compact() -> Self {
        Self {
            name: TemplateName::Compact,
            margin: mm(12.0),
            right_gutter: mm(8.0),
            columns: ColumnSpec {
                total_width: mm(22.0),
                tax_width: mm(10.0),
                unit_width: mm(20.0),
                qty_width: mm(10.0),
                gap: mm(3.0),
                min_gap: mm(2.0),
                tax_offset: -1.5,
                unit_offset: -1.5,
                qty_offset: 0.0,
                service_width: mm(30.0),
                desc_min_width: 20.0,
            },
            header: HeaderSpec {
                bar_height: mm(18.0),
                bar_color: Color::hex("#111827"),
                text_color: Color::WHITE,
                brand_size: 13.0,
                title_size: 12.0,
                baseline_drop: mm(11.0),
            },
            blocks: BlockSpec {
                top: mm(26.0),
                logo_box: mm(18.0),
                logo_gap: mm(4.0),
                heading_size: 11.0,
                detail_size: 9.0,
                name_rise: 7.0,
                detail_drop: 6.0,
                line_height: 11.0,
                meta_width: mm(64.0),
                heading_advance: 13.0,
                section_gap: 7.0,
                bill_to_advance: 12.0,
                table_gap: mm(7.0),
            },
            table: TableSpec {
                body_size: 9.0,
                line_height: 12.0,
                row_gap: 1.0,
                fit_floor: 7.0,
                fit_captions: true,
                caption_drop: 11.0,
                row_start_drop: 23.0,
                rule_color: Color::hex("#D1D5DB"),
                caption_color: Color::hex("#1F2937"),
            },
            totals: TotalsSpec {
                boxed: true,
                box_width: mm(56.0),
                box_height: mm(24.0),
                box_bottom: mm(16.0),
                inset: mm(5.0),
                line_height: 11.0,
                grand_total_rise: 8.0,
                stroke_color: Color::hex("#6B7280"),
                footer_margin: mm(22.0),
                safety_gap: mm(5.0),
            },
            notes: NotesSpec {
                label_size: 9.0,
                size: 8.0,
                line_height: 10.0,
                gap_above: 10.0,
                gap_below: 6.0,
            },
            watermark: WatermarkSpec {
                size: 72.0,
                angle_degrees: 30.0,
                color: Color::hex("#9CA3AF"),
                opacity: 0.15,
            },
        }
    }

    pub fn minimal() -> Self {
        Self {
            name: TemplateName::Minimal,
            margin: mm(20.0),
            right_gutter: mm(10.0),
            columns: ColumnSpec {
                total_width: mm(24.0),
                tax_width: mm(12.0),
                unit_width: mm(22.0),
                qty_width: mm(12.0),
                gap: mm(5.0),
                min_gap: mm(3.0),
                tax_offset: 0.0,
                unit_offset: 2.0,
                qty_offset: -2.0,
                service_width: mm(36.0),
                desc_min_width: 20.0,
            },
            header: HeaderSpec {
                bar_height: mm(14.0),
                bar_color: Color::hex("#F3F4F6"),
                text_color: Color::hex("#111827"),
                brand_size: 14.0,
                title_size: 13.0,
                baseline_drop: mm(9.0),
            },
            blocks: BlockSpec {
                top: mm(28.0),
                logo_box: mm(22.0),
                logo_gap: mm(6.0),
                heading_size: 11.0,
                detail_size: 10.0,
                name_rise: 8.0,
                detail_drop: 8.0,
                line_height: 12.0,
                meta_width: mm(70.0),
                heading_advance: 15.0,
                section_gap: 10.0,
                bill_to_advance: 14.0,
                table_gap: mm(9.0),
            },
            table: TableSpec {
                body_size: 10.0,
                line_height: 14.0,
                row_gap: 3.0,
                fit_floor: 8.0,
                fit_captions: false,
                caption_drop: 12.0,
                row_start_drop: 26.0,
                rule_color: Color::hex("#E5E7EB"),
                caption_color: Color::hex("#6B7280"),
            },
            totals: TotalsSpec {
                boxed: false,
                box_width: mm(62.0),
                box_height: mm(26.0),
                box_bottom: mm(22.0),
                inset: 0.0,
                line_height: 13.0,
                grand_total_rise: 6.0,
                stroke_color: Color::hex("#D1D5DB"),
                footer_margin: mm(26.0),
                safety_gap: mm(8.0),
            },
            notes: NotesSpec {
                label_size: 10.0,
                size: 9.0,
                line_height: 12.0,
                gap_above: 16.0,
                gap_below: 10.0,
            },
            watermark: WatermarkSpec {
                size: 72.0,
                angle_degrees: 30.0,
                color: Color::hex("#D1D5DB"),
                opacity: 0.2,
            },
        }
    }

    /// Profile for a known template.
    pub fn for_name(name: TemplateName) -> Self {
        match name {
            TemplateName::Modern => Self::modern(),
            TemplateName::Compact => Self::compact(),
            TemplateName::Minimal => Self::minimal(),
        }
    }
}

impl Default for TemplateProfile {
    fn default() -> Self {
        Self::modern()
    }
}

/// Pick the profile for a configured template name. Unknown or missing
/// names fall back to Modern.
pub fn select_profile(name: Option<&str>) -> TemplateProfile {
    let requested = name.map(str::trim).filter(|n| !n.is_empty());
    let template = match requested {
        Some(raw) => TemplateName::parse(raw).unwrap_or_else(|| {
            log::warn!("Unknown template '{}', using Modern", raw);
            TemplateName::Modern
        }),
        None => TemplateName::Modern,
    };
    log::debug!("Using template profile {}", template.as_str());
    TemplateProfile::for_name(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_case_insensitive() {
        assert_eq!(select_profile(Some("compact")).name, TemplateName::Compact);
        assert_eq!(select_profile(Some("MINIMAL")).name, TemplateName::Minimal);
        assert_eq!(select_profile(Some(" Modern ")).name, TemplateName::Modern);
    }

    #[test]
    fn unknown_or_missing_defaults_to_modern() {
        assert_eq!(select_profile(None).name, TemplateName::Modern);
        assert_eq!(select_profile(Some("")).name, TemplateName::Modern);
        assert_eq!(select_profile(Some("Fancy")).name, TemplateName::Modern);
    }

    #[test]
    fn footer_reserve_adds_up() {
        let p = TemplateProfile::modern();
        assert!((p.footer_reserve_y() - mm(68.0)).abs() < 1e-9);
    }

    #[test]
    fn totals_fit_inside_footer_reserve() {
        for p in [
            TemplateProfile::modern(),
            TemplateProfile::compact(),
            TemplateProfile::minimal(),
        ] {
            let box_top = p.totals.box_bottom + p.totals.box_height;
            assert!(box_top < p.footer_reserve_y(), "{:?}", p.name);
            assert!(p.totals.box_bottom >= 0.0);
        }
    }
}
