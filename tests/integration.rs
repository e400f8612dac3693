//! Integration tests for the invoice rendering pipeline.
//!
//! These exercise the public API from document to pages to PDF bytes:
//! - the laid-out pages (what is drawn, where, on which page)
//! - page breaks and continuation headers
//! - watermark gating and template fallback
//! - PDF output structure and write failures

use invoice_render::font::FontContext;
use invoice_render::layout::{
    compute_columns, layout_document, DrawCommand, LayoutPage, PageCanvas, Paginator, Section,
};
use invoice_render::model::*;
use invoice_render::template::{TemplateName, TemplateProfile};
use invoice_render::{render, render_json, render_to_path, RenderError};

// ─── Helpers ────────────────────────────────────────────────────

fn item(service: &str, description: &str, qty: f64, unit_price: f64, tax_pct: f64) -> LineItem {
    LineItem {
        service: service.to_string(),
        description: description.to_string(),
        qty,
        unit_price,
        tax_pct,
    }
}

fn filler(n: usize) -> Vec<LineItem> {
    (0..n)
        .map(|i| item(&format!("Item {}", i + 1), "Hourly work", 1.0, 10.0, 0.0))
        .collect()
}

fn consulting_invoice() -> Document {
    Document {
        kind: DocumentKind::Invoice,
        items: vec![item(
            "Consulting",
            "Initial setup\nand configuration",
            2.0,
            150.0,
            8.0,
        )],
        totals: Totals {
            subtotal: 300.0,
            tax: 24.0,
            grand_total: 324.0,
        },
        ..Default::default()
    }
}

fn with_template(name: &str) -> Settings {
    let mut settings = Settings::default();
    settings.pdf.template = Some(name.to_string());
    settings
}

fn with_status(status: &str) -> Document {
    let mut doc = consulting_invoice();
    doc.meta.status = Status::parse(status);
    doc
}

/// Index of the page holding item `index`.
fn page_of_row(pages: &[LayoutPage], index: usize) -> usize {
    pages
        .iter()
        .position(|p| p.section(Section::Row(index)).next().is_some())
        .expect("row was never drawn")
}

fn row_texts(page: &LayoutPage, index: usize) -> Vec<&str> {
    page.section(Section::Row(index))
        .filter_map(|e| e.text())
        .collect()
}

// ─── End to end ─────────────────────────────────────────────────

#[test]
fn test_consulting_invoice_end_to_end() {
    let pages = layout_document(&consulting_invoice(), &Settings::default()).unwrap();
    assert_eq!(pages.len(), 1);

    let page = &pages[0];
    assert_eq!(
        row_texts(page, 0),
        vec!["Consulting", "Initial setup", "and configuration", "2", "150.00", "8", "324.00"]
    );

    // The two description lines stack by one line height.
    let first = page.find_text("Initial setup").unwrap();
    let second = page.find_text("and configuration").unwrap();
    assert_eq!(first.x, second.x);
    assert!((first.y - second.y - 14.0).abs() < 1e-9);

    let totals: Vec<&str> = page
        .section(Section::Totals)
        .filter_map(|e| e.text())
        .collect();
    assert_eq!(
        totals,
        vec!["Subtotal:", "300.00", "Tax:", "24.00", "Grand Total:", "324.00"]
    );
    assert!(page.watermark().is_none());
}

#[test]
fn test_line_total_is_computed_not_copied() {
    let mut doc = consulting_invoice();
    doc.items = vec![item("Parts", "Widgets", 3.0, 10.0, 10.0)];
    let pages = layout_document(&doc, &Settings::default()).unwrap();
    let row = row_texts(&pages[0], 0);
    assert_eq!(row[row.len() - 1], "33.00");
    assert!(row.contains(&"3"));
    assert!(row.contains(&"10"));
}

#[test]
fn test_header_shows_company_and_title() {
    let mut settings = Settings::default();
    settings.company.name = "Acme Consulting".to_string();
    settings.company.website = "acme.example".to_string();
    let mut doc = consulting_invoice();
    doc.doc_type = Some(DocumentKind::Quote);
    doc.client.name = "Jane Doe".to_string();
    doc.client.business = "Doe Industries".to_string();

    let pages = layout_document(&doc, &settings).unwrap();
    let page = &pages[0];
    let header: Vec<&str> = page
        .section(Section::HeaderBar)
        .filter_map(|e| e.text())
        .collect();
    assert_eq!(header, vec!["Acme Consulting", "Quote"]);
    assert!(page.find_text("Quote Details").is_some());
    assert!(page.find_text("acme.example").is_some());
    assert!(page.find_text("Doe Industries").is_some());
    assert!(page.find_text("Jane Doe").is_none());
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn test_pagination_boundary() {
    let profile = TemplateProfile::modern();
    let mut doc = consulting_invoice();
    doc.items = filler(80);
    let pages = layout_document(&doc, &Settings::default()).unwrap();
    assert!(pages.len() >= 2);

    // k = first item on page two; everything before it stays on page one.
    let k = (0..80).find(|&i| page_of_row(&pages, i) == 1).unwrap();
    assert!(k > 0);
    for i in 0..k {
        assert_eq!(page_of_row(&pages, i), 0, "item {} moved early", i);
    }

    // Item k-1 fit; item k would have crossed the footer reserve.
    let floor = profile.footer_reserve_y();
    let last = pages[0].section(Section::Row(k - 1)).next().unwrap();
    assert!(last.y - 14.0 >= floor);
    assert!(last.y - 16.0 - 14.0 < floor);

    // Page two repeats the column header before item k.
    let elements = &pages[1].elements;
    let header_pos = elements
        .iter()
        .position(|e| e.section == Section::ColumnHeader)
        .unwrap();
    let row_pos = elements
        .iter()
        .position(|e| e.section == Section::Row(k))
        .unwrap();
    assert!(header_pos < row_pos);
    let captions: Vec<&str> = pages[1]
        .section(Section::ColumnHeader)
        .filter_map(|e| e.text())
        .collect();
    assert_eq!(
        captions,
        vec!["Service / Item", "Description", "Qty", "Unit", "Tax %", "Total"]
    );
}

#[test]
fn test_long_description_breaks_before_item() {
    let profile = TemplateProfile::modern();
    let floor = profile.footer_reserve_y();

    // Fill page one until only room for three description lines is left.
    let fonts = FontContext::new();
    let (w, h) = PageSize::A4.dimensions();
    let mut paginator = Paginator::new(PageCanvas::new(&fonts, w, h), &profile, None);
    paginator
        .begin(&Document::default(), &Company::default(), None)
        .unwrap();
    let mut count = 0;
    while paginator.cursor_y() - floor >= 58.0 {
        paginator
            .place_item(count, &filler(count + 1)[count])
            .unwrap();
        count += 1;
    }
    let room = paginator.cursor_y() - floor;
    assert!(room >= 3.0 * 14.0 && room < 6.0 * 14.0, "room {}", room);

    let mut doc = Document {
        items: filler(count),
        ..Default::default()
    };
    doc.items.push(item("Audit", "one\ntwo\nthree\nfour\nfive\nsix", 1.0, 500.0, 0.0));
    let pages = layout_document(&doc, &Settings::default()).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(page_of_row(&pages, count - 1), 0);
    assert_eq!(page_of_row(&pages, count), 1);
    assert!(pages[1].find_text("Service / Item").is_some());
    assert_eq!(row_texts(&pages[1], count).len(), 1 + 6 + 4);
}

#[test]
fn test_oversized_row_is_placed_whole() {
    let description = (0..120).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
    let doc = Document {
        items: vec![item("Huge", &description, 1.0, 1.0, 0.0), item("After", "x", 1.0, 1.0, 0.0)],
        ..Default::default()
    };
    let pages = layout_document(&doc, &Settings::default()).unwrap();
    assert_eq!(page_of_row(&pages, 0), 1);
    assert_eq!(row_texts(&pages[1], 0).len(), 1 + 120 + 4);
    assert_eq!(page_of_row(&pages, 1), 2);
}

#[test]
fn test_totals_land_on_last_page() {
    let mut doc = consulting_invoice();
    doc.items = filler(70);
    let pages = layout_document(&doc, &Settings::default()).unwrap();
    let last = pages.len() - 1;
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.section(Section::Totals).next().is_some(), i == last);
    }
}

// ─── Watermark ──────────────────────────────────────────────────

#[test]
fn test_watermark_gating() {
    for status in ["paid", "PAID", "Paid", " paid "] {
        let pages = layout_document(&with_status(status), &Settings::default()).unwrap();
        assert_eq!(pages[0].watermark(), Some("PAID"), "status {:?}", status);
    }
    assert_eq!(
        layout_document(&with_status("overdue"), &Settings::default()).unwrap()[0].watermark(),
        Some("OVERDUE")
    );
    for status in ["", "Draft", "paid in full"] {
        let pages = layout_document(&with_status(status), &Settings::default()).unwrap();
        assert!(pages[0].watermark().is_none(), "status {:?}", status);
    }
}

#[test]
fn test_watermark_on_every_page_behind_content() {
    let mut doc = with_status("unpaid");
    doc.items = filler(90);
    let pages = layout_document(&doc, &Settings::default()).unwrap();
    assert!(pages.len() >= 3);
    for page in &pages {
        assert!(matches!(page.elements[0].draw, DrawCommand::Watermark { .. }));
        assert_eq!(page.watermark(), Some("UNPAID"));
    }
}

#[test]
fn test_free_text_status_is_plain_meta() {
    let pages = layout_document(&with_status("Sent to client"), &Settings::default()).unwrap();
    assert!(pages[0].find_text("Status: Sent to client").is_some());
    assert!(pages[0].watermark().is_none());
}

// ─── Templates ──────────────────────────────────────────────────

#[test]
fn test_unknown_template_falls_back_to_modern() {
    let doc = consulting_invoice();
    let modern = layout_document(&doc, &with_template("Modern")).unwrap();
    for name in ["Fancy", "", "  "] {
        let fallback = layout_document(&doc, &with_template(name)).unwrap();
        let a = modern[0].find_text("Total").unwrap();
        let b = fallback[0].find_text("Total").unwrap();
        assert_eq!((a.x, a.y), (b.x, b.y), "template {:?}", name);
    }
    let lower = layout_document(&doc, &with_template("compact")).unwrap();
    let compact_total = lower[0].find_text("Total").unwrap();
    assert_ne!(compact_total.x, modern[0].find_text("Total").unwrap().x);
}

#[test]
fn test_every_profile_keeps_numeric_cells_apart() {
    let mut doc = consulting_invoice();
    doc.items = vec![item("Parts", "Widgets", 12.5, 1999.99, 15.0)];
    for name in [TemplateName::Modern, TemplateName::Compact, TemplateName::Minimal] {
        let profile = TemplateProfile::for_name(name);
        let pages = layout_document(&doc, &with_template(name.as_str())).unwrap();
        let cells: Vec<_> = pages[0]
            .section(Section::Row(0))
            .filter(|e| e.text().is_some())
            .skip(2)
            .collect();
        assert_eq!(cells.len(), 4, "{:?}", name);
        for pair in cells.windows(2) {
            let gap = pair[1].x - pair[0].right();
            assert!(
                gap >= profile.columns.min_gap - 1e-9,
                "{:?}: {:?} and {:?} only {:.2}pt apart",
                name,
                pair[0].text(),
                pair[1].text(),
                gap
            );
        }

        let (w, _) = PageSize::A4.dimensions();
        let c = compute_columns(w, profile.margin, profile.right_gutter, &profile.columns);
        assert!(c.total_right > c.tax_right && c.tax_right > c.unit_right && c.unit_right > c.qty_right);
    }
}

#[test]
fn test_oversized_amount_shrinks_to_floor() {
    let mut doc = consulting_invoice();
    doc.items = vec![item("Parts", "Widgets", 1.0, 123_456_789_012.0, 0.0)];
    let pages = layout_document(&doc, &Settings::default()).unwrap();
    let cell = pages[0].find_text("123456789012.00").unwrap();
    assert_eq!(cell.font_size(), Some(TemplateProfile::modern().table.fit_floor));
}

// ─── Notes ──────────────────────────────────────────────────────

#[test]
fn test_notes_truncated_above_totals() {
    let mut doc = consulting_invoice();
    doc.notes = (0..200).map(|i| format!("Note line {}", i)).collect::<Vec<_>>().join("\n");
    let profile = TemplateProfile::modern();
    let pages = layout_document(&doc, &Settings::default()).unwrap();
    assert_eq!(pages.len(), 1);

    let notes: Vec<_> = pages[0].section(Section::Notes).collect();
    assert!(notes.len() > 2 && notes.len() < 201);
    assert_eq!(notes[0].text(), Some("Notes"));
    let totals_top = profile.totals.box_bottom + profile.totals.box_height;
    for el in &notes {
        assert!(el.y >= totals_top + profile.notes.gap_below);
    }
}

#[test]
fn test_short_notes_are_complete() {
    let mut doc = consulting_invoice();
    doc.notes = "Thank you!\n\nPay within 30 days.".to_string();
    let pages = layout_document(&doc, &with_template("minimal")).unwrap();
    let texts: Vec<&str> = pages[0]
        .section(Section::Notes)
        .filter_map(|e| e.text())
        .collect();
    assert_eq!(texts, vec!["Notes", "Thank you!", "Pay within 30 days."]);
}

#[test]
fn test_compact_keeps_notes() {
    let mut doc = consulting_invoice();
    doc.notes = "Payment due in 14 days".to_string();
    let pages = layout_document(&doc, &with_template("compact")).unwrap();
    let texts: Vec<&str> = pages[0]
        .section(Section::Notes)
        .filter_map(|e| e.text())
        .collect();
    assert_eq!(texts, vec!["Notes", "Payment due in 14 days"]);
}

// ─── Logo ───────────────────────────────────────────────────────

#[test]
fn test_missing_logo_renders_without_it() {
    let mut settings = Settings::default();
    settings.company.name = "Acme".to_string();
    settings.company.logo_path = Some("/definitely/missing/logo.png".to_string());
    let pages = layout_document(&consulting_invoice(), &settings).unwrap();
    assert_eq!(pages[0].section(Section::Logo).count(), 0);

    // Text starts at the margin when there is no logo.
    let name = pages[0]
        .section(Section::Company)
        .find(|e| e.text() == Some("Acme"))
        .unwrap();
    assert!((name.x - TemplateProfile::modern().margin).abs() < 1e-9);
    assert!(render(&consulting_invoice(), &settings).is_ok());
}

#[test]
fn test_data_uri_logo_is_drawn_in_box() {
    use base64::Engine;
    let img = image::RgbaImage::from_pixel(40, 20, image::Rgba([200, 30, 30, 255]));
    let mut png = Vec::new();
    image::ImageEncoder::write_image(
        image::codecs::png::PngEncoder::new(&mut png),
        img.as_raw(),
        40,
        20,
        image::ColorType::Rgba8,
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.company.name = "Acme".to_string();
    settings.company.logo_path = Some(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    ));
    let profile = TemplateProfile::modern();
    let pages = layout_document(&consulting_invoice(), &settings).unwrap();

    let logo = pages[0].section(Section::Logo).next().unwrap();
    assert!(matches!(logo.draw, DrawCommand::Image { .. }));
    assert!((logo.width - profile.blocks.logo_box).abs() < 1e-9);
    assert!((logo.width / logo.height - 2.0).abs() < 1e-9);

    let name = pages[0]
        .section(Section::Company)
        .find(|e| e.text() == Some("Acme"))
        .unwrap();
    assert!(name.x > logo.right());

    let pdf = render(&consulting_invoice(), &settings).unwrap();
    assert!(String::from_utf8_lossy(&pdf).contains("/Subtype /Image"));
}

// ─── PDF output ─────────────────────────────────────────────────

#[test]
fn test_pdf_is_structurally_valid() {
    let mut doc = with_status("paid");
    doc.items = filler(80);
    let mut settings = Settings::default();
    settings.company.name = "Acme".to_string();
    let pages = layout_document(&doc, &settings).unwrap();
    let bytes = render(&doc, &settings).unwrap();
    let pdf = String::from_utf8_lossy(&bytes);

    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(pdf.trim_end().ends_with("%%EOF"));
    assert!(pdf.contains("xref"));
    assert!(pdf.contains(&format!("/Count {}", pages.len())));
    assert!(pdf.contains("/Title (Invoice)"));
    assert!(pdf.contains("/Author (Acme)"));
    assert!(pdf.contains("/Type /ExtGState"));
}

#[test]
fn test_render_is_deterministic() {
    let doc = with_status("overdue");
    let settings = with_template("compact");
    assert_eq!(render(&doc, &settings).unwrap(), render(&doc, &settings).unwrap());
}

#[test]
fn test_render_json_round_trip_from_draft_shape() {
    let doc = r#"{
        "kind": "invoice",
        "client": {"name": "Jane", "address": "1 Road"},
        "meta": {"number": "INV-1", "status": "Paid"},
        "items": [{"service": "Consulting", "description": "Setup", "qty": 2, "unit_price": 150, "tax_pct": 8}],
        "totals": {"subtotal": 300, "tax": 24, "grand_total": 324}
    }"#;
    let settings = r#"{"company": {"name": "Acme"}, "pdf": {"template": "Minimal"}}"#;
    let bytes = render_json(doc, settings).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_unknown_kind_renders_as_quote() {
    let bytes = render_json(r#"{"kind": "receipt"}"#, "").unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(String::from_utf8_lossy(&bytes).contains("/Title (Quote)"));
}

#[test]
fn test_null_status_renders() {
    let bytes = render_json(r#"{"kind": "invoice", "meta": {"status": null}}"#, "").unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
}

#[test]
fn test_write_failure_is_fatal() {
    let path = std::env::temp_dir()
        .join("invoice-render-missing-dir")
        .join("nested")
        .join("out.pdf");
    let err = render_to_path(&consulting_invoice(), &Settings::default(), &path).unwrap_err();
    match err {
        RenderError::Write { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("expected write error, got {}", other),
    }
}

#[test]
fn test_render_to_path_returns_destination() {
    let path = std::env::temp_dir().join(format!("invoice-render-{}.pdf", std::process::id()));
    let written = render_to_path(&consulting_invoice(), &Settings::default(), &path).unwrap();
    assert_eq!(written, path);
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    let _ = std::fs::remove_file(&path);
}
