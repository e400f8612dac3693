//! # PDF Serializer
//!
//! Takes the laid-out pages and writes a valid PDF 1.7 file.
//!
//! The writer is self-contained: layout coordinates are already PDF user
//! space (origin bottom-left, y up), fonts are the two standard Helvetica
//! faces, so there is nothing to embed except the optional logo.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- Catalog
//! 2 0 obj ... endobj  <- Pages tree
//! ...                 <- fonts, images, graphics states, pages, streams
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Watermark translucency uses one ExtGState per distinct opacity, shared by
//! every page.

use std::collections::HashMap;
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::font::StandardFont;
use crate::image_loader::{ImagePixelData, JpegColorSpace, LoadedImage};
use crate::layout::{DrawCommand, LayoutElement, LayoutPage};
use crate::style::Color;

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Default)]
pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
    /// Font object IDs, referenced as /F0, /F1, ...
    font_objects: Vec<(StandardFont, usize)>,
    /// Image XObject IDs, referenced as /Im0, /Im1, ...
    image_objects: Vec<usize>,
    /// (page index, element index) -> index into `image_objects`.
    image_index_map: HashMap<(usize, usize), usize>,
    /// Graphics states keyed by opacity in thousandths, referenced as /GS0, ...
    gstate_objects: Vec<(u32, usize)>,
}

impl PdfBuilder {
    fn new() -> Self {
        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        Self {
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
            font_objects: Vec::new(),
            image_objects: Vec::new(),
            image_index_map: HashMap::new(),
            gstate_objects: Vec::new(),
        }
    }

    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }

    /// A stream object with its dictionary entries and body.
    fn push_stream(&mut self, dict: &str, body: &[u8]) -> usize {
        let mut data = Vec::with_capacity(body.len() + dict.len() + 32);
        let _ = write!(data, "<< {} /Length {} >>\nstream\n", dict, body.len());
        data.extend_from_slice(body);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }

    fn font_name(&self, font: StandardFont) -> usize {
        self.font_objects
            .iter()
            .position(|(f, _)| *f == font)
            .unwrap_or(0)
    }

    fn gstate_name(&self, opacity: f64) -> usize {
        let key = opacity_key(opacity);
        self.gstate_objects
            .iter()
            .position(|(k, _)| *k == key)
            .unwrap_or(0)
    }
}

fn opacity_key(opacity: f64) -> u32 {
    (opacity.clamp(0.0, 1.0) * 1000.0).round() as u32
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(&self, pages: &[LayoutPage], metadata: &Metadata) -> Vec<u8> {
        let mut builder = PdfBuilder::new();

        self.register_fonts(&mut builder, pages);
        self.register_images(&mut builder, pages);
        self.register_graphics_states(&mut builder, pages);

        let resources = self.build_resource_dict(&builder);
        let mut page_obj_ids = Vec::with_capacity(pages.len());

        for (page_idx, page) in pages.iter().enumerate() {
            let content = self.build_content_stream(page, page_idx, &builder);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);
            let content_obj_id = builder.push_stream("/Filter /FlateDecode", &compressed);

            let xobjects = self.build_xobject_resource_dict(page_idx, &builder);
            let page_resources = if xobjects.is_empty() {
                resources.clone()
            } else {
                format!("{} /XObject << {} >>", resources, xobjects)
            };
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.width, page.height, content_obj_id, page_resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.push(self.build_info_dict(metadata).into_bytes());
        self.serialize(&builder, info_obj_id)
    }

    fn build_info_dict(&self, metadata: &Metadata) -> String {
        let mut info = String::from("<< ");
        let entries = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
        ];
        for (key, value) in entries {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                let _ = write!(info, "/{} ({}) ", key, encode_text(value));
            }
        }
        let _ = write!(
            info,
            "/Producer (invoice-render {}) >>",
            env!("CARGO_PKG_VERSION")
        );
        info
    }

    /// Every standard face used on any page, Helvetica first. Always at
    /// least one font so empty pages still carry a valid resource dict.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        let mut used = [false; 2];
        for element in pages.iter().flat_map(|p| &p.elements) {
            match &element.draw {
                DrawCommand::Text { font, .. } | DrawCommand::Watermark { font, .. } => {
                    used[*font as usize] = true;
                }
                _ => {}
            }
        }
        if !used.contains(&true) {
            used[StandardFont::Helvetica as usize] = true;
        }

        for font in [StandardFont::Helvetica, StandardFont::HelveticaBold] {
            if !used[font as usize] {
                continue;
            }
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            let obj_id = builder.push(font_dict.into_bytes());
            builder.font_objects.push((font, obj_id));
        }
    }

    /// Create one XObject per image element and remember where it is drawn.
    fn register_images(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        for (page_idx, page) in pages.iter().enumerate() {
            for (elem_idx, element) in page.elements.iter().enumerate() {
                if let DrawCommand::Image { image_data } = &element.draw {
                    let img_idx = builder.image_objects.len();
                    let xobj_id = Self::write_image_xobject(builder, image_data);
                    builder.image_objects.push(xobj_id);
                    builder.image_index_map.insert((page_idx, elem_idx), img_idx);
                }
            }
        }
    }

    fn register_graphics_states(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        for element in pages.iter().flat_map(|p| &p.elements) {
            if let DrawCommand::Watermark { opacity, .. } = &element.draw {
                let key = opacity_key(*opacity);
                if builder.gstate_objects.iter().any(|(k, _)| *k == key) {
                    continue;
                }
                let alpha = key as f64 / 1000.0;
                let dict = format!("<< /Type /ExtGState /ca {:.3} /CA {:.3} >>", alpha, alpha);
                let obj_id = builder.push(dict.into_bytes());
                builder.gstate_objects.push((key, obj_id));
            }
        }
    }

    /// Write a single image as one or two XObject PDF objects.
    /// Returns the main XObject ID.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        let size = format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} /BitsPerComponent 8",
            image.width_px, image.height_px
        );

        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let color_space = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                };
                builder.push_stream(
                    &format!("{} /ColorSpace {} /Filter /DCTDecode", size, color_space),
                    data,
                )
            }

            ImagePixelData::Decoded { rgb, alpha } => {
                // SMask first so the image can reference it
                let smask_ref = alpha
                    .as_ref()
                    .map(|alpha_data| {
                        let compressed = compress_to_vec_zlib(alpha_data, 6);
                        let id = builder.push_stream(
                            &format!("{} /ColorSpace /DeviceGray /Filter /FlateDecode", size),
                            &compressed,
                        );
                        format!(" /SMask {} 0 R", id)
                    })
                    .unwrap_or_default();

                let compressed = compress_to_vec_zlib(rgb, 6);
                builder.push_stream(
                    &format!(
                        "{} /ColorSpace /DeviceRGB /Filter /FlateDecode{}",
                        size, smask_ref
                    ),
                    &compressed,
                )
            }
        }
    }

    /// Fonts and graphics states, shared by all pages.
    fn build_resource_dict(&self, builder: &PdfBuilder) -> String {
        let fonts = builder
            .font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ");
        let mut resources = format!("/Font << {} >>", fonts);

        if !builder.gstate_objects.is_empty() {
            let states = builder
                .gstate_objects
                .iter()
                .enumerate()
                .map(|(i, (_, obj_id))| format!("/GS{} {} 0 R", i, obj_id))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(resources, " /ExtGState << {} >>", states);
        }
        resources
    }

    /// The /XObject resource dict entries for a specific page.
    fn build_xobject_resource_dict(&self, page_idx: usize, builder: &PdfBuilder) -> String {
        let mut entries: Vec<(usize, usize)> = builder
            .image_index_map
            .iter()
            .filter(|((pidx, _), _)| *pidx == page_idx)
            .map(|(_, &img_idx)| (img_idx, builder.image_objects[img_idx]))
            .collect();
        entries.sort_unstable();
        entries
            .iter()
            .map(|(idx, obj_id)| format!("/Im{} {} 0 R", idx, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(&self, page: &LayoutPage, page_idx: usize, builder: &PdfBuilder) -> String {
        let mut stream = String::new();
        for (elem_idx, element) in page.elements.iter().enumerate() {
            self.write_element(&mut stream, element, builder, page_idx, elem_idx);
        }
        stream
    }

    /// Write a single layout element as PDF operators.
    fn write_element(
        &self,
        stream: &mut String,
        element: &LayoutElement,
        builder: &PdfBuilder,
        page_idx: usize,
        elem_idx: usize,
    ) {
        let (x, y) = (element.x, element.y);

        match &element.draw {
            DrawCommand::Rect {
                fill,
                stroke,
                line_width,
            } => {
                let paint = match (fill, stroke) {
                    (Some(_), Some(_)) => "B",
                    (Some(_), None) => "f",
                    (None, Some(_)) => "S",
                    (None, None) => return,
                };
                stream.push_str("q\n");
                if let Some(c) = fill {
                    let _ = writeln!(stream, "{} rg", rgb(c));
                }
                if let Some(c) = stroke {
                    let _ = writeln!(stream, "{} RG\n{:.2} w", rgb(c), line_width);
                }
                let _ = writeln!(
                    stream,
                    "{:.2} {:.2} {:.2} {:.2} re\n{}\nQ",
                    x, y, element.width, element.height, paint
                );
            }

            DrawCommand::Line {
                x2,
                y2,
                color,
                line_width,
            } => {
                let _ = writeln!(
                    stream,
                    "q\n{} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ",
                    rgb(color),
                    line_width,
                    x,
                    y,
                    x2,
                    y2
                );
            }

            DrawCommand::Text {
                text,
                font,
                font_size,
                color,
            } => {
                let _ = writeln!(
                    stream,
                    "BT\n/F{} {:.2} Tf\n{} rg\n{:.2} {:.2} Td\n({}) Tj\nET",
                    builder.font_name(*font),
                    font_size,
                    rgb(color),
                    x,
                    y,
                    encode_text(text)
                );
            }

            DrawCommand::Watermark {
                text,
                font,
                font_size,
                color,
                opacity,
                angle_degrees,
            } => {
                let (sin, cos) = angle_degrees.to_radians().sin_cos();
                let _ = writeln!(
                    stream,
                    "q\n/GS{} gs\nBT\n/F{} {:.2} Tf\n{} rg\n\
                     {:.4} {:.4} {:.4} {:.4} {:.2} {:.2} Tm\n({}) Tj\nET\nQ",
                    builder.gstate_name(*opacity),
                    builder.font_name(*font),
                    font_size,
                    rgb(color),
                    cos,
                    sin,
                    -sin,
                    cos,
                    x,
                    y,
                    encode_text(text)
                );
            }

            DrawCommand::Image { .. } => {
                if let Some(&img_idx) = builder.image_index_map.get(&(page_idx, elem_idx)) {
                    let _ = writeln!(
                        stream,
                        "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im{} Do\nQ",
                        element.width, element.height, x, y, img_idx
                    );
                }
            }
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, data) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

fn rgb(c: &Color) -> String {
    format!("{:.3} {:.3} {:.3}", c.r, c.g, c.b)
}

/// Encode text as the body of a PDF literal string in WinAnsiEncoding.
///
/// Delimiters are backslash-escaped, bytes outside printable ASCII are
/// written as octal escapes, and characters WinAnsi cannot represent
/// become `?`.
fn encode_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match unicode_to_winansi(ch) {
            Some(b'\\') => out.push_str("\\\\"),
            Some(b'(') => out.push_str("\\("),
            Some(b')') => out.push_str("\\)"),
            Some(b) if (0x20..0x7F).contains(&b) => out.push(b as char),
            Some(b) => {
                let _ = write!(out, "\\{:03o}", b);
            }
            None => out.push('?'),
        }
    }
    out
}

/// Map a Unicode codepoint to a WinAnsiEncoding byte value.
///
/// WinAnsiEncoding is based on Windows-1252. Most codepoints in
/// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
/// contains special mappings for smart quotes, bullets, dashes, etc.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x09 => Some(b' '),
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91), // Left single quotation mark
        0x2019 => Some(0x92), // Right single quotation mark
        0x201C => Some(0x93), // Left double quotation mark
        0x201D => Some(0x94), // Right double quotation mark
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97), // Em dash
        0x02DC => Some(0x98),
        0x2122 => Some(0x99), // Trade mark sign
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}
