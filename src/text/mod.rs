//! # Text Layout
//!
//! Greedy word wrapping measured with real font metrics.
//!
//! Wrapping is whitespace-only: a word never gets split, and a word wider than
//! the column simply sits alone on its line. Explicit line breaks are
//! paragraph boundaries and survive wrapping, including blank lines.

pub mod fit;

use crate::font::{FontContext, StandardFont};

pub use fit::{fit_size, FittedSize, FIT_STEP};

/// Line breaking and measurement, bound to a font context.
#[derive(Debug, Clone, Copy)]
pub struct TextLayout<'a> {
    fonts: &'a FontContext,
}

impl<'a> TextLayout<'a> {
    pub fn new(fonts: &'a FontContext) -> Self {
        Self { fonts }
    }

    /// Measure the width of a string on a single line.
    pub fn measure_width(&self, text: &str, font: StandardFont, font_size: f64) -> f64 {
        self.fonts.measure_string(text, font, font_size)
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Always returns at least one line; callers size rows from the count.
    pub fn wrap(
        &self,
        text: &str,
        font: StandardFont,
        font_size: f64,
        max_width: f64,
    ) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in paragraphs(text) {
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                if line.is_empty() {
                    line.push_str(word);
                    continue;
                }
                let candidate = format!("{} {}", line, word);
                if self.measure_width(&candidate, font, font_size) <= max_width {
                    line = candidate;
                } else {
                    lines.push(std::mem::take(&mut line));
                    line.push_str(word);
                }
            }
            // Blank paragraphs keep their empty line.
            lines.push(line);
        }

        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

/// Split on `\r\n`, `\r` or `\n`. A trailing break adds no empty paragraph.
fn paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(&['\r', '\n'][..]) {
            Some(i) => {
                out.push(&rest[..i]);
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + skip..];
            }
            None => {
                out.push(rest);
                break;
            }
        }
    }
    out
}

/// Convenience wrapper around [`TextLayout::wrap`].
pub fn wrap(
    fonts: &FontContext,
    text: &str,
    font: StandardFont,
    font_size: f64,
    max_width: f64,
) -> Vec<String> {
    TextLayout::new(fonts).wrap(text, font, font_size, max_width)
}
