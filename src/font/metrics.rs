//! Glyph advance widths for the standard PDF fonts we draw with.
//!
//! Values are the Adobe AFM widths in 1/1000 em for the printable ASCII range
//! (U+0020..=U+007E). A handful of common WinAnsi extras are mapped
//! explicitly; everything else falls back to the font's average width.

/// Width table for one standard font.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    ascii: &'static [u16; 95],
    fallback: u16,
}

impl StandardFontMetrics {
    /// Advance width of one character, in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.units(ch) as f64 * font_size / 1000.0
    }

    /// Width of a whole string, in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    fn units(&self, ch: char) -> u16 {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return self.ascii[(cp - 0x20) as usize];
        }
        match ch {
            '\u{00A0}' => self.ascii[0],
            '\u{2013}' => 556,                           // en dash
            '\u{2014}' => 1000,                          // em dash
            '\u{2018}' | '\u{2019}' | '\u{201A}' => 222, // single quotes
            '\u{201C}' | '\u{201D}' | '\u{201E}' => 333, // double quotes
            '\u{2022}' => 350,                           // bullet
            '\u{2026}' => 1000,                          // ellipsis
            '\u{20AC}' => 556,                           // euro
            '\u{00A3}' | '\u{00A5}' => 556,
            '\u{00B0}' => 400,
            _ => self.fallback,
        }
    }
}

pub(crate) const HELVETICA: StandardFontMetrics = StandardFontMetrics {
    ascii: &[
        // 0x20 - 0x2F
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0x30 - 0x3F
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        // 0x40 - 0x4F
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        // 0x50 - 0x5F
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        // 0x60 - 0x6F
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        // 0x70 - 0x7E
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
    ],
    fallback: 556,
};

pub(crate) const HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    ascii: &[
        // 0x20 - 0x2F
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0x30 - 0x3F
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        // 0x40 - 0x4F
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        // 0x50 - 0x5F
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        // 0x60 - 0x6F
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        // 0x70 - 0x7E
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
    ],
    fallback: 611,
};
