//! Auto-shrinking font size for right-aligned numeric cells.
//!
//! Numbers never wrap. If a value is too wide for its column the size steps
//! down by [`FIT_STEP`] until it fits, and if even the floor size is too wide
//! the value is drawn at the floor anyway and allowed to overflow.

use crate::font::{FontContext, StandardFont};

/// Size decrement between attempts, in points.
pub const FIT_STEP: f64 = 0.5;

/// Result of a fit search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedSize {
    /// Chosen font size, always within `floor..=base`.
    pub size: f64,
    /// Width of the text at `size`.
    pub width: f64,
    /// True when nothing in range fit and the text will overflow.
    pub overflows: bool,
}

/// Find the largest size in `base, base - 0.5, ..., floor` at which `text`
/// is no wider than `max_width`.
pub fn fit_size(
    fonts: &FontContext,
    text: &str,
    font: StandardFont,
    max_width: f64,
    base_size: f64,
    floor_size: f64,
) -> FittedSize {
    let mut size = base_size;
    while size >= floor_size {
        let width = fonts.measure_string(text, font, size);
        if width <= max_width {
            return FittedSize {
                size,
                width,
                overflows: false,
            };
        }
        size -= FIT_STEP;
    }

    FittedSize {
        size: floor_size,
        width: fonts.measure_string(text, font, floor_size),
        overflows: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGULAR: StandardFont = StandardFont::Helvetica;

    #[test]
    fn fitting_text_keeps_base_size() {
        let fonts = FontContext::new();
        let fit = fit_size(&fonts, "324.00", REGULAR, 100.0, 10.0, 8.0);
        assert_eq!(fit.size, 10.0);
        assert!(!fit.overflows);
    }

    #[test]
    fn shrinks_in_half_point_steps() {
        let fonts = FontContext::new();
        // "123456" = 6 * 556 units: 33.36pt at 10, 31.69pt at 9.5, 30.02pt at 9
        let fit = fit_size(&fonts, "123456", REGULAR, 31.0, 10.0, 6.0);
        assert_eq!(fit.size, 9.0);
        assert!(fit.width <= 31.0);
        assert!(!fit.overflows);
    }

    #[test]
    fn too_wide_falls_back_to_floor() {
        let fonts = FontContext::new();
        let fit = fit_size(&fonts, "1234567890123.00", REGULAR, 10.0, 10.0, 8.0);
        assert_eq!(fit.size, 8.0);
        assert!(fit.overflows);
        assert!(fit.width > 10.0);
    }

    #[test]
    fn size_always_within_bounds() {
        let fonts = FontContext::new();
        let samples = ["1", "12.50", "9999999.99", "1e+16", ""];
        for text in samples {
            for max_width in [0.0, 5.0, 20.0, 60.0, 500.0] {
                let fit = fit_size(&fonts, text, REGULAR, max_width, 10.0, 8.0);
                assert!(fit.size <= 10.0 && fit.size >= 8.0, "{} @ {}", text, max_width);
            }
        }
    }

    #[test]
    fn empty_text_fits_at_base() {
        let fonts = FontContext::new();
        let fit = fit_size(&fonts, "", StandardFont::HelveticaBold, 0.0, 12.0, 8.0);
        assert_eq!(fit.size, 12.0);
    }
}
