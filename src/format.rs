//! Number formatting for cells and totals.
//!
//! These formats are shared with drafts and exports produced elsewhere, so
//! they must not drift: quantities print like C's `%g`, money with exactly
//! two decimals, tax rates with none.

/// Quantity without forced trailing zeros: `2`, `2.5`, `0.3`, `1.23457e+06`.
pub fn format_quantity(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string().to_lowercase();
    }

    // Six significant digits, rounded once, decides fixed vs exponent form.
    let sci = format!("{:.5e}", value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if !(-4..6).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (5 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Unit prices and totals: exactly two decimals.
pub fn format_money(value: f64) -> String {
    format!("{:.2}", value)
}

/// Tax rate: no decimals.
pub fn format_percent(value: f64) -> String {
    format!("{:.0}", value)
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_drops_trailing_zeros() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(100000.0), "100000");
        assert_eq!(format_quantity(0.1 + 0.2), "0.3");
        assert_eq!(format_quantity(0.0001), "0.0001");
        assert_eq!(format_quantity(1.333333333), "1.33333");
    }

    #[test]
    fn quantity_switches_to_exponent_form() {
        assert_eq!(format_quantity(1234567.0), "1.23457e+06");
        assert_eq!(format_quantity(1e16), "1e+16");
        assert_eq!(format_quantity(0.00001), "1e-05");
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(format_money(150.0), "150.00");
        assert_eq!(format_money(3.0 * 10.0 * 1.1), "33.00");
        assert_eq!(format_money(2.0 * 150.0 * 1.08), "324.00");
        assert_eq!(format_money(0.0), "0.00");
    }

    #[test]
    fn percent_has_no_decimals() {
        assert_eq!(format_percent(8.0), "8");
        assert_eq!(format_percent(19.6), "20");
        assert_eq!(format_percent(0.0), "0");
    }
}
