//! # Page Break Decisions
//!
//! Item rows are unbreakable: a row either fits above the footer reserve on
//! the current page or moves whole to the next one. The only exception is a
//! row taller than an entire empty page. Moving it would just produce an
//! endless run of blank pages, so it is placed where it is and allowed to
//! run into the reserve.

/// What to do with the next row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Draw the row on the current page.
    Place,
    /// Close this page and draw the row at the top of a new one.
    MoveToNextPage,
}

/// Decide where a row of `row_height` points goes.
///
/// `cursor_y` is the baseline of the row's first line (PDF coordinates, y
/// grows upward) and `floor_y` is the top of the footer reserve. A page is
/// `fresh` when it is a continuation page that has no rows on it yet.
pub fn decide_break(cursor_y: f64, row_height: f64, floor_y: f64, fresh: bool) -> BreakDecision {
    if cursor_y - row_height >= floor_y {
        return BreakDecision::Place;
    }
    if fresh {
        return BreakDecision::Place;
    }
    BreakDecision::MoveToNextPage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_fits() {
        assert_eq!(decide_break(500.0, 14.0, 200.0, false), BreakDecision::Place);
    }

    #[test]
    fn row_touching_reserve_still_fits() {
        assert_eq!(decide_break(228.0, 28.0, 200.0, false), BreakDecision::Place);
    }

    #[test]
    fn row_crossing_reserve_moves() {
        assert_eq!(
            decide_break(210.0, 14.0, 200.0, false),
            BreakDecision::MoveToNextPage
        );
    }

    #[test]
    fn oversized_row_on_fresh_page_is_placed() {
        assert_eq!(decide_break(700.0, 900.0, 200.0, true), BreakDecision::Place);
    }

    #[test]
    fn oversized_row_after_other_rows_moves_first() {
        assert_eq!(
            decide_break(700.0, 900.0, 200.0, false),
            BreakDecision::MoveToNextPage
        );
    }
}
