//! # Page Break Decisions
//!
//! The per-block rule the page builder applies. Blocks are atomic, so the
//! only choices are "here" or "on a fresh page"; there is no split.

/// What to do with the next block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakDecision {
    /// Place the block on the current page (it fits).
    Place,
    /// Close the current page and place the block on a new one.
    MoveToNextPage,
    /// The block doesn't fit but the page is still empty: place it anyway.
    /// A block that can't fit an empty page can't fit any page.
    PlaceOversized,
}

/// Decide where a block goes.
///
/// `used_height` already includes the page's header and footer. The overflow
/// test is strict: a block that exactly fills the remaining height stays.
pub fn decide_break(
    used_height: f64,
    block_outer_height: f64,
    usable_height: f64,
    page_has_blocks: bool,
) -> BreakDecision {
    if used_height + block_outer_height <= usable_height {
        return BreakDecision::Place;
    }

    if page_has_blocks {
        BreakDecision::MoveToNextPage
    } else {
        BreakDecision::PlaceOversized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits() {
        assert_eq!(decide_break(100.0, 200.0, 700.0, true), BreakDecision::Place);
    }

    #[test]
    fn exact_fill_stays() {
        assert_eq!(decide_break(500.0, 200.0, 700.0, true), BreakDecision::Place);
    }

    #[test]
    fn overflow_moves() {
        assert_eq!(
            decide_break(500.01, 200.0, 700.0, true),
            BreakDecision::MoveToNextPage
        );
    }

    #[test]
    fn overflow_on_empty_page_is_accepted() {
        assert_eq!(
            decide_break(100.0, 900.0, 700.0, false),
            BreakDecision::PlaceOversized
        );
    }

    #[test]
    fn header_and_footer_alone_overflowing() {
        // Header + footer already past the budget: the first block still lands.
        assert_eq!(
            decide_break(720.0, 10.0, 700.0, false),
            BreakDecision::PlaceOversized
        );
    }
}
