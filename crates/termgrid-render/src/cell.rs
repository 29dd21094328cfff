//! The atomic unit of the screen grid.

use smallvec::SmallVec;
use termgrid_style::{Link, Style};

/// Inline storage for a grapheme's UTF-8 bytes. Single-codepoint graphemes
/// (the overwhelming majority of terminal text) never touch the heap;
/// longer combining sequences spill into a heap-allocated `Vec` behind the
/// same `SmallVec` handle.
pub type GraphemeBuf = SmallVec<[u8; 8]>;

/// A single grid cell: one grapheme, its column width, and its style/link.
///
/// `width` doubles as the continuation sentinel: a `width` of `0` marks a
/// cell as the right-hand placeholder of a wide cell to its left and its
/// `content`/`style`/`link` fields are meaningless and never read by
/// `ScreenBuffer` callers (see `ScreenBuffer::cell_at`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    content: GraphemeBuf,
    width: u8,
    pub style: Style,
    pub link: Option<Link>,
}

impl Cell {
    /// Marks the right half of a wide cell. Never constructed directly by
    /// callers; `ScreenBuffer::set_cell` produces these internally.
    pub(crate) const CONTINUATION_WIDTH: u8 = 0;

    /// The empty cell: a single space, width 1, zero style, no link.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            content: SmallVec::from_slice(b" "),
            width: 1,
            style: Style::default(),
            link: None,
        }
    }

    /// Builds a cell from a single grapheme cluster and its measured width.
    ///
    /// `width` must be `1` or `2` per the data model; callers (the text
    /// composer, `StyledString`) are expected to have consulted a
    /// `WidthMethod` already.
    #[must_use]
    pub fn new(grapheme: &str, width: u8, style: Style, link: Option<Link>) -> Self {
        debug_assert!(width == 1 || width == 2, "cell width must be 1 or 2");
        Self {
            content: SmallVec::from_slice(grapheme.as_bytes()),
            width,
            style,
            link,
        }
    }

    pub(crate) fn continuation() -> Self {
        Self {
            content: SmallVec::new(),
            width: Self::CONTINUATION_WIDTH,
            style: Style::default(),
            link: None,
        }
    }

    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.width == Self::CONTINUATION_WIDTH
    }

    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.width == 2
    }

    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// The grapheme content as a `&str`. Panics if called on a
    /// continuation cell — callers that iterate `ScreenBuffer` rows should
    /// skip continuations first (`ScreenBuffer::row_cells` does this).
    #[must_use]
    pub fn grapheme(&self) -> &str {
        debug_assert!(!self.is_continuation());
        std::str::from_utf8(&self.content).expect("cell content is always valid utf-8")
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_is_single_space_width_one() {
        let c = Cell::empty();
        assert_eq!(c.grapheme(), " ");
        assert_eq!(c.width(), 1);
        assert!(c.style.is_zero());
        assert!(c.link.is_none());
    }

    #[test]
    fn continuation_cell_reports_zero_width() {
        let c = Cell::continuation();
        assert!(c.is_continuation());
        assert_eq!(c.width(), 0);
    }

    #[test]
    fn wide_cell_reports_width_two() {
        let c = Cell::new("\u{4e2d}", 2, Style::default(), None);
        assert!(c.is_wide());
        assert_eq!(c.width(), 2);
    }
}
