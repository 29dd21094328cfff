//! Pluggable column-width measurement for graphemes.
//!
//! The core never hard-codes Unicode width tables; it consults a
//! `WidthMethod` implementation instead. Two are provided, matching the two
//! crates the underlying Unicode ecosystem offers: a legacy per-codepoint
//! "wcwidth" table (`unicode-width`) and a modern grapheme-cluster-aware
//! measurement (`unicode-display-width`) that accounts for combining marks,
//! emoji presentation selectors, and zero-width joiners within a cluster.

/// Strategy for measuring the terminal column width of a single grapheme
/// cluster. Implementations return `0`, `1`, or `2`.
pub trait WidthMethod: Send + Sync {
    /// Width in terminal columns of one user-perceived character.
    fn grapheme_width(&self, grapheme: &str) -> u8;

    /// Width of an entire string, i.e. the sum of its grapheme widths.
    fn string_width(&self, s: &str) -> usize {
        crate::grapheme::graphemes(s)
            .map(|g| self.grapheme_width(g) as usize)
            .sum()
    }
}

/// Legacy per-codepoint wcwidth-table measurement via `unicode-width`.
///
/// Measures by the grapheme's first codepoint; combining marks attached
/// after it are treated as contributing no extra width since
/// `unicode-width` itself has no cluster concept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wcwidth;

impl WidthMethod for Wcwidth {
    fn grapheme_width(&self, grapheme: &str) -> u8 {
        use unicode_width::UnicodeWidthChar;
        let Some(first) = grapheme.chars().next() else {
            return 0;
        };
        first.width().unwrap_or(0) as u8
    }
}

/// Modern grapheme-cluster width via `unicode-display-width`, which
/// accounts for emoji presentation and joiners within the whole cluster
/// rather than just its leading codepoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphemeCluster;

impl WidthMethod for GraphemeCluster {
    fn grapheme_width(&self, grapheme: &str) -> u8 {
        let w = unicode_display_width::width(grapheme);
        w.min(2) as u8
    }
}
