//! Grapheme cluster iteration over UTF-8 text.

use unicode_segmentation::UnicodeSegmentation;

/// Iterates the user-perceived characters of `s` in order.
///
/// A thin wrapper around `unicode-segmentation`'s extended grapheme cluster
/// boundaries — the core never reimplements Unicode segmentation itself.
pub fn graphemes(s: &str) -> impl Iterator<Item = &str> {
    s.graphemes(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_ascii_into_single_chars() {
        let got: Vec<_> = graphemes("abc").collect();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn keeps_combining_sequence_as_one_cluster() {
        // "e" + combining acute accent is one grapheme cluster.
        let s = "e\u{0301}";
        let got: Vec<_> = graphemes(s).collect();
        assert_eq!(got, vec![s]);
    }

    #[test]
    fn empty_string_yields_no_graphemes() {
        assert_eq!(graphemes("").count(), 0);
    }
}
