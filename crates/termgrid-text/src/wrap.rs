//! Standalone line-wrapping helper, exposed for callers that want wrapped
//! `String` lines rather than a drawn `ScreenBuffer` (`Paragraph::draw`
//! wraps words itself and does not call through this module).

use std::sync::Arc;

use termgrid_core::{graphemes, Wcwidth, WidthMethod};

/// Wrapping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Lines may exceed `width`; text is returned as-is (split on explicit
    /// newlines only).
    None,
    /// Wrap at word boundaries when possible.
    #[default]
    Word,
    /// Wrap at grapheme boundaries, ignoring word boundaries.
    Char,
    /// Word wrap, falling back to a character wrap for words wider than
    /// `width`.
    WordChar,
}

/// Options controlling `wrap_with_options`.
#[derive(Clone)]
pub struct WrapOptions {
    pub width: usize,
    pub mode: WrapMode,
    pub trim_trailing: bool,
    width_method: Arc<dyn WidthMethod>,
}

impl std::fmt::Debug for WrapOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapOptions")
            .field("width", &self.width)
            .field("mode", &self.mode)
            .field("trim_trailing", &self.trim_trailing)
            .finish_non_exhaustive()
    }
}

impl WrapOptions {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            mode: WrapMode::Word,
            trim_trailing: true,
            width_method: Arc::new(Wcwidth),
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: WrapMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn trim_trailing(mut self, trim: bool) -> Self {
        self.trim_trailing = trim;
        self
    }

    #[must_use]
    pub fn width_method(mut self, width_method: Arc<dyn WidthMethod>) -> Self {
        self.width_method = width_method;
        self
    }
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::new(80)
    }
}

/// Wraps `text` to `width` cells using `mode`, with the default `WidthMethod`.
#[must_use]
pub fn wrap_text(text: &str, width: usize, mode: WrapMode) -> Vec<String> {
    wrap_with_options(text, &WrapOptions::new(width).mode(mode))
}

/// Wraps `text` per `options`.
#[must_use]
pub fn wrap_with_options(text: &str, options: &WrapOptions) -> Vec<String> {
    if options.width == 0 {
        return text.split('\n').map(str::to_string).collect();
    }
    match options.mode {
        WrapMode::None => text.split('\n').map(str::to_string).collect(),
        WrapMode::Char => wrap_chars(text, options),
        WrapMode::Word => wrap_paragraphs(text, options, false),
        WrapMode::WordChar => wrap_paragraphs(text, options, true),
    }
}

fn finalize(line: String, options: &WrapOptions) -> String {
    if options.trim_trailing {
        line.trim_end().to_string()
    } else {
        line
    }
}

fn wrap_chars(text: &str, options: &WrapOptions) -> Vec<String> {
    let wm = options.width_method.as_ref();
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0usize;
    for g in graphemes(text) {
        if g == "\n" {
            lines.push(finalize(std::mem::take(&mut line), options));
            width = 0;
            continue;
        }
        let w = wm.grapheme_width(g) as usize;
        if width + w > options.width && !line.is_empty() {
            lines.push(finalize(std::mem::take(&mut line), options));
            width = 0;
        }
        line.push_str(g);
        width += w;
    }
    lines.push(finalize(line, options));
    lines
}

fn wrap_paragraphs(text: &str, options: &WrapOptions, char_fallback: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_one_paragraph(paragraph, options, char_fallback, &mut lines);
    }
    lines
}

fn wrap_one_paragraph(
    text: &str,
    options: &WrapOptions,
    char_fallback: bool,
    lines: &mut Vec<String>,
) {
    let wm = options.width_method.as_ref();
    let mut line = String::new();
    let mut width = 0usize;
    let before = lines.len();

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let word_width = wm.string_width(word);
        let sep = usize::from(!line.is_empty());

        if width + sep + word_width <= options.width {
            if sep == 1 {
                line.push(' ');
                width += 1;
            }
            line.push_str(word);
            width += word_width;
            continue;
        }

        if !line.is_empty() {
            lines.push(finalize(std::mem::take(&mut line), options));
            width = 0;
        }

        if word_width > options.width {
            if char_fallback {
                wrap_word_chars(word, options, lines, &mut line, &mut width);
            } else {
                lines.push(finalize(word.to_string(), options));
            }
        } else {
            line.push_str(word);
            width = word_width;
        }
    }

    if !line.is_empty() || lines.len() == before {
        lines.push(finalize(line, options));
    }
}

fn wrap_word_chars(
    word: &str,
    options: &WrapOptions,
    lines: &mut Vec<String>,
    line: &mut String,
    width: &mut usize,
) {
    let wm = options.width_method.as_ref();
    for g in graphemes(word) {
        let w = wm.grapheme_width(g) as usize;
        if *width + w > options.width && !line.is_empty() {
            lines.push(finalize(std::mem::take(line), options));
            *width = 0;
        }
        line.push_str(g);
        *width += w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_mode_breaks_at_spaces() {
        let lines = wrap_text("Hello world foo bar", 10, WrapMode::Word);
        assert_eq!(lines, vec!["Hello", "world foo", "bar"]);
    }

    #[test]
    fn char_mode_ignores_word_boundaries() {
        let lines = wrap_text("abcdefgh", 4, WrapMode::Char);
        assert_eq!(lines, vec!["abcd", "efgh"]);
    }

    #[test]
    fn word_char_mode_splits_overlong_words() {
        let lines = wrap_text("Supercalifragilistic", 10, WrapMode::WordChar);
        assert!(lines.len() >= 2);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn word_mode_leaves_overlong_word_unbroken() {
        let lines = wrap_text("Supercalifragilistic", 10, WrapMode::Word);
        assert_eq!(lines, vec!["Supercalifragilistic"]);
    }

    #[test]
    fn explicit_newlines_always_split() {
        let lines = wrap_text("a\nb", 10, WrapMode::Word);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn zero_width_returns_text_unsplit_per_line() {
        let lines = wrap_with_options("hi there", &WrapOptions::new(0));
        assert_eq!(lines, vec!["hi there"]);
    }
}
